//! ASCII tree report over the consolidated hierarchy.
//!
//! Read-only over the arena and forest. Layout: header block, root
//! categories with their subtrees, isolated types in their own section,
//! summary statistics at the bottom.

use std::path::Path;

use taxo_core::config::ReportConfig;
use taxo_core::types::collections::FxHashSet;
use taxo_core::types::GroupId;

use crate::hierarchy::HierarchyForest;
use crate::model::{CodeLookup, GroupArena};
use crate::profile::CoverageTier;

const RULE_WIDTH: usize = 80;

/// Render the full tree report.
///
/// Degenerate groups listed in `excluded` are dropped from every
/// section; live ordering inside each level comes from the forest.
pub fn render_tree(
    arena: &GroupArena,
    forest: &HierarchyForest,
    lookup: &CodeLookup,
    config: &ReportConfig,
    excluded: &FxHashSet<GroupId>,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let live: Vec<GroupId> = arena
        .live_ids()
        .into_iter()
        .filter(|id| !excluded.contains(id))
        .collect();
    let roots: Vec<GroupId> = forest
        .roots
        .iter()
        .copied()
        .filter(|id| !excluded.contains(id))
        .collect();
    let isolated: Vec<GroupId> = forest
        .isolated
        .iter()
        .copied()
        .filter(|id| !excluded.contains(id))
        .collect();
    let branching: Vec<GroupId> = roots
        .iter()
        .copied()
        .filter(|id| !isolated.contains(id))
        .collect();

    lines.push(heavy.clone());
    lines.push("EQUIPMENT TYPE HIERARCHY".to_string());
    lines.push(heavy.clone());
    lines.push(format!("Equipment Types: {}", live.len()));
    lines.push(format!(
        "Hierarchical Relationships: {}",
        forest.edges.len()
    ));
    lines.push(heavy.clone());
    lines.push(String::new());

    if !branching.is_empty() {
        lines.push("ROOT EQUIPMENT CATEGORIES".to_string());
        lines.push(light.clone());
        lines.push(String::new());
        for (i, &root) in branching.iter().enumerate() {
            let is_last = i == branching.len() - 1;
            render_subtree(
                arena, forest, lookup, config, excluded, root, "", is_last, &mut lines,
            );
            if !is_last {
                lines.push("|".to_string());
            }
        }
        lines.push(String::new());
    }

    if !isolated.is_empty() {
        lines.push(heavy.clone());
        lines.push("ISOLATED EQUIPMENT TYPES (No Hierarchical Relationships)".to_string());
        lines.push(light.clone());
        lines.push(String::new());
        for (i, &id) in isolated.iter().enumerate() {
            let is_last = i == isolated.len() - 1;
            render_node(arena, lookup, config, id, "", is_last, &mut lines);
        }
        lines.push(String::new());
    }

    lines.push(heavy.clone());
    lines.push("SUMMARY STATISTICS".to_string());
    lines.push(light);
    lines.push(format!("Root Categories: {}", roots.len()));
    let child_count = forest
        .edges
        .iter()
        .filter(|e| !excluded.contains(&e.child))
        .count();
    lines.push(format!("Hierarchical Children: {child_count}"));
    lines.push(format!("Isolated Types: {}", isolated.len()));
    if !forest.edges.is_empty() {
        let mean = forest.edges.iter().map(|e| e.similarity).sum::<f64>()
            / forest.edges.len() as f64;
        lines.push(format!("Average Similarity: {mean:.3}"));
    }
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Write the rendered tree to a file.
pub fn write_tree(path: &Path, tree: &str) -> std::io::Result<()> {
    std::fs::write(path, tree)
}

#[allow(clippy::too_many_arguments)]
fn render_subtree(
    arena: &GroupArena,
    forest: &HierarchyForest,
    lookup: &CodeLookup,
    config: &ReportConfig,
    excluded: &FxHashSet<GroupId>,
    id: GroupId,
    prefix: &str,
    is_last: bool,
    lines: &mut Vec<String>,
) {
    render_node(arena, lookup, config, id, prefix, is_last, lines);
    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "|   " });
    let children: Vec<GroupId> = forest
        .children_of(id)
        .iter()
        .copied()
        .filter(|c| !excluded.contains(c))
        .collect();
    for (i, &child) in children.iter().enumerate() {
        let child_is_last = i == children.len() - 1;
        render_subtree(
            arena,
            forest,
            lookup,
            config,
            excluded,
            child,
            &child_prefix,
            child_is_last,
            lines,
        );
    }
}

fn render_node(
    arena: &GroupArena,
    lookup: &CodeLookup,
    config: &ReportConfig,
    id: GroupId,
    prefix: &str,
    is_last: bool,
    lines: &mut Vec<String>,
) {
    let Some(group) = arena.get(id) else {
        return;
    };
    let connector = if is_last { "`-- " } else { "|-- " };
    let confidence = group
        .confidence
        .map(|c| c.name().to_uppercase())
        .unwrap_or_else(|| "UNSCORED".to_string());
    let total_tags: u64 = group.code_coverage.values().map(|c| c.tag_count).sum();
    lines.push(format!(
        "{prefix}{connector}[{confidence}] {} ({} facilities, {} tags)",
        group.name,
        group.facility_count(),
        total_tags
    ));

    let detail = format!("{prefix}{}", if is_last { "    " } else { "|   " });

    if !group.merged_from.is_empty() {
        lines.push(format!(
            "{detail}Merged from: {}",
            group.merged_from.join(", ")
        ));
    }

    let core = group.codes_in_tier(CoverageTier::Core);
    let common = group.codes_in_tier(CoverageTier::Common);
    let optional = group.codes_in_tier(CoverageTier::Optional);
    if group.code_coverage.is_empty() {
        lines.push(format!("{detail}! No codes observed for this type"));
    } else {
        lines.push(format!(
            "{detail}Codes: {} distinct ({} core, {} common, {} optional)",
            group.code_coverage.len(),
            core.len(),
            common.len(),
            optional.len()
        ));
        render_tier(&detail, "Core Codes:", &core, config, lookup, lines);
        if config.effective_show_common_tier() {
            render_tier(&detail, "Common Codes:", &common, config, lookup, lines);
        }
        render_tier(&detail, "Optional Codes:", &optional, config, lookup, lines);
    }

    if group.needs_deeper_analysis {
        lines.push(format!(
            "{detail}! Needs deeper analysis: no core codes found"
        ));
    }

    let samples = group.sample_facilities(config.effective_sample_facilities());
    if !samples.is_empty() {
        let joined: Vec<&str> = samples.iter().map(|s| s.as_str()).collect();
        lines.push(format!("{detail}Sample Facilities: {}", joined.join(", ")));
    }
}

fn render_tier(
    detail: &str,
    label: &str,
    codes: &[(&String, &crate::profile::CodeCoverage)],
    config: &ReportConfig,
    lookup: &CodeLookup,
    lines: &mut Vec<String>,
) {
    if codes.is_empty() {
        return;
    }
    let cap = config.effective_max_core_codes();
    lines.push(format!("{detail}{label}"));
    for (code, cov) in codes.iter().take(cap) {
        let mut line = format!(
            "{detail}  - {code}: {:.1}% coverage ({} facilities)",
            cov.coverage * 100.0,
            cov.facility_count
        );
        if let Some(description) = lookup.description(code) {
            line.push_str(&format!(" - {description}"));
        }
        lines.push(line);
    }
    if codes.len() > cap {
        lines.push(format!("{detail}  ... and {} more", codes.len() - cap));
    }
}
