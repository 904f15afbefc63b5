//! Run-to-completion orchestrator for the consolidation pipeline.
//!
//! Stages run strictly in order: validate, profile, consolidate, build
//! hierarchy, classify, render. Non-fatal errors accumulate in the
//! result's `warnings`; only structural input problems abort the run.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use taxo_core::config::TaxonomyConfig;
use taxo_core::errors::{ConsolidationError, PipelineError};
use taxo_core::types::collections::FxHashSet;
use taxo_core::types::GroupId;

use crate::confidence::{self, ConfidenceClassifier, ConfidenceSummary, ConfidenceTier};
use crate::consolidate::{ConsolidationEngine, MergeEvent};
use crate::hierarchy::{HierarchyBuilder, HierarchyForest};
use crate::model::{CodeLookup, GroupArena, SeedGroup};
use crate::profile::CoverageProfiler;
use crate::render::{self, GroupRecord};
use crate::similarity::SimilarityMatrix;

/// Run-level counters for the diagnostics footer and logs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaxonomyDiagnostics {
    pub groups_before: usize,
    pub groups_after: usize,
    pub merges: usize,
    pub relationships: usize,
    pub roots: usize,
    pub isolated: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub needs_deeper_analysis: usize,
    pub missing_facility_warnings: usize,
    pub degenerate_groups: usize,
}

impl fmt::Display for TaxonomyDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "groups: {} -> {} ({} merges)",
            self.groups_before, self.groups_after, self.merges
        )?;
        writeln!(
            f,
            "hierarchy: {} relationships, {} roots, {} isolated",
            self.relationships, self.roots, self.isolated
        )?;
        writeln!(
            f,
            "confidence: {} high, {} medium, {} low ({} need deeper analysis)",
            self.high_confidence,
            self.medium_confidence,
            self.low_confidence,
            self.needs_deeper_analysis
        )?;
        write!(
            f,
            "data quality: {} missing-facility warnings, {} degenerate groups",
            self.missing_facility_warnings, self.degenerate_groups
        )
    }
}

/// Everything a run produces: final state, both report artifacts, the
/// audit trails, and the accumulated non-fatal errors.
#[derive(Debug)]
pub struct TaxonomyResult {
    pub arena: GroupArena,
    pub forest: HierarchyForest,
    pub records: Vec<GroupRecord>,
    pub tree: String,
    pub merge_events: Vec<MergeEvent>,
    pub summary: ConfidenceSummary,
    pub diagnostics: TaxonomyDiagnostics,
    pub warnings: Vec<PipelineError>,
}

/// The orchestrator. Owns the configuration; state lives in the result.
pub struct TaxonomyPipeline {
    config: TaxonomyConfig,
}

impl TaxonomyPipeline {
    pub fn new(config: TaxonomyConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(TaxonomyConfig::default())
    }

    /// Run the full pipeline over the seed groups.
    ///
    /// Returns `Err` only for structural input problems (empty universe,
    /// duplicate ids, malformed lookup). Everything recoverable lands in
    /// `TaxonomyResult::warnings` and the run completes.
    pub fn run(
        &self,
        seeds: Vec<SeedGroup>,
        lookup: &CodeLookup,
    ) -> Result<TaxonomyResult, PipelineError> {
        TaxonomyConfig::validate(&self.config)?;
        lookup.validate()?;

        let mut warnings: Vec<PipelineError> = Vec::new();
        let mut arena = GroupArena::from_seeds(seeds)?;
        let groups_before = arena.live_count();
        info!(groups = groups_before, "pipeline start");

        let profiler = CoverageProfiler::new(&self.config.consolidation);
        let profile_errors = profiler.profile_all(&mut arena, lookup);
        let missing_facility_warnings = profile_errors.len();
        warnings.extend(profile_errors.into_iter().map(PipelineError::from));
        info!(
            groups = arena.live_count(),
            missing = missing_facility_warnings,
            "profiling complete"
        );

        let mut matrix = SimilarityMatrix::new();
        let engine = ConsolidationEngine::new(&self.config.consolidation);
        let merge_result = engine.run(&mut arena, lookup, &mut matrix);
        let merge_events = merge_result.data;
        warnings.extend(merge_result.errors);
        info!(merges = merge_events.len(), "consolidation complete");

        let builder = HierarchyBuilder::new(&self.config.consolidation);
        let forest_result = builder.build(&mut arena, &mut matrix);
        let forest = forest_result.data;
        warnings.extend(forest_result.errors);
        info!(
            relationships = forest.edges.len(),
            roots = forest.roots.len(),
            "hierarchy complete"
        );

        let classifier = ConfidenceClassifier::new(&self.config.consolidation);
        classifier.classify_all(&mut arena, lookup);
        let summary = confidence::summarize(&arena);

        // Guard against groups left without members. Should be
        // unreachable (facility sets only grow), but a degenerate group
        // must not reach the reports.
        let mut excluded: FxHashSet<GroupId> = FxHashSet::default();
        for id in arena.live_ids() {
            let Some(group) = arena.get(id) else { continue };
            if group.facility_ids.is_empty() {
                warn!(group = %id, name = %group.name, "degenerate group excluded from reports");
                excluded.insert(id);
                warnings.push(
                    ConsolidationError::DegenerateGroup {
                        id,
                        name: group.name.clone(),
                    }
                    .into(),
                );
            }
        }

        let records = render::to_records(&arena, lookup, &excluded);
        let tree = render::render_tree(&arena, &forest, lookup, &self.config.report, &excluded);

        let tally = |tier: ConfidenceTier| {
            summary.tier(tier).map(|t| t.group_count).unwrap_or(0)
        };
        let diagnostics = TaxonomyDiagnostics {
            groups_before,
            groups_after: arena.live_count() - excluded.len(),
            merges: merge_events.len(),
            relationships: forest.edges.len(),
            roots: forest.roots.len(),
            isolated: forest.isolated.len(),
            high_confidence: tally(ConfidenceTier::High),
            medium_confidence: tally(ConfidenceTier::Medium),
            low_confidence: tally(ConfidenceTier::Low),
            needs_deeper_analysis: summary.needs_deeper_analysis,
            missing_facility_warnings,
            degenerate_groups: excluded.len(),
        };
        info!(warnings = warnings.len(), "pipeline complete\n{diagnostics}");

        Ok(TaxonomyResult {
            arena,
            forest,
            records,
            tree,
            merge_events,
            summary,
            diagnostics,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxo_core::errors::InputError;

    #[test]
    fn test_empty_universe_is_fatal() {
        let pipeline = TaxonomyPipeline::with_defaults();
        let err = pipeline.run(Vec::new(), &CodeLookup::new()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Input(InputError::EmptyUniverse)
        ));
    }

    #[test]
    fn test_malformed_lookup_is_fatal() {
        let mut lookup = CodeLookup::new();
        lookup.insert_observation("F1", "", 1);
        let seeds = vec![SeedGroup {
            id: GroupId(1),
            name: "Gas".to_string(),
            facility_ids: vec!["F1".to_string()],
        }];
        let err = TaxonomyPipeline::with_defaults()
            .run(seeds, &lookup)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Input(InputError::MalformedLookup { .. })
        ));
    }

    #[test]
    fn test_single_group_run_produces_both_artifacts() {
        let mut lookup = CodeLookup::new();
        lookup.insert_observation("F1", "FLOWGAS", 1);
        let seeds = vec![SeedGroup {
            id: GroupId(1),
            name: "Gas Meters".to_string(),
            facility_ids: vec!["F1".to_string()],
        }];
        let result = TaxonomyPipeline::with_defaults()
            .run(seeds, &lookup)
            .unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.records.len(), 1);
        assert!(result.tree.contains("Gas Meters"));
        assert_eq!(result.diagnostics.groups_before, 1);
        assert_eq!(result.diagnostics.groups_after, 1);
        assert_eq!(result.diagnostics.merges, 0);
        assert_eq!(
            result
                .summary
                .tier(ConfidenceTier::High)
                .map(|t| t.group_count),
            Some(1)
        );
    }

    #[test]
    fn test_memberless_group_excluded_as_degenerate() {
        let mut lookup = CodeLookup::new();
        lookup.insert_observation("F1", "FLOWGAS", 1);
        let seeds = vec![
            SeedGroup {
                id: GroupId(1),
                name: "Gas Meters".to_string(),
                facility_ids: vec!["F1".to_string()],
            },
            SeedGroup {
                id: GroupId(2),
                name: "Hollow".to_string(),
                facility_ids: Vec::new(),
            },
        ];
        let result = TaxonomyPipeline::with_defaults()
            .run(seeds, &lookup)
            .unwrap();

        assert_eq!(result.diagnostics.degenerate_groups, 1);
        assert_eq!(result.diagnostics.groups_after, 1);
        assert!(result.warnings.iter().any(|w| matches!(
            w,
            PipelineError::Consolidation(ConsolidationError::DegenerateGroup { id, name })
                if *id == GroupId(2) && name == "Hollow"
        )));
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id, GroupId(1));
        assert!(!result.tree.contains("Hollow"));
    }
}
