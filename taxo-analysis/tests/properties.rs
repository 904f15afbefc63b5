//! Property tests for the numeric invariants.

use proptest::prelude::*;

use taxo_analysis::model::{CodeLookup, SeedGroup};
use taxo_analysis::profile::CoverageProfiler;
use taxo_analysis::similarity::jaccard_similarity;
use taxo_core::config::ConsolidationConfig;
use taxo_core::types::collections::FxHashSet;
use taxo_core::types::{CodeId, GroupId};

fn code_set() -> impl Strategy<Value = FxHashSet<CodeId>> {
    prop::collection::hash_set("[A-F]", 0..6)
        .prop_map(|set| set.into_iter().collect())
}

/// Facility index -> set of code indices observed there.
fn universe() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..5, 0..5), 1..8)
}

proptest! {
    #[test]
    fn jaccard_stays_in_unit_interval(a in code_set(), b in code_set()) {
        let s = jaccard_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn jaccard_is_symmetric(a in code_set(), b in code_set()) {
        prop_assert_eq!(
            jaccard_similarity(&a, &b).to_bits(),
            jaccard_similarity(&b, &a).to_bits()
        );
    }

    #[test]
    fn jaccard_of_identical_sets(a in code_set()) {
        let s = jaccard_similarity(&a, &a);
        if a.is_empty() {
            prop_assert_eq!(s, 0.0);
        } else {
            prop_assert_eq!(s, 1.0);
        }
    }

    #[test]
    fn coverage_is_bounded_and_exact_at_full(observations in universe()) {
        let mut lookup = CodeLookup::new();
        let mut facilities = Vec::new();
        for (i, codes) in observations.iter().enumerate() {
            let facility = format!("F{i}");
            for code in codes {
                lookup.insert_observation(&facility, format!("C{code}"), 1);
            }
            facilities.push(facility);
        }

        let mut group = taxo_analysis::model::EquipmentType::from_seed(SeedGroup {
            id: GroupId(1),
            name: "prop".to_string(),
            facility_ids: facilities.clone(),
        });
        let config = ConsolidationConfig::default();
        CoverageProfiler::new(&config).profile(&mut group, &lookup);

        let total = group.facility_count();
        for (code, cov) in &group.code_coverage {
            prop_assert!((0.0..=1.0).contains(&cov.coverage), "coverage out of range");
            prop_assert!(cov.facility_count as usize <= total);

            let exhibiting = facilities
                .iter()
                .filter(|f| {
                    lookup
                        .codes_for(f)
                        .is_some_and(|obs| obs.iter().any(|o| &o.code == code))
                })
                .count();
            prop_assert_eq!(cov.facility_count as usize, exhibiting);
            if exhibiting == total {
                prop_assert_eq!(cov.coverage, 1.0);
            }
        }
    }
}
