//! Property tests for catalog parsing, segment classification and config
//! validation.

use cogs_core::{AnalysisConfig, Catalog, Segment, SegmentClassifier};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,12}"
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    /// A name is premium exactly when it contains a keyword.
    #[test]
    fn classification_follows_keyword_containment(
        prefix in "[a-z ]{0,6}",
        suffix in "[a-z ]{0,6}",
        premium in any::<bool>(),
    ) {
        let classifier = SegmentClassifier::new(["Lux"]);
        let name = if premium {
            format!("{prefix}Lux{suffix}")
        } else {
            format!("{prefix}{suffix}")
        };
        let expected = if premium { Segment::Premium } else { Segment::Economy };
        prop_assert_eq!(classifier.classify(&name), expected);
    }

    /// Every catalog vehicle gets exactly one label.
    #[test]
    fn classify_catalog_labels_every_vehicle(
        names in prop::collection::btree_set(arb_name(), 0..12),
    ) {
        let catalog = Catalog::new(names.iter().cloned(), Vec::<String>::new(), Vec::new());
        let segments = SegmentClassifier::default().classify_catalog(&catalog);
        prop_assert_eq!(segments.len(), names.len());
        for name in &names {
            prop_assert!(segments.contains_key(name));
        }
    }

    /// One `[[usage]]` table per vehicle expands into one usage per listed part.
    #[test]
    fn usage_tables_expand_per_part(
        vehicles in prop::collection::btree_set("[A-Z][a-z]{1,6}", 1..5),
        parts in prop::collection::btree_set("[a-z]{2,6}", 1..5),
    ) {
        let vehicles: Vec<String> = vehicles.into_iter().collect();
        let parts: Vec<String> = parts.into_iter().collect();

        let quote = |items: &[String]| {
            items.iter().map(|s| format!("\"{s}\"")).collect::<Vec<_>>().join(", ")
        };
        let mut doc = format!("vehicles = [{}]\nparts = [{}]\n", quote(&vehicles), quote(&parts));
        for vehicle in &vehicles {
            doc.push_str(&format!("\n[[usage]]\nvehicle = \"{vehicle}\"\nparts = [{}]\n", quote(&parts)));
        }

        let catalog = Catalog::from_toml_str(&doc).expect("generated document parses");
        prop_assert_eq!(&catalog.vehicles, &vehicles);
        prop_assert_eq!(&catalog.parts, &parts);
        prop_assert_eq!(catalog.usages.len(), vehicles.len() * parts.len());
        prop_assert_eq!(&catalog.usages[0].vehicle, &vehicles[0]);
        prop_assert_eq!(&catalog.usages[0].part, &parts[0]);
    }

    /// Thresholds are accepted exactly on (0, 1].
    #[test]
    fn threshold_range_is_half_open(value in -2.0f64..2.0) {
        let config = AnalysisConfig {
            demand_threshold: value,
            ..AnalysisConfig::default()
        };
        let in_range = value > 0.0 && value <= 1.0;
        prop_assert_eq!(config.validate().is_ok(), in_range);
    }

    /// Stratification cutoffs are accepted exactly on [-1, 1).
    #[test]
    fn cutoff_range_covers_the_coefficient(value in -2.0f64..2.0) {
        let config = AnalysisConfig {
            stratification_cutoff: value,
            ..AnalysisConfig::default()
        };
        let in_range = (-1.0..1.0).contains(&value);
        prop_assert_eq!(config.validate().is_ok(), in_range);
    }
}
