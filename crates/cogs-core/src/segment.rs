//! Market segment classification.
//!
//! Vehicles are split into [`Segment::Premium`] and [`Segment::Economy`] by a
//! keyword match on the vehicle name: any name containing one of the
//! configured premium keywords is premium, everything else is economy. The
//! match is case-sensitive substring containment, so `"Audi A3 8V"` matches
//! the keyword `"Audi"` but `"audi a3"` does not.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::SegmentConfig;

/// Market segment of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Segment {
    Economy,
    Premium,
}

impl Segment {
    /// Both segments, in mixing-matrix index order.
    pub const ALL: [Self; 2] = [Self::Economy, Self::Premium];

    /// Row/column of this segment in a 2×2 mixing matrix.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Economy => 0,
            Self::Premium => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle name → segment.
pub type SegmentMap = BTreeMap<String, Segment>;

/// Keyword-based segment classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentClassifier {
    premium_keywords: Vec<String>,
}

impl SegmentClassifier {
    #[must_use]
    pub fn new<I, S>(premium_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            premium_keywords: premium_keywords.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SegmentConfig) -> Self {
        Self::new(config.premium_keywords.iter().cloned())
    }

    /// Classify a single vehicle name.
    #[must_use]
    pub fn classify(&self, vehicle: &str) -> Segment {
        if self
            .premium_keywords
            .iter()
            .any(|keyword| vehicle.contains(keyword.as_str()))
        {
            Segment::Premium
        } else {
            Segment::Economy
        }
    }

    /// Classify every vehicle in the catalog.
    #[must_use]
    pub fn classify_catalog(&self, catalog: &Catalog) -> SegmentMap {
        catalog
            .vehicles
            .iter()
            .map(|vehicle| (vehicle.clone(), self.classify(vehicle)))
            .collect()
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::from_config(&SegmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_brands_are_premium() {
        let classifier = SegmentClassifier::default();
        for name in [
            "Audi A3 8V",
            "BMW X3",
            "Mercedes C-Class",
            "Porsche Cayenne",
            "Volvo XC60",
            "Jeep Renegade",
        ] {
            assert_eq!(classifier.classify(name), Segment::Premium, "{name}");
        }
    }

    #[test]
    fn everything_else_is_economy() {
        let classifier = SegmentClassifier::default();
        for name in ["VW Golf Mk7", "Fiat Toro", "Renault Clio V", "Toyota RAV4"] {
            assert_eq!(classifier.classify(name), Segment::Economy, "{name}");
        }
    }

    #[test]
    fn match_is_case_sensitive() {
        let classifier = SegmentClassifier::default();
        assert_eq!(classifier.classify("audi a3"), Segment::Economy);
    }

    #[test]
    fn reference_fleet_split() {
        let catalog = Catalog::reference().expect("reference fleet");
        let segments = SegmentClassifier::default().classify_catalog(&catalog);
        let premium = segments
            .values()
            .filter(|segment| **segment == Segment::Premium)
            .count();
        assert_eq!(segments.len(), 36);
        assert_eq!(premium, 14);
    }

    #[test]
    fn custom_keywords() {
        let classifier = SegmentClassifier::new(["Lux"]);
        assert_eq!(classifier.classify("LuxCar"), Segment::Premium);
        assert_eq!(classifier.classify("Audi A3"), Segment::Economy);
    }

    #[test]
    fn matrix_indices() {
        assert_eq!(Segment::Economy.index(), 0);
        assert_eq!(Segment::Premium.index(), 1);
        assert_eq!(Segment::Premium.to_string(), "Premium");
    }
}
