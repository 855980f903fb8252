//! The static vehicle/part catalog.
//!
//! # Overview
//!
//! A [`Catalog`] is plain data: an ordered list of vehicles, an ordered list
//! of parts, and the usage relation between them. Catalog order matters:
//! every analysis downstream breaks ties by it, so two catalogs with the same
//! contents in a different order may rank equal-scoring parts differently.
//!
//! Catalogs are not validated here. Dangling usage references and duplicate
//! names are rejected when the bipartite graph is built, so a broken catalog
//! always fails the analysis run instead of silently losing edges.
//!
//! # File Format
//!
//! ```toml
//! vehicles = ["VW Golf Mk7", "Audi A3 8V"]
//! parts = ["Plataforma MQB", "Motor EA888 2.0T"]
//!
//! [[usage]]
//! vehicle = "VW Golf Mk7"
//! parts = ["Plataforma MQB", "Motor EA888 2.0T"]
//! ```
//!
//! Each `[[usage]]` table lists the parts used by one vehicle. A vehicle may
//! appear in several tables; the entries are concatenated in file order.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;

/// The built-in reference fleet (36 vehicles, 48 parts).
const REFERENCE_FLEET: &str = include_str!("../data/reference_fleet.toml");

/// One "vehicle uses part" relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Usage {
    pub vehicle: String,
    pub part: String,
}

impl Usage {
    #[must_use]
    pub fn new(vehicle: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            vehicle: vehicle.into(),
            part: part.into(),
        }
    }
}

/// Vehicles, parts, and the usage relation between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Vehicle names in catalog order.
    pub vehicles: Vec<String>,
    /// Part names in catalog order.
    pub parts: Vec<String>,
    /// Usage relations in file order. May contain duplicates.
    pub usages: Vec<Usage>,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    vehicles: Vec<String>,
    #[serde(default)]
    parts: Vec<String>,
    #[serde(default)]
    usage: Vec<UsageTable>,
}

#[derive(Debug, Deserialize)]
struct UsageTable {
    vehicle: String,
    #[serde(default)]
    parts: Vec<String>,
}

impl Catalog {
    /// Build a catalog from in-memory lists.
    #[must_use]
    pub fn new<V, P, S>(vehicles: V, parts: P, usages: Vec<Usage>) -> Self
    where
        V: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vehicles: vehicles.into_iter().map(Into::into).collect(),
            parts: parts.into_iter().map(Into::into).collect(),
            usages,
        }
    }

    /// The built-in reference fleet.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded document is malformed, which
    /// the crate's own tests rule out.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::from_toml_str(REFERENCE_FLEET)
    }

    /// Parse a catalog from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the document is not valid TOML or
    /// does not match the catalog shape.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;

        let usages = file
            .usage
            .into_iter()
            .flat_map(|table| {
                let vehicle = table.vehicle;
                table
                    .parts
                    .into_iter()
                    .map(move |part| Usage::new(vehicle.clone(), part))
            })
            .collect();

        Ok(Self {
            vehicles: file.vehicles,
            parts: file.parts,
            usages,
        })
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let catalog = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(
            path = %path.display(),
            vehicles = catalog.vehicles.len(),
            parts = catalog.parts.len(),
            usages = catalog.usages.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Number of vehicles in the catalog.
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of parts in the catalog.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn reference_fleet_parses() {
        let catalog = Catalog::reference().expect("reference fleet");
        assert_eq!(catalog.vehicle_count(), 36);
        assert_eq!(catalog.part_count(), 48);
        assert_eq!(catalog.usages.len(), 140);
        assert_eq!(catalog.vehicles[0], "VW Golf Mk6");
        assert_eq!(catalog.parts[0], "Motor EA111 1.6");
    }

    #[test]
    fn reference_fleet_references_are_closed() {
        let catalog = Catalog::reference().expect("reference fleet");
        let vehicles: HashSet<&str> = catalog.vehicles.iter().map(String::as_str).collect();
        let parts: HashSet<&str> = catalog.parts.iter().map(String::as_str).collect();
        for usage in &catalog.usages {
            assert!(vehicles.contains(usage.vehicle.as_str()), "{}", usage.vehicle);
            assert!(parts.contains(usage.part.as_str()), "{}", usage.part);
        }
    }

    #[test]
    fn usage_tables_are_flattened_in_order() {
        let catalog = Catalog::from_toml_str(
            r#"
vehicles = ["A", "B"]
parts = ["x", "y"]

[[usage]]
vehicle = "A"
parts = ["x", "y"]

[[usage]]
vehicle = "B"
parts = ["y"]

[[usage]]
vehicle = "A"
parts = ["x"]
"#,
        )
        .expect("parse");

        assert_eq!(
            catalog.usages,
            vec![
                Usage::new("A", "x"),
                Usage::new("A", "y"),
                Usage::new("B", "y"),
                Usage::new("A", "x"),
            ]
        );
    }

    #[test]
    fn empty_document_is_an_empty_catalog() {
        let catalog = Catalog::from_toml_str("").expect("parse");
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Catalog::from_toml_str("vehicles = 3").expect_err("must fail");
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fleet.toml");
        std::fs::write(
            &path,
            "vehicles = [\"A\"]\nparts = [\"x\"]\n[[usage]]\nvehicle = \"A\"\nparts = [\"x\"]\n",
        )
        .expect("write");

        let catalog = Catalog::load(&path).expect("load");
        assert_eq!(catalog.usages, vec![Usage::new("A", "x")]);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let err = Catalog::load(&path).expect_err("must fail");
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
