//! Command handlers, one module per command group.

pub mod economics;
pub mod overview;
pub mod report;
pub mod resilience;
pub mod structure;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cogs_core::{AnalysisConfig, Catalog};
use cogs_graph::{BipartiteGraph, Projection};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "cogs.toml";

/// Catalog and configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub catalog: Catalog,
    pub config: AnalysisConfig,
}

impl Inputs {
    /// Load the catalog (built-in reference fleet when `catalog` is `None`)
    /// and the configuration with `COGS_*` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, or an
    /// environment override is malformed.
    pub fn load(catalog: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let catalog = match catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::reference().context("Failed to load the reference fleet")?,
        };

        let config_path = config.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        let config = AnalysisConfig::load(&config_path)?.with_env_overrides()?;
        debug!(
            config = %config_path.display(),
            vehicles = catalog.vehicle_count(),
            parts = catalog.part_count(),
            "inputs loaded"
        );

        Ok(Self { catalog, config })
    }

    /// The configuration after command-line overrides, validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an override or loaded value is out of range.
    pub fn config_with(&self, apply: impl FnOnce(&mut AnalysisConfig)) -> Result<AnalysisConfig> {
        let mut config = self.config.clone();
        apply(&mut config);
        config.validate().context("Invalid analysis configuration")?;
        Ok(config)
    }

    /// Build the bipartite graph of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if a usage references an unknown name or a name is
    /// listed twice.
    pub fn bipartite(&self) -> Result<BipartiteGraph> {
        BipartiteGraph::from_catalog(&self.catalog).context("Failed to build the bipartite graph")
    }

    /// Build both graphs.
    ///
    /// # Errors
    ///
    /// See [`Inputs::bipartite`].
    pub fn graphs(&self) -> Result<(BipartiteGraph, Projection)> {
        let bipartite = self.bipartite()?;
        let projection = Projection::from_bipartite(&bipartite);
        Ok((bipartite, projection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_paths_fall_back_to_reference_and_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = dir.path().join("absent.toml");
        let inputs = Inputs::load(None, Some(&config)).expect("load");
        assert_eq!(inputs.catalog.vehicle_count(), 36);
        assert_eq!(inputs.catalog.part_count(), 48);
    }

    #[test]
    fn catalog_file_is_read() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("fleet.toml");
        fs::write(
            &path,
            "vehicles = [\"A\", \"B\"]\nparts = [\"P\"]\n\n[[usage]]\nvehicle = \"A\"\nparts = [\"P\"]\n",
        )
        .expect("write");
        let config = dir.path().join("absent.toml");

        let inputs = Inputs::load(Some(&path), Some(&config)).expect("load");
        let (bipartite, projection) = inputs.graphs().expect("graphs");
        assert_eq!(bipartite.edge_count(), 1);
        assert_eq!(projection.vehicle_count(), 1);
    }

    #[test]
    fn overrides_are_validated() {
        let dir = TempDir::new().expect("tempdir");
        let config = dir.path().join("absent.toml");
        let inputs = Inputs::load(None, Some(&config)).expect("load");

        let ok = inputs.config_with(|c| c.demand_threshold = 0.5).expect("valid");
        assert!((ok.demand_threshold - 0.5).abs() < f64::EPSILON);

        let err = inputs
            .config_with(|c| c.stratification_cutoff = 1.5)
            .expect_err("out of range");
        assert!(format!("{err:#}").contains("Invalid analysis configuration"));
    }
}
