//! One-shot analysis pipeline.
//!
//! ```text
//! Catalog
//!   ↓ BipartiteGraph::from_catalog
//! BipartiteGraph ──→ criticality, stock savings, bipartite summary
//!   ↓ Projection::from_bipartite
//! Projection ──→ summary, degrees, communities, k-core, assortativity,
//!                backbone, cuts
//! communities ──→ demand forecast
//! top critical parts ──→ cascade
//! ```
//!
//! No stage mutates the output of another. The cascade works on its own
//! copy of the bipartite graph.

use anyhow::{Context, Result};
use cogs_core::{AnalysisConfig, Catalog, SegmentClassifier};
use serde::Serialize;
use tracing::{info, instrument};

use crate::backbone::maximum_spanning_forest;
use crate::community::{CommunityPartition, detect_communities};
use crate::demand::{DemandForecast, predict_demand};
use crate::graph::{BipartiteGraph, Projection};
use crate::metrics::{
    Assortativity, CutStructure, GraphSummary, KCoreResult, PartCriticality, StockSavings,
    VehicleDegree, cut_structure, k_core_decomposition, part_criticality, segment_assortativity,
    stock_savings, unused_parts, vehicle_degrees,
};
use crate::resilience::{CascadeTrace, cascade_of_top};

/// Every analysis of one catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// BLAKE3 hash of the bipartite graph the report was computed from.
    pub content_hash: String,
    pub bipartite: GraphSummary,
    pub projection: GraphSummary,
    pub criticality: Vec<PartCriticality>,
    pub unused_parts: Vec<String>,
    pub degrees: Vec<VehicleDegree>,
    pub communities: CommunityPartition,
    pub k_core: KCoreResult,
    pub assortativity: Assortativity,
    pub backbone: Projection,
    pub cuts: CutStructure,
    pub cascade: CascadeTrace,
    pub stock: StockSavings,
    pub demand: DemandForecast,
}

/// Run every analysis over `catalog` with the given configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the catalog does
/// not form a consistent graph (unknown or duplicate names).
#[instrument(skip(catalog, config), fields(vehicles = catalog.vehicle_count(), parts = catalog.part_count()))]
pub fn analyze(catalog: &Catalog, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate().context("Invalid analysis configuration")?;

    let bipartite =
        BipartiteGraph::from_catalog(catalog).context("Failed to build the bipartite graph")?;
    let projection = Projection::from_bipartite(&bipartite);
    info!(
        vehicles = projection.vehicle_count(),
        edges = projection.edge_count(),
        "graphs built"
    );

    let segments = SegmentClassifier::from_config(&config.segments).classify_catalog(catalog);
    let communities = detect_communities(&projection);
    let demand = predict_demand(&bipartite, &communities, config.demand_threshold);

    let report = AnalysisReport {
        content_hash: bipartite.content_hash.clone(),
        bipartite: GraphSummary::of_bipartite(&bipartite),
        projection: GraphSummary::of_projection(&projection),
        criticality: part_criticality(&bipartite),
        unused_parts: unused_parts(&bipartite),
        degrees: vehicle_degrees(&projection),
        k_core: k_core_decomposition(&projection),
        assortativity: segment_assortativity(&projection, &segments, config.stratification_cutoff),
        backbone: maximum_spanning_forest(&projection),
        cuts: cut_structure(&projection),
        cascade: cascade_of_top(&bipartite, config.cascade_depth),
        stock: stock_savings(&bipartite),
        communities,
        demand,
    };

    info!(
        communities = report.communities.len(),
        k_max = report.k_core.k_max,
        "analysis complete"
    );
    Ok(report)
}
