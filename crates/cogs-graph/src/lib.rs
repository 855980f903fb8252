#![forbid(unsafe_code)]
//! cogs-graph library.
//!
//! Supply-chain analytics over the vehicle/part relation: the bipartite
//! graph, its weighted vehicle projection, and every analysis built on
//! them (criticality, communities, k-core, assortativity, backbone,
//! disruption scenarios, stock savings, demand forecast).
//!
//! # Conventions
//!
//! - **Errors**: `CatalogError` from graph construction, `anyhow::Result`
//!   from the pipeline. Empty or degenerate graphs are never errors; they
//!   produce `None` or an explicit `Undefined` value instead.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Ordering**: Every result is deterministic. Ties are broken by
//!   catalog order.

pub mod backbone;
pub mod community;
pub mod demand;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod resilience;

pub use community::{CommunityPartition, detect_communities, modularity};
pub use graph::{BipartiteGraph, NodeKind, ProjectedEdge, Projection, SharedParts};
pub use pipeline::{AnalysisReport, analyze};
