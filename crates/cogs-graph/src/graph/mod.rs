//! Graph construction for the analytics engine.
//!
//! # Overview
//!
//! This module turns a [`cogs_core::Catalog`] into the two graphs every
//! analysis consumes: the typed vehicle/part bipartite graph and the
//! weighted vehicle-to-vehicle projection.
//!
//! ## Pipeline
//!
//! ```text
//! Catalog (vehicles, parts, usages)
//!        ↓  bipartite::BipartiteGraph::from_catalog()
//! BipartiteGraph (StableUnGraph<NodeKind, ()>)
//!        ↓  projection::Projection::from_bipartite()
//! Projection (UnGraph<String, SharedParts>)
//!   ├─ weight:  number of shared parts
//!   └─ payload: shared part names, catalog order
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use cogs_core::Catalog;
//! use cogs_graph::graph::{BipartiteGraph, Projection};
//!
//! let catalog = Catalog::reference()?;
//! let bipartite = BipartiteGraph::from_catalog(&catalog)?;
//! let projection = Projection::from_bipartite(&bipartite);
//!
//! println!("vehicles={} edges={} hash={}",
//!     projection.vehicle_count(), projection.edge_count(), bipartite.content_hash);
//! ```

pub mod bipartite;
pub mod projection;
pub(crate) mod traverse;

// Re-export primary types at module level for convenience.
pub use bipartite::{BipartiteGraph, NodeKind};
pub use projection::{ProjectedEdge, Projection, SharedParts};
