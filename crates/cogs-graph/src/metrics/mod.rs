//! Structural metrics over the bipartite graph and the projection.
//!
//! # Overview
//!
//! Each metric answers one question about the fleet:
//!
//! - **Criticality** (`criticality`): Which parts would stop the most
//!   vehicles if their supplier failed?
//! - **Degree** (`degree`): Which vehicles share parts with the most
//!   other vehicles?
//! - **k-core** (`kcore`): Which vehicles form the densest platform core?
//! - **Assortativity** (`assortativity`): Do premium and economy vehicles
//!   share parts across segments, or stay apart?
//! - **Stock** (`stock`): How much inventory does part sharing save?
//! - **Summary** (`summary`): Size, density, connectivity, diameter.
//! - **Cuts** (`cuts`): Which links or vehicles are single points of
//!   failure in the projection?
//!
//! # Usage
//!
//! ```rust,ignore
//! use cogs_graph::graph::{BipartiteGraph, Projection};
//! use cogs_graph::metrics::{criticality::part_criticality, kcore::k_core_decomposition};
//!
//! let bipartite: BipartiteGraph = /* build graph */;
//! let projection = Projection::from_bipartite(&bipartite);
//!
//! let ranked = part_criticality(&bipartite);
//! let cores = k_core_decomposition(&projection);
//! ```

pub mod assortativity;
pub mod criticality;
pub mod cuts;
pub mod degree;
pub mod kcore;
pub mod stock;
pub mod summary;

pub use assortativity::{Assortativity, MixingMatrix, MixingVerdict, UndefinedReason, segment_assortativity};
pub use criticality::{PartCriticality, part_criticality, top_critical_parts, unused_parts};
pub use cuts::{CutStructure, cut_structure};
pub use degree::{VehicleDegree, vehicle_degrees};
pub use kcore::{KCoreResult, k_core_decomposition};
pub use stock::{StockSavings, stock_savings};
pub use summary::GraphSummary;
