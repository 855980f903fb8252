//! Supply disruption scenarios.
//!
//! # Overview
//!
//! Every scenario works on a copy of the bipartite graph and rebuilds the
//! projection to see how the vehicle network holds up:
//!
//! - **Part failure** (`failure::part_failure`): which vehicles stop when a
//!   single part is gone.
//! - **Supplier collapse** (`failure::supplier_collapse`): a set of parts
//!   disappears at once; how fragmented is the network?
//! - **Cascade** (`cascade::simulate_cascade`): parts fail one after another;
//!   how fast does the giant component shrink?

pub mod cascade;
pub mod failure;

pub use cascade::{CascadeStep, CascadeTrace, cascade_of_top, simulate_cascade};
pub use failure::{CollapseImpact, PartFailure, part_failure, supplier_collapse};
