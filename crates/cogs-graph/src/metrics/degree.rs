//! Vehicle degree ranking on the projection.

use serde::Serialize;

use crate::graph::projection::Projection;

/// Connectivity of one vehicle in the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleDegree {
    pub vehicle: String,
    /// Number of vehicles sharing at least one part with this one.
    pub degree: usize,
    /// Sum of shared-part weights over all neighbors.
    pub strength: usize,
}

/// Rank projection vehicles by neighbor count, descending.
///
/// Equal degrees keep catalog order.
#[must_use]
pub fn vehicle_degrees(projection: &Projection) -> Vec<VehicleDegree> {
    let mut ranked: Vec<VehicleDegree> = projection
        .graph()
        .node_indices()
        .map(|idx| VehicleDegree {
            vehicle: projection.graph()[idx].clone(),
            degree: projection.graph().neighbors(idx).count(),
            strength: projection.strength_of(idx),
        })
        .collect();

    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
    ranked
}
