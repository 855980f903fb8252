//! Segment assortativity of the projection.
//!
//! # Overview
//!
//! Answers "do premium vehicles share parts mostly with other premium
//! vehicles?". Each projected edge `(u, v, w)` adds `w` to the mixing mass
//! `M[s_u][s_v]` and to `M[s_v][s_u]`, where index 0 is
//! [`Segment::Economy`] and 1 is [`Segment::Premium`].
//!
//! With `T = ΣM` and row sums `a` (equal to the column sums, `M` is
//! symmetric):
//!
//! ```text
//! r = (T·tr(M) − Σ aᵢ²) / (T² − Σ aᵢ²)
//! ```
//!
//! which is the normalized form `(tr(e) − Σ(e·e)) / (1 − Σ(e·e))` with
//! `e = M / T` multiplied through by `T²`. The masses are integers, so both
//! sides are computed exactly and `r` is only rounded once. Two groups
//! that never share parts across segments give exactly `1.0`.
//!
//! ## Undefined Cases
//!
//! The coefficient does not exist when the projection has no edges, or
//! when all edge mass sits in one segment (the denominator is zero). Those
//! are reported as [`Assortativity::Undefined`], never as `0.0`.

use cogs_core::{Segment, SegmentMap};
use nalgebra::Matrix2;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::projection::Projection;

/// Weighted 2×2 segment mixing masses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MixingMatrix {
    /// `mass[i][j]`: summed edge weight between segment `i` and `j`,
    /// counted in both directions.
    pub mass: [[usize; 2]; 2],
    /// Sum of all entries.
    pub total: usize,
}

impl MixingMatrix {
    /// Accumulate the mixing masses of a projection.
    ///
    /// Edges touching an unlabeled vehicle are ignored.
    #[must_use]
    pub fn from_projection(projection: &Projection, segments: &SegmentMap) -> Self {
        let mut mixing = Self::default();
        for edge in projection.graph().edge_references() {
            let su = segments.get(&projection.graph()[edge.source()]);
            let sv = segments.get(&projection.graph()[edge.target()]);
            if let (Some(su), Some(sv)) = (su, sv) {
                let w = edge.weight().weight;
                mixing.mass[su.index()][sv.index()] += w;
                mixing.mass[sv.index()][su.index()] += w;
                mixing.total += 2 * w;
            }
        }
        mixing
    }

    /// Mass between two segments.
    #[must_use]
    pub const fn get(&self, a: Segment, b: Segment) -> usize {
        self.mass[a.index()][b.index()]
    }

    /// Joint probability matrix `e = M / T`. All zeros when `T == 0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized(&self) -> Matrix2<f64> {
        if self.total == 0 {
            return Matrix2::zeros();
        }
        let total = self.total as f64;
        Matrix2::from_fn(|i, j| self.mass[i][j] as f64 / total)
    }

    /// True when a single segment carries every unit of edge mass.
    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        self.total > 0
            && Segment::ALL
                .iter()
                .any(|s| self.mass[s.index()].iter().sum::<usize>() == self.total)
    }

    fn as_integer_matrix(&self) -> Matrix2<i128> {
        Matrix2::from_fn(|i, j| i128::try_from(self.mass[i][j]).unwrap_or(i128::MAX))
    }
}

/// Interpretation of a defined coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MixingVerdict {
    /// Vehicles share parts mostly within their own segment.
    Stratified,
    /// Part sharing crosses segments freely.
    Homogenized,
}

impl MixingVerdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stratified => "stratified",
            Self::Homogenized => "homogenized",
        }
    }

    /// `r > cutoff` is stratified, everything else homogenized.
    #[must_use]
    pub fn classify(coefficient: f64, cutoff: f64) -> Self {
        if coefficient > cutoff {
            Self::Stratified
        } else {
            Self::Homogenized
        }
    }
}

/// Why the coefficient could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// The projection has no edges.
    NoEdges,
    /// All edge mass sits in one segment.
    SingleSegment,
    /// A projection vehicle has no segment label.
    UnlabeledVehicle { vehicle: String },
}

/// Segment assortativity result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assortativity {
    Defined {
        /// Coefficient in `[-1, 1]`.
        coefficient: f64,
        verdict: MixingVerdict,
        mixing: MixingMatrix,
    },
    Undefined {
        reason: UndefinedReason,
        mixing: MixingMatrix,
    },
}

impl Assortativity {
    #[must_use]
    pub const fn coefficient(&self) -> Option<f64> {
        match self {
            Self::Defined { coefficient, .. } => Some(*coefficient),
            Self::Undefined { .. } => None,
        }
    }

    #[must_use]
    pub const fn verdict(&self) -> Option<MixingVerdict> {
        match self {
            Self::Defined { verdict, .. } => Some(*verdict),
            Self::Undefined { .. } => None,
        }
    }

    #[must_use]
    pub const fn mixing(&self) -> &MixingMatrix {
        match self {
            Self::Defined { mixing, .. } | Self::Undefined { mixing, .. } => mixing,
        }
    }
}

/// Compute the weighted segment assortativity of a projection.
///
/// `cutoff` separates [`MixingVerdict::Stratified`] from
/// [`MixingVerdict::Homogenized`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(projection, segments), fields(edges = projection.edge_count()))]
pub fn segment_assortativity(
    projection: &Projection,
    segments: &SegmentMap,
    cutoff: f64,
) -> Assortativity {
    let mixing = MixingMatrix::from_projection(projection, segments);

    if let Some(vehicle) = projection.vehicles().find(|v| !segments.contains_key(*v)) {
        return Assortativity::Undefined {
            reason: UndefinedReason::UnlabeledVehicle {
                vehicle: vehicle.to_string(),
            },
            mixing,
        };
    }
    if mixing.total == 0 {
        return Assortativity::Undefined {
            reason: UndefinedReason::NoEdges,
            mixing,
        };
    }
    if mixing.is_single_segment() {
        return Assortativity::Undefined {
            reason: UndefinedReason::SingleSegment,
            mixing,
        };
    }

    let m = mixing.as_integer_matrix();
    let total = m.sum();
    let squared_marginals = (m * m).sum();
    let numerator = total * m.trace() - squared_marginals;
    let denominator = total * total - squared_marginals;

    let coefficient = numerator as f64 / denominator as f64;
    let verdict = MixingVerdict::classify(coefficient, cutoff);
    debug!(coefficient, ?verdict, "segment assortativity");

    Assortativity::Defined {
        coefficient,
        verdict,
        mixing,
    }
}
