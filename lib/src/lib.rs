#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::many_single_char_names)]
#![doc = include_str!("../../README.md")]

/// Errors reported before reconstruction begins.
pub mod error;
/// The evolving boundary of the reconstructed surface.
pub mod front;
/// Pure geometric primitives: circumscribed circle, candidate ball center,
/// orientation check.
pub mod geometry;
/// Load and save point clouds and meshes.
pub mod io;
/// Seed discovery and edge pivoting.
pub mod pivoter;
/// The uniform-grid spatial index used for radius queries.
pub mod spatial_index;

#[cfg(test)]
mod test;

pub use error::{InvalidInputKind, ReconstructionError};

use front::Front;
use glam::Vec3;
use log::{debug, info};
use pivoter::{UsedSet, emit, find_seed, pivot_edge};
use spatial_index::SpatialIndex;

/// The index of a sample within the cloud. Used everywhere in lieu of
/// pointers, per `spec.md` §9: "Re-architect around indices... No cycles
/// in ownership."
pub type VertexId = usize;

/// A 3-D position with an estimated unit surface normal. Immutable after
/// ingestion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Position of the sample.
    pub pos: Vec3,
    /// Estimated unit surface normal at the sample.
    pub normal: Vec3,
}

/// Tunable knobs for a single reconstruction run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// The ball radius ρ.
    pub radius: f32,
    /// Comparison epsilon used by collinearity/degeneracy checks.
    pub epsilon: f32,
}

impl EngineConfig {
    /// Builds a config with the default comparison epsilon
    /// ([`geometry::DEFAULT_EPSILON`]).
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            radius,
            epsilon: geometry::DEFAULT_EPSILON,
        }
    }
}

/// An emitted triangle: the three vertex indices into the original cloud,
/// in winding order, together with the ball center that produced it.
/// Immutable once emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// First vertex, in winding order.
    pub v0: VertexId,
    /// Second vertex, in winding order.
    pub v1: VertexId,
    /// Third vertex, in winding order.
    pub v2: VertexId,
    /// The ball center that produced this triangle.
    pub center: Vec3,
}

impl Triangle {
    /// The triangle's three vertices, in winding order.
    #[must_use]
    pub const fn vertices(&self) -> [VertexId; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// Whether the run produced a complete, empty, or partial reconstruction.
/// See `spec.md` §7 — only `InvalidInput` is an `Err`; the other two
/// outcomes are successful completions with a diagnostic flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconstructionStatus {
    /// At least one triangle was emitted and no Boundary edges remain.
    Complete,
    /// No seed triangle was found for the given ρ; zero triangles emitted.
    Empty,
    /// At least one triangle was emitted, but Boundary edges remain (the
    /// normal outcome for real data).
    Partial,
}

/// The result of a reconstruction run.
#[derive(Clone, Debug)]
pub struct ReconstructionReport {
    /// Triangles in the order the Driver discovered them.
    pub triangles: Vec<Triangle>,
    /// The residual Front: edges that could not be pivoted, available for
    /// diagnostics (`spec.md` §6).
    pub boundary_edges: Vec<(VertexId, VertexId)>,
    /// Which of the three outcomes in `spec.md` §7 this run produced.
    pub status: ReconstructionStatus,
}

fn validate(samples: &[Sample], config: EngineConfig) -> Result<(), ReconstructionError> {
    if samples.len() < 3 {
        return Err(InvalidInputKind::TooFewSamples {
            found: samples.len(),
        }
        .into());
    }
    if !(config.radius > 0.0) {
        return Err(InvalidInputKind::NonPositiveRadius {
            radius: config.radius,
        }
        .into());
    }
    for (index, s) in samples.iter().enumerate() {
        if !s.pos.is_finite() || !s.normal.is_finite() {
            return Err(InvalidInputKind::NonFiniteSample { index }.into());
        }
        if s.normal.length_squared() < config.epsilon * config.epsilon {
            return Err(InvalidInputKind::ZeroLengthNormal { index }.into());
        }
    }
    Ok(())
}

/// Reconstructs a triangular mesh from an oriented point cloud via
/// Ball-Pivoting.
///
/// Implements the main loop in `spec.md` §4.4.4: drain every Active edge by
/// pivoting it (emitting a triangle and feeding new edges back into the
/// Front on success, marking the edge Boundary on failure), then look for a
/// new seed triangle; stop when no seed can be found.
///
/// # Errors
/// Returns [`ReconstructionError::InvalidInput`] if `samples` has fewer
/// than 3 entries, `config.radius` is not positive, or any sample has a
/// non-finite coordinate/normal or a (near-)zero-length normal. No
/// triangles are emitted before this check runs.
pub fn reconstruct(
    samples: &[Sample],
    config: EngineConfig,
) -> Result<ReconstructionReport, ReconstructionError> {
    validate(samples, config)?;

    let index = SpatialIndex::new(samples, 2.0 * config.radius);
    let mut used = UsedSet::new(samples.len());
    let mut front = Front::new();
    let mut triangles = Vec::new();

    loop {
        while let Some(edge) = front.pop_active() {
            match pivot_edge(
                samples,
                &index,
                &front,
                edge.a,
                edge.b,
                edge.opposite,
                config.radius,
                config.epsilon,
            ) {
                Some(result) => {
                    used.mark_used(result.order[0]);
                    used.mark_used(result.order[1]);
                    used.mark_used(result.order[2]);
                    let (triangle, tri_edges) = emit(result.order, result.center);
                    debug!(
                        "edge-pivoted -> triangle ({}, {}, {})",
                        triangle.v0, triangle.v1, triangle.v2
                    );
                    triangles.push(triangle);
                    front.insert_triangle_edges(&tri_edges);
                }
                None => {
                    front.mark_boundary(edge.a, edge.b);
                    debug!("edge-boundary a={} b={}", edge.a, edge.b);
                }
            }
        }

        match find_seed(samples, &index, &mut used, config.radius, config.epsilon) {
            Some((order, center)) => {
                let (triangle, tri_edges) = emit(order, center);
                triangles.push(triangle);
                front.insert_triangle_edges(&tri_edges);
            }
            None => break,
        }
    }

    let boundary_edges: Vec<_> = front.boundary_edges().collect();
    let status = if triangles.is_empty() {
        ReconstructionStatus::Empty
    } else if boundary_edges.is_empty() {
        ReconstructionStatus::Complete
    } else {
        ReconstructionStatus::Partial
    };

    info!(
        "reconstruction finished: {} triangles, {} boundary edges, status={status:?}",
        triangles.len(),
        boundary_edges.len()
    );

    Ok(ReconstructionReport {
        triangles,
        boundary_edges,
        status,
    })
}
