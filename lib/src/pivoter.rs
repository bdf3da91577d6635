//! The state machine that finds seed triangles, drives edge pivoting, and
//! emits triangles.
//!
//! The engine's mutable run state (the Used-set and the kd-tree-like index
//! in the original source) lived on the `Pivoter` object itself; `spec.md`
//! §9 calls this out as global mutable state to re-architect as an
//! explicit value threaded through operations. Here that value is
//! [`UsedSet`], constructed fresh per call to [`reconstruct_core`] and
//! never stored anywhere else.

use std::f32::consts::TAU;

use glam::Vec3;
use log::{debug, trace};

use crate::front::{Front, TriangleEdges};
use crate::geometry::{candidate_ball_center, is_oriented};
use crate::{Sample, Triangle, VertexId};

/// The Used-set: `used(i)` becomes `true` once sample `i` has been
/// incorporated into any emitted triangle. Monotonic — bits only flip
/// false to true.
#[derive(Clone, Debug)]
pub struct UsedSet(Vec<bool>);

impl UsedSet {
    /// A fresh, all-`false` used-set for `n` samples.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self(vec![false; n])
    }

    /// Whether sample `v` has appeared in an emitted triangle yet.
    #[must_use]
    pub fn is_used(&self, v: VertexId) -> bool {
        self.0[v]
    }

    /// Marks sample `v` as used. Idempotent.
    pub fn mark_used(&mut self, v: VertexId) {
        self.0[v] = true;
    }
}

/// `isEmpty` from `spec.md` §4.4.3: true iff every element of
/// `neighbor_ids` is one of the three excluded vertices.
#[must_use]
fn ball_is_empty(neighbor_ids: &[VertexId], excl: [VertexId; 3]) -> bool {
    if neighbor_ids.len() > 3 {
        return false;
    }
    neighbor_ids.iter().all(|id| excl.contains(id))
}

/// Attempts to find a seed triangle: three mutually-unused samples whose
/// candidate ball is empty. Marks the three chosen samples used and
/// returns their winding order and ball center. See `spec.md` §4.4.1.
pub fn find_seed(
    samples: &[Sample],
    index: &crate::spatial_index::SpatialIndex<'_>,
    used: &mut UsedSet,
    radius: f32,
    epsilon: f32,
) -> Option<([VertexId; 3], Vec3)> {
    for i0 in 0..samples.len() {
        if used.is_used(i0) {
            continue;
        }

        let mut neighbors: Vec<VertexId> = index
            .radius_search(samples[i0].pos, 2.0 * radius)
            .into_iter()
            .filter(|&n| n != i0 && !used.is_used(n))
            .collect();
        neighbors.sort_unstable();
        if neighbors.len() < 2 {
            continue;
        }

        for j_pos in 0..neighbors.len() {
            for k_pos in (j_pos + 1)..neighbors.len() {
                let j = neighbors[j_pos];
                let k = neighbors[k_pos];

                let Some(ball) = candidate_ball_center(
                    samples[i0].pos,
                    samples[i0].normal,
                    samples[j].pos,
                    samples[j].normal,
                    samples[k].pos,
                    samples[k].normal,
                    radius,
                    epsilon,
                ) else {
                    trace!("candidate-discarded-collinear i0={i0} j={j} k={k}");
                    continue;
                };

                let ball_neighbors = index.radius_search(ball.center, radius);
                if !ball_is_empty(&ball_neighbors, [i0, j, k]) {
                    trace!("candidate-discarded-neighbors i0={i0} j={j} k={k}");
                    continue;
                }

                let order = if ball.swapped { [j, i0, k] } else { [i0, j, k] };
                used.mark_used(order[0]);
                used.mark_used(order[1]);
                used.mark_used(order[2]);
                debug!("seed-found {order:?} center={:?}", ball.center);
                return Some((order, ball.center));
            }
        }
    }
    None
}

/// The result of a successful pivot: the new vertex, its ball center, and
/// the emitted triangle's winding order.
pub struct PivotResult {
    /// Winding order of the newly emitted triangle.
    pub order: [VertexId; 3],
    /// The new triangle's ball center.
    pub center: Vec3,
}

/// Attempts to pivot the given Active edge `(a, b)` with opposite vertex
/// `opposite` and ball center `edge_center` about its axis, looking for the
/// neighbor with the smallest pivoting angle that yields a valid,
/// empty-ball triangle. See `spec.md` §4.4.2.
///
/// Implements the angle computation in the full `[0, 2π)` range via
/// `atan2` against an explicitly normalized in-plane basis (`edge_dir`,
/// `zero_dir`, and their cross product), rather than the original source's
/// `acos`-plus-correction, which `spec.md` §9 flags as likely unable to
/// distinguish the two sides of the pivoting plane.
#[allow(clippy::too_many_arguments)]
pub fn pivot_edge(
    samples: &[Sample],
    index: &crate::spatial_index::SpatialIndex<'_>,
    front: &Front,
    a: VertexId,
    b: VertexId,
    opposite: VertexId,
    radius: f32,
    epsilon: f32,
) -> Option<PivotResult> {
    let pa = samples[a].pos;
    let pb = samples[b].pos;
    let m = (pa + pb) / 2.0;

    let edge_dir = (pb - pa).normalize();
    let raw_zero = samples[opposite].pos - m;
    let zero_in_plane = raw_zero - edge_dir * edge_dir.dot(raw_zero);
    if zero_in_plane.length_squared() < epsilon * epsilon {
        return None;
    }
    let zero_dir = zero_in_plane.normalize();
    let w = edge_dir.cross(zero_dir);

    let neighborhood = index.radius_search(m, 2.0 * radius);

    let mut best_angle = f32::MAX;
    let mut best: Option<PivotResult> = None;

    for j in neighborhood {
        if j == a || j == b || j == opposite {
            continue;
        }

        let pj = samples[j].pos;
        let dist_from_plane = (pj - m).dot(edge_dir).abs();
        if dist_from_plane > radius {
            trace!("candidate-discarded-range edge=({a},{b}) j={j}");
            continue;
        }

        let Some(ball) = candidate_ball_center(
            pa,
            samples[a].normal,
            pj,
            samples[j].normal,
            pb,
            samples[b].normal,
            radius,
            epsilon,
        ) else {
            trace!("candidate-discarded-collinear edge=({a},{b}) j={j}");
            continue;
        };

        let order = if ball.swapped { [j, a, b] } else { [a, j, b] };

        let ball_neighbors = index.radius_search(ball.center, radius);
        if !ball_is_empty(&ball_neighbors, order) {
            trace!("candidate-discarded-neighbors edge=({a},{b}) j={j}");
            continue;
        }

        // Step 4d: re-run isOriented against the fixed (v0, j, v1) winding,
        // with no swap-and-retry this time. candidate_ball_center's own
        // single retry (geometry.rs) always finds *some* agreeing winding,
        // so it can never reject a candidate on orientation alone; this
        // fixed-order check is the one that actually can, matching both
        // ground truths: the original `Pivoter::pivot`'s orientation test
        // on the untouched (v0, j, v1) order, and the teacher's
        // `ball_pivot`'s `new_face_normal.dot(normal) < 0.0` skip.
        let fixed_normal = (pj - pa).cross(pb - pa).normalize();
        if !is_oriented(
            fixed_normal,
            samples[a].normal,
            samples[j].normal,
            samples[b].normal,
        ) {
            trace!("candidate-discarded-normal edge=({a},{b}) j={j}");
            continue;
        }

        // A point already joined to v0 or v1 by a frozen (interior) edge
        // cannot be reused here without violating Front keyed-uniqueness
        // (I1): the {v0,j} or {v1,j} slot is already occupied by a
        // different triangle. Not in the original paper, but present in
        // the teacher's port (`grid.rs::ball_pivot`'s "inner edge exists"
        // check) for exactly this reason.
        let blocks_a = front
            .get(a, j)
            .is_some_and(|e| e.status != crate::front::EdgeStatus::Active);
        let blocks_b = front
            .get(b, j)
            .is_some_and(|e| e.status != crate::front::EdgeStatus::Active);
        if blocks_a || blocks_b {
            trace!("candidate-discarded-front-occupied edge=({a},{b}) j={j}");
            continue;
        }

        let raw = ball.center - m;
        let in_plane = raw - edge_dir * edge_dir.dot(raw);
        if in_plane.length_squared() < epsilon * epsilon {
            continue;
        }
        let t = in_plane.normalize();

        let mut angle = t.dot(w).atan2(t.dot(zero_dir));
        if angle < 0.0 {
            angle += TAU;
        }

        if angle < best_angle {
            best_angle = angle;
            best = Some(PivotResult {
                order,
                center: ball.center,
            });
        }
    }

    best
}

/// Converts a just-emitted triangle's winding order and ball center into a
/// [`Front`]-ready record, and returns the output [`Triangle`].
#[must_use]
pub fn emit(order: [VertexId; 3], center: Vec3) -> (Triangle, TriangleEdges) {
    (
        Triangle {
            v0: order[0],
            v1: order[1],
            v2: order[2],
            center,
        },
        TriangleEdges {
            vertices: order,
            center,
        },
    )
}
