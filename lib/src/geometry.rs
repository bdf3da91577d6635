//! Pure, deterministic geometric primitives underlying each pivot decision.
//!
//! Nothing in this module touches the spatial index, the front, or any
//! per-run state; every function takes positions/normals by value and
//! returns `Option` on geometric failure (collinearity, insufficient ρ).
//! These failures are not errors — see the crate-level error handling
//! notes — they are plain skip conditions for the caller.

use glam::Vec3;

/// Default comparison epsilon used when collinearity/degeneracy checks are
/// not given an explicit tolerance.
pub const DEFAULT_EPSILON: f32 = 1e-7;

/// The circumscribed circle of three (non-collinear) points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircumscribedCircle {
    /// Center of the circle, in the plane of the three points.
    pub center: Vec3,
    /// Radius of the circle.
    pub radius: f32,
}

/// Computes the circumscribed circle of `p0, p1, p2` using barycentric
/// weights (see `spec.md` §4.2 / original `Pivoter::getCircumscribedCircle`).
///
/// Returns `None` if the three points are collinear (within `epsilon`).
#[must_use]
pub fn circumscribed_circle(p0: Vec3, p1: Vec3, p2: Vec3, epsilon: f32) -> Option<CircumscribedCircle> {
    let d10 = p1 - p0;
    let d20 = p2 - p0;
    let d01 = p0 - p1;
    let d12 = p1 - p2;
    let d21 = p2 - p1;
    let d02 = p0 - p2;

    let norm01 = d01.length();
    let norm12 = d12.length();
    let norm02 = d02.length();

    let cross_norm = d01.cross(d12).length();
    if cross_norm < epsilon {
        return None;
    }

    let denom = 2.0 * cross_norm * cross_norm;
    let alpha = norm12 * norm12 * d01.dot(d02) / denom;
    let beta = norm02 * norm02 * d10.dot(d12) / denom;
    let gamma = norm01 * norm01 * d20.dot(d21) / denom;

    let center = alpha * p0 + beta * p1 + gamma * p2;
    let radius = (norm01 * norm12 * norm02) / (2.0 * cross_norm);

    Some(CircumscribedCircle { center, radius })
}

/// True iff the candidate face `normal` agrees with a majority of the three
/// vertex normals, i.e. at most one of the dot products is strictly
/// negative. This is the check that decides which winding makes the
/// triangle's normal point "outside".
#[must_use]
pub fn is_oriented(normal: Vec3, n0: Vec3, n1: Vec3, n2: Vec3) -> bool {
    let disagreeing = usize::from(n0.dot(normal) < 0.0)
        + usize::from(n1.dot(normal) < 0.0)
        + usize::from(n2.dot(normal) < 0.0);
    disagreeing <= 1
}

/// The candidate ball center above a (possibly reordered) triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateBall {
    /// The center of the ball resting tangentially on all three points.
    pub center: Vec3,
    /// True if `p0`/`p1` (and their normals) needed to be swapped to make
    /// the triangle's normal agree with the vertex normals.
    pub swapped: bool,
}

/// Computes the ball center above triangle `(p0, p1, p2)` with normals
/// `(n0, n1, n2)` for a ball of the given `radius`.
///
/// Implements `spec.md` §4.2's "Candidate ball center above triangle":
/// collinearity check, orientation check with a single reorder-and-retry,
/// circumcircle computation, and the height-above-plane solve. Returns
/// `None` if the points are collinear or if ρ is too small for the
/// triangle's circumradius.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn candidate_ball_center(
    p0: Vec3,
    n0: Vec3,
    p1: Vec3,
    n1: Vec3,
    p2: Vec3,
    n2: Vec3,
    radius: f32,
    epsilon: f32,
) -> Option<CandidateBall> {
    let normal = (p1 - p0).cross(p2 - p0);
    if normal.length() < epsilon {
        return None;
    }
    let normal = normal.normalize();

    // isOriented fails with the incoming order: swap p0<->p1 (and their
    // normals) so the recomputed face normal agrees with a majority of the
    // vertex normals, per spec.md §4.2 step 3.
    let (p0, p1, swapped) = if is_oriented(normal, n0, n1, n2) {
        (p0, p1, false)
    } else {
        (p1, p0, true)
    };

    let normal = (p1 - p0).cross(p2 - p0).normalize();
    let circle = circumscribed_circle(p0, p1, p2, epsilon)?;
    let height_squared = radius.mul_add(radius, -(circle.radius * circle.radius));
    if height_squared <= 0.0 {
        return None;
    }

    Some(CandidateBall {
        center: circle.center + normal * height_squared.sqrt(),
        swapped,
    })
}
