//! Property checks against a reconstruction's output, independent of the
//! exact order triangles were discovered in.

use std::collections::HashMap;

use crate::front::EdgeKey;
use crate::geometry::is_oriented;
use crate::test::grid;
use crate::{EngineConfig, reconstruct};

/// Test slack in the empty-ball / circumradius checks, to absorb
/// floating-point rounding in the tangency computation.
const SLACK: f32 = 1e-3;

#[test]
fn every_triangle_is_tangent_to_its_ball_center_at_radius() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let report = reconstruct(&samples, EngineConfig::new(radius)).unwrap();
    assert!(!report.triangles.is_empty());

    for t in &report.triangles {
        for v in t.vertices() {
            let d = (samples[v].pos - t.center).length();
            assert!(
                (d - radius).abs() < SLACK,
                "vertex {v} is distance {d} from the ball center, expected ~{radius}"
            );
        }
    }
}

#[test]
fn no_untriangulated_sample_lies_strictly_inside_any_ball() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let report = reconstruct(&samples, EngineConfig::new(radius)).unwrap();

    for t in &report.triangles {
        let verts = t.vertices();
        for (id, s) in samples.iter().enumerate() {
            if verts.contains(&id) {
                continue;
            }
            let d = (s.pos - t.center).length();
            assert!(
                d >= radius - SLACK,
                "sample {id} at distance {d} lies inside the ball of triangle {verts:?}"
            );
        }
    }
}

#[test]
fn every_triangle_winding_agrees_with_majority_of_vertex_normals() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let report = reconstruct(&samples, EngineConfig::new(radius)).unwrap();

    for t in &report.triangles {
        let [v0, v1, v2] = t.vertices();
        let p0 = samples[v0].pos;
        let p1 = samples[v1].pos;
        let p2 = samples[v2].pos;
        let normal = (p1 - p0).cross(p2 - p0).normalize();
        assert!(is_oriented(
            normal,
            samples[v0].normal,
            samples[v1].normal,
            samples[v2].normal
        ));
    }
}

#[test]
fn every_triangle_edge_is_boundary_or_shared_by_exactly_two_triangles() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let report = reconstruct(&samples, EngineConfig::new(radius)).unwrap();

    let mut occurrences: HashMap<EdgeKey, usize> = HashMap::new();
    for t in &report.triangles {
        let [v0, v1, v2] = t.vertices();
        for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
            *occurrences.entry(EdgeKey::new(a, b)).or_insert(0) += 1;
        }
    }

    let boundary: std::collections::HashSet<EdgeKey> = report
        .boundary_edges
        .iter()
        .map(|&(a, b)| EdgeKey::new(a, b))
        .collect();

    for (key, count) in &occurrences {
        if boundary.contains(key) {
            assert_eq!(*count, 1, "boundary edge should back exactly one triangle");
        } else {
            assert_eq!(*count, 2, "interior edge should back exactly two triangles");
        }
    }
}

#[test]
fn every_triangle_circumradius_is_at_most_the_ball_radius() {
    use crate::geometry::circumscribed_circle;

    let samples = grid(5, 5);
    let radius = 0.75;
    let report = reconstruct(&samples, EngineConfig::new(radius)).unwrap();
    assert!(!report.triangles.is_empty());

    for t in &report.triangles {
        let [v0, v1, v2] = t.vertices();
        let circle = circumscribed_circle(
            samples[v0].pos,
            samples[v1].pos,
            samples[v2].pos,
            crate::geometry::DEFAULT_EPSILON,
        )
        .expect("an emitted triangle's vertices must be non-collinear");
        assert!(
            circle.radius <= radius + SLACK,
            "triangle {:?} has circumradius {} > ball radius {radius}",
            t.vertices(),
            circle.radius
        );
    }
}

#[test]
fn reconstructing_just_the_triangulated_vertices_is_at_least_as_large() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let first = reconstruct(&samples, EngineConfig::new(radius)).unwrap();
    assert!(!first.triangles.is_empty());

    let mut triangulated_ids: Vec<_> = first
        .triangles
        .iter()
        .flat_map(|t| t.vertices())
        .collect();
    triangulated_ids.sort_unstable();
    triangulated_ids.dedup();

    let subset: Vec<_> = triangulated_ids.iter().map(|&id| samples[id]).collect();
    let second = reconstruct(&subset, EngineConfig::new(radius)).unwrap();

    assert!(
        second.triangles.len() >= first.triangles.len(),
        "re-running on the triangulated vertex set alone produced fewer \
         triangles ({}) than the original run ({})",
        second.triangles.len(),
        first.triangles.len()
    );
}

#[test]
fn rerunning_reconstruction_on_the_same_input_is_deterministic() {
    let samples = grid(5, 5);
    let radius = 0.75;
    let first = reconstruct(&samples, EngineConfig::new(radius)).unwrap();
    let second = reconstruct(&samples, EngineConfig::new(radius)).unwrap();

    assert_eq!(first.triangles.len(), second.triangles.len());
    for (a, b) in first.triangles.iter().zip(second.triangles.iter()) {
        assert_eq!(a.vertices(), b.vertices());
        assert!((a.center - b.center).length() < 1e-6);
    }
    assert_eq!(first.boundary_edges, second.boundary_edges);
}
