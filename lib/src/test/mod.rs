//! Scenario, boundary, and invariant tests, separate from the
//! implementation-local unit tests in each module.

mod invariants;
mod regression;

use glam::Vec3;

use crate::Sample;

pub(crate) fn flat(x: f32, y: f32, z: f32) -> Sample {
    Sample {
        pos: Vec3::new(x, y, z),
        normal: Vec3::new(0.0, 0.0, 1.0),
    }
}

/// A 5x5 grid of unit-spaced samples at z = 0, normals (0,0,1), row-major
/// (index = row * width + col). Used by both the S2 scenario and the
/// invariants sweep.
pub(crate) fn grid(width: usize, height: usize) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            samples.push(flat(col as f32, row as f32, 0.0));
        }
    }
    samples
}
