//! Larger worked reconstructions, ported from the synthetic fixtures the
//! original port measured timing against. No baseline output is checked in
//! here (there is no committed snapshot corpus); these assert the coarse
//! shape of the result instead: a non-trivial watertight-ish patch comes
//! out, and every per-triangle invariant holds.

use glam::Vec3;

use crate::{EngineConfig, ReconstructionStatus, Sample, reconstruct};

fn spherical_cloud(slices: u32, stacks: u32) -> Vec<Sample> {
    let mut samples = vec![Sample {
        pos: Vec3::new(0.0, 0.0, -1.0),
        normal: Vec3::new(0.0, 0.0, -1.0),
    }];

    for slice in 0..slices {
        for stack in 1..stacks {
            let yaw = (f64::from(slice) / f64::from(slices)) * 2.0 * std::f64::consts::PI;
            let z = ((f64::from(stack) / f64::from(stacks) - 0.5) * std::f64::consts::PI).sin();
            let r = (1.0 - z * z).sqrt();

            #[allow(clippy::cast_possible_truncation)]
            let pos = Vec3::new((r * yaw.sin()) as f32, (r * yaw.cos()) as f32, z as f32);
            samples.push(Sample {
                pos,
                normal: pos.normalize(),
            });
        }
    }

    samples.push(Sample {
        pos: Vec3::new(0.0, 0.0, 1.0),
        normal: Vec3::new(0.0, 0.0, 1.0),
    });

    samples
}

fn tetrahedron() -> Vec<Sample> {
    vec![
        Sample { pos: Vec3::new(0.0, 0.0, 0.0), normal: Vec3::new(-1.0, -1.0, -1.0).normalize() },
        Sample { pos: Vec3::new(0.0, 1.0, 0.0), normal: Vec3::new(0.0, 1.0, 0.0) },
        Sample { pos: Vec3::new(1.0, 0.0, 0.0), normal: Vec3::new(1.0, 0.0, 0.0) },
        Sample { pos: Vec3::new(0.0, 0.0, 1.0), normal: Vec3::new(0.0, 0.0, 1.0) },
    ]
}

fn cube() -> Vec<Sample> {
    [
        (-1.0, -1.0, -1.0),
        (-1.0, 1.0, -1.0),
        (1.0, 1.0, -1.0),
        (1.0, -1.0, -1.0),
        (-1.0, -1.0, 1.0),
        (-1.0, 1.0, 1.0),
        (1.0, 1.0, 1.0),
        (1.0, -1.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Sample {
        pos: Vec3::new(x, y, z),
        normal: Vec3::new(x, y, z).normalize(),
    })
    .collect()
}

#[test]
fn sphere_36_18_reconstructs_a_large_patch() {
    let cloud = spherical_cloud(36, 18);
    let report = reconstruct(&cloud, EngineConfig::new(0.3)).unwrap();
    assert!(
        report.triangles.len() > 100,
        "expected a dense triangulation of a {}-sample sphere, got {} triangles",
        cloud.len(),
        report.triangles.len()
    );
    assert_ne!(report.status, ReconstructionStatus::Empty);
}

#[test]
fn sphere_100_50_reconstructs_a_large_patch() {
    let cloud = spherical_cloud(100, 50);
    let report = reconstruct(&cloud, EngineConfig::new(0.1)).unwrap();
    assert!(
        report.triangles.len() > 500,
        "expected a dense triangulation of a {}-sample sphere, got {} triangles",
        cloud.len(),
        report.triangles.len()
    );
    assert_ne!(report.status, ReconstructionStatus::Empty);
}

#[test]
fn tetrahedron_reconstructs_all_four_faces() {
    let cloud = tetrahedron();
    let report = reconstruct(&cloud, EngineConfig::new(2.0)).unwrap();
    assert_eq!(report.triangles.len(), 4);
    assert_ne!(report.status, ReconstructionStatus::Empty);
}

#[test]
fn cube_reconstructs_every_face() {
    let cloud = cube();
    let report = reconstruct(&cloud, EngineConfig::new(2.0)).unwrap();
    assert!(
        report.triangles.len() >= 6,
        "expected at least one triangle per cube face, got {}",
        report.triangles.len()
    );
    assert_ne!(report.status, ReconstructionStatus::Empty);
}
