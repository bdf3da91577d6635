//! A uniform-grid spatial index supporting radius search.
//!
//! The engine targets dense, uniformly sampled clouds (`spec.md` §1), so a
//! uniform grid sized to the ball diameter gives near-constant-time radius
//! queries without the bookkeeping of a balanced tree — this is the
//! teacher's own approach (`Grid` in the original `grid.rs`), generalized
//! here to answer an arbitrary radius rather than a single hardcoded one.

use glam::{IVec3, Vec3, ivec3};

use crate::{Sample, VertexId};

/// Wraps a point cloud with a radius-search query.
///
/// Built once from the full cloud; immutable thereafter (`spec.md` §4.1
/// "Construction").
#[derive(Clone, Debug)]
pub struct SpatialIndex<'a> {
    samples: &'a [Sample],
    cell_size: f32,
    dims: IVec3,
    lower: Vec3,
    cells: Vec<Vec<VertexId>>,
}

impl<'a> SpatialIndex<'a> {
    /// Builds an index over `samples`. `cell_size` should be on the order of
    /// the queries the index will be asked (the driver uses `2 * radius`,
    /// the ball diameter).
    ///
    /// # Panics
    /// Panics if `samples` is empty; the engine validates `N >= 3` before
    /// constructing the index.
    #[must_use]
    pub fn new(samples: &'a [Sample], cell_size: f32) -> Self {
        assert!(!samples.is_empty(), "spatial index requires a non-empty cloud");

        let mut lower = samples[0].pos;
        let mut upper = samples[0].pos;
        for s in samples {
            lower = lower.min(s.pos);
            upper = upper.max(s.pos);
        }

        let span = (upper - lower).max(Vec3::splat(cell_size));
        let dims = ivec3(
            (span.x / cell_size).ceil() as i32,
            (span.y / cell_size).ceil() as i32,
            (span.z / cell_size).ceil() as i32,
        )
        .max(ivec3(1, 1, 1));

        let mut cells = vec![Vec::new(); (dims.x * dims.y * dims.z) as usize];
        let mut index = Self {
            samples,
            cell_size,
            dims,
            lower,
            cells: Vec::new(),
        };
        for (id, s) in samples.iter().enumerate() {
            let cell = index.cell_index(s.pos);
            let linear = index.linear(cell);
            cells[linear].push(id);
        }
        index.cells = cells;
        index
    }

    fn cell_index(&self, point: Vec3) -> IVec3 {
        let diff = (point - self.lower) / self.cell_size;
        ivec3(diff.x as i32, diff.y as i32, diff.z as i32).clamp(IVec3::ZERO, self.dims - 1)
    }

    fn linear(&self, index: IVec3) -> usize {
        (index.z * self.dims.x * self.dims.y + index.y * self.dims.x + index.x) as usize
    }

    /// Returns the indices of every sample within the closed ball of
    /// `radius` around `point`. Order is stable for a fixed `(point,
    /// radius)` across calls within one run (ascending `VertexId`),
    /// satisfying the determinism requirement in `spec.md` §4.1.
    ///
    /// `point` and `radius` must be finite; passing NaN is a programmer
    /// error per §4.1 ("behavior is unspecified").
    #[must_use]
    pub fn radius_search(&self, point: Vec3, radius: f32) -> Vec<VertexId> {
        let reach = (radius / self.cell_size).ceil() as i32 + 1;
        let center = self.cell_index(point);
        let radius_sq = radius * radius;

        let mut result = Vec::new();
        for z_off in -reach..=reach {
            for y_off in -reach..=reach {
                for x_off in -reach..=reach {
                    let cell = center + ivec3(x_off, y_off, z_off);
                    if cell.x < 0
                        || cell.y < 0
                        || cell.z < 0
                        || cell.x >= self.dims.x
                        || cell.y >= self.dims.y
                        || cell.z >= self.dims.z
                    {
                        continue;
                    }
                    for &id in &self.cells[self.linear(cell)] {
                        if (self.samples[id].pos - point).length_squared() <= radius_sq {
                            result.push(id);
                        }
                    }
                }
            }
        }
        result.sort_unstable();
        result
    }
}
