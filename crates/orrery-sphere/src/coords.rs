//! Cached spherical sampling grid.
//!
//! Maps each texel of a square texture to a point on the unit sphere, so a
//! noise field sampled over the grid wraps seamlessly in longitude. The unit
//! grid is computed once per resolution and cached for the process lifetime;
//! every retrieval scales a copy for the requesting body.

use std::sync::LazyLock;

use dashmap::DashMap;
use glam::Vec3;
use rayon::prelude::*;

/// A flat grid of sphere sample points, one per texel, stored as three
/// parallel arrays of length `resolution²`.
#[derive(Clone, Debug, Default)]
pub struct SphericalGrid {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
}

impl SphericalGrid {
    fn with_len(len: usize) -> Self {
        Self {
            x: vec![0.0; len],
            y: vec![0.0; len],
            z: vec![0.0; len],
        }
    }

    /// Number of sample points in the grid.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the grid holds no sample points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The `i`-th sample point, widened for noise evaluation.
    #[inline]
    pub fn point(&self, i: usize) -> [f64; 3] {
        [self.x[i] as f64, self.y[i] as f64, self.z[i] as f64]
    }
}

/// Unit grids keyed by resolution. Entries are inserted lazily and never
/// evicted; the supported texture sizes (64..4096) keep the map small.
static GRID_CACHE: LazyLock<DashMap<u32, SphericalGrid>> = LazyLock::new(DashMap::new);

/// Fetch the sampling grid for `resolution`, scaled for a body at `radius`
/// with world-space `offset`.
///
/// The cached unit grid is resolution-dependent only. Each call returns a
/// copy with every component multiplied by `radius + offset.axis`. The
/// per-axis multiply-by-sum conflates scale and translation; every shipped
/// preset is tuned against exactly this mapping, so changing it changes
/// every planet's surface.
pub fn grid(radius: f32, resolution: u32, offset: Vec3) -> SphericalGrid {
    let mut out = GRID_CACHE
        .entry(resolution)
        .or_insert_with(|| compute_unit_grid(resolution))
        .value()
        .clone();

    out.x.par_iter_mut().for_each(|v| *v *= radius + offset.x);
    out.y.par_iter_mut().for_each(|v| *v *= radius + offset.y);
    out.z.par_iter_mut().for_each(|v| *v *= radius + offset.z);
    out
}

/// Drop every cached grid. Intended for tests that need a cold cache.
pub fn reset_grid_cache() {
    GRID_CACHE.clear();
}

fn compute_unit_grid(resolution: u32) -> SphericalGrid {
    use std::f32::consts::{FRAC_PI_2, PI};

    let res = resolution as usize;
    let resf = resolution as f32;
    let mut out = SphericalGrid::with_len(res * res);

    out.x
        .par_chunks_mut(res.max(1))
        .zip(out.y.par_chunks_mut(res.max(1)))
        .zip(out.z.par_chunks_mut(res.max(1)))
        .enumerate()
        .for_each(|(row, ((xs, ys), zs))| {
            // Flip v so the poles land at the top and bottom rows rather
            // than the equator.
            let v = 1.0 - 2.0 * (row as f32 / resf - 0.5);
            let phi = v * FRAC_PI_2 - FRAC_PI_2;
            for col in 0..res {
                let u = 2.0 * (col as f32 / resf - 0.5);
                let theta = u * PI;
                xs[col] = phi.cos() * theta.cos();
                ys[col] = phi.cos() * theta.sin();
                zs[col] = phi.sin();
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_unit_grid_points_lie_on_unit_sphere() {
        let g = grid(1.0, 32, Vec3::ZERO);
        assert_eq!(g.len(), 32 * 32);
        for i in 0..g.len() {
            let norm = (g.x[i] * g.x[i] + g.y[i] * g.y[i] + g.z[i] * g.z[i]).sqrt();
            assert!(
                (norm - 1.0).abs() < EPSILON,
                "Grid point {i} not on unit sphere: |p| = {norm}"
            );
        }
    }

    #[test]
    fn test_scaling_applies_radius_plus_offset_per_axis() {
        let unit = grid(1.0, 16, Vec3::ZERO);
        let scaled = grid(2.0, 16, Vec3::new(0.5, 0.0, -1.0));
        for i in 0..unit.len() {
            assert!((scaled.x[i] - unit.x[i] * 2.5).abs() < EPSILON);
            assert!((scaled.y[i] - unit.y[i] * 2.0).abs() < EPSILON);
            assert!((scaled.z[i] - unit.z[i] * 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_cached_entry_is_never_mutated_by_retrieval() {
        // Two scaled retrievals in a row must both derive from the same
        // pristine unit grid.
        let first = grid(3.0, 24, Vec3::ZERO);
        let second = grid(3.0, 24, Vec3::ZERO);
        for i in 0..first.len() {
            assert!(
                (first.x[i] - second.x[i]).abs() < EPSILON,
                "Retrieval mutated the cached grid at {i}"
            );
        }
    }

    #[test]
    fn test_reset_forces_recompute_with_identical_values() {
        let before = grid(1.0, 20, Vec3::ZERO);
        reset_grid_cache();
        let after = grid(1.0, 20, Vec3::ZERO);
        assert_eq!(before.len(), after.len());
        for i in 0..before.len() {
            assert!((before.x[i] - after.x[i]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_grid_covers_both_hemispheres() {
        let g = grid(1.0, 64, Vec3::ZERO);
        let min_z = g.z.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_z = g.z.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(min_z < -0.9, "Grid should reach the south pole, min z = {min_z}");
        assert!(max_z > 0.9, "Grid should reach the north pole, max z = {max_z}");
    }
}
