//! Output-shaping and domain operators that the `noise` crate does not
//! provide: terrace stepping, smooth maximum, jittered cell lookup, and the
//! min/max post-normalizer some cloud presets apply.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use noise::NoiseFn;
use rayon::prelude::*;

/// Quantizes its source's output into terraced steps.
///
/// The output is snapped to multiples of `1 / multiplier`. `smoothness`
/// blends between hard steps (0) and the untouched source (±1); a small
/// negative value tips each step edge slightly backwards, which reads as an
/// overhung cliff once baked into a normal map.
pub struct TerraceStep<S> {
    source: S,
    multiplier: f64,
    smoothness: f64,
}

impl<S> TerraceStep<S> {
    pub fn new(source: S, multiplier: f64, smoothness: f64) -> Self {
        Self {
            source,
            multiplier,
            smoothness,
        }
    }
}

impl<S: NoiseFn<f64, 3>> NoiseFn<f64, 3> for TerraceStep<S> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let v = self.source.get(point) * self.multiplier;
        let stepped = v.round();
        let blended = stepped + (v - stepped) * self.smoothness.clamp(-1.0, 1.0);
        blended / self.multiplier
    }
}

/// Polynomial smooth maximum of two sources.
///
/// Within `smoothness` of each other the two values blend instead of
/// switching, so the crest where they cross has no derivative kink.
pub struct SmoothMax<A, B> {
    a: A,
    b: B,
    smoothness: f64,
}

impl<A, B> SmoothMax<A, B> {
    pub fn new(a: A, b: B, smoothness: f64) -> Self {
        Self { a, b, smoothness }
    }
}

impl<A: NoiseFn<f64, 3>, B: NoiseFn<f64, 3>> NoiseFn<f64, 3> for SmoothMax<A, B> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let a = self.a.get(point);
        let b = self.b.get(point);
        let k = self.smoothness.max(f64::EPSILON);
        let h = ((k - (a - b).abs()).max(0.0)) / k;
        a.max(b) + h * h * k * 0.25
    }
}

/// Evaluates its lookup source at the jittered feature point of the
/// containing lattice cell, giving plate-like regions that each carry one
/// constant value of the lookup field.
pub struct CellLookup<S> {
    lookup: S,
    jitter: f64,
    seed: i32,
}

impl<S> CellLookup<S> {
    pub fn new(lookup: S, jitter: f64, seed: i32) -> Self {
        Self {
            lookup,
            jitter,
            seed,
        }
    }

    /// Deterministic per-cell unit value in `[0, 1)` for one jitter axis.
    fn cell_unit(&self, cell: [i64; 3], axis: u8) -> f64 {
        let mut hasher = DefaultHasher::new();
        (self.seed, cell[0], cell[1], cell[2], axis).hash(&mut hasher);
        (hasher.finish() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn feature_point(&self, cell: [i64; 3]) -> [f64; 3] {
        [
            cell[0] as f64 + 0.5 + (self.cell_unit(cell, 0) - 0.5) * self.jitter,
            cell[1] as f64 + 0.5 + (self.cell_unit(cell, 1) - 0.5) * self.jitter,
            cell[2] as f64 + 0.5 + (self.cell_unit(cell, 2) - 0.5) * self.jitter,
        ]
    }
}

impl<S: NoiseFn<f64, 3>> NoiseFn<f64, 3> for CellLookup<S> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let base = [
            point[0].floor() as i64,
            point[1].floor() as i64,
            point[2].floor() as i64,
        ];

        let mut best_dist = f64::INFINITY;
        let mut best = [0.0; 3];
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let cell = [base[0] + dx, base[1] + dy, base[2] + dz];
                    let feature = self.feature_point(cell);
                    let d = (feature[0] - point[0]).powi(2)
                        + (feature[1] - point[1]).powi(2)
                        + (feature[2] - point[2]).powi(2);
                    if d < best_dist {
                        best_dist = d;
                        best = feature;
                    }
                }
            }
        }

        self.lookup.get(best)
    }
}

/// Rescale `data` in place so its observed range maps onto
/// `[bias, bias + scale]`.
///
/// Presets whose basis diverges from `[-1, 1]` (cellular distance) apply
/// this after sampling. Empty or constant fields are left untouched.
pub fn min_max_normalize(data: &mut [f32], scale: f32, bias: f32) {
    let Some(&first) = data.first() else {
        return;
    };
    let (min, max) = data.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    if max <= min {
        return;
    }

    let inv = 1.0 / (max - min);
    data.par_iter_mut()
        .for_each(|v| *v = bias + scale * ((*v - min) * inv));
}
