//! Fractal combinators over a basis noise source.
//!
//! Each combinator sums octaves of its source at escalating frequency and
//! decaying amplitude. Amplitudes are pre-normalized by the geometric sum of
//! the gains so output stays near `[-1, 1]` regardless of octave count, and
//! an optional weighted strength lets high-lying octaves dampen the ones
//! below them.

use noise::NoiseFn;

/// Octave layering shared by all fractal combinators.
#[derive(Clone, Copy, Debug)]
pub struct FractalLayers {
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub gain: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// How strongly each octave's value scales the amplitude of the next
    /// one. 0 keeps octaves independent.
    pub weighted_strength: f64,
}

impl Default for FractalLayers {
    fn default() -> Self {
        Self {
            octaves: 3,
            gain: 0.5,
            lacunarity: 2.0,
            weighted_strength: 0.0,
        }
    }
}

/// Reciprocal of the geometric amplitude sum, used to keep the octave sum
/// inside the source's nominal range.
fn fractal_bounding(layers: &FractalLayers) -> f64 {
    let mut amp = layers.gain;
    let mut total = 1.0;
    for _ in 1..layers.octaves {
        total += amp;
        amp *= layers.gain;
    }
    1.0 / total
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fractal Brownian motion.
pub struct Fbm<S> {
    source: S,
    layers: FractalLayers,
    bounding: f64,
}

impl<S> Fbm<S> {
    pub fn new(source: S, layers: FractalLayers) -> Self {
        let bounding = fractal_bounding(&layers);
        Self {
            source,
            layers,
            bounding,
        }
    }
}

impl<S: NoiseFn<f64, 3>> NoiseFn<f64, 3> for Fbm<S> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let lac = self.layers.lacunarity;
        let mut sum = 0.0;
        let mut amp = self.bounding;
        let mut pos = point;

        for _ in 0..self.layers.octaves {
            let n = self.source.get(pos);
            sum += n * amp;
            amp *= lerp(1.0, (n + 1.0) * 0.5, self.layers.weighted_strength) * self.layers.gain;
            pos = [pos[0] * lac, pos[1] * lac, pos[2] * lac];
        }

        sum
    }
}

/// Ridged fractal: folds each octave around zero so valleys become crests.
pub struct Ridged<S> {
    source: S,
    layers: FractalLayers,
    bounding: f64,
}

impl<S> Ridged<S> {
    pub fn new(source: S, layers: FractalLayers) -> Self {
        let bounding = fractal_bounding(&layers);
        Self {
            source,
            layers,
            bounding,
        }
    }
}

impl<S: NoiseFn<f64, 3>> NoiseFn<f64, 3> for Ridged<S> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let lac = self.layers.lacunarity;
        let mut sum = 0.0;
        let mut amp = self.bounding;
        let mut pos = point;

        for _ in 0..self.layers.octaves {
            let n = self.source.get(pos).abs();
            sum += (n * -2.0 + 1.0) * amp;
            amp *= lerp(1.0, 1.0 - n, self.layers.weighted_strength) * self.layers.gain;
            pos = [pos[0] * lac, pos[1] * lac, pos[2] * lac];
        }

        sum
    }
}

/// Ping-pong fractal: bounces each octave through a triangle wave, giving
/// concentric plateau bands.
pub struct PingPong<S> {
    source: S,
    layers: FractalLayers,
    strength: f64,
    bounding: f64,
}

impl<S> PingPong<S> {
    pub fn new(source: S, layers: FractalLayers, strength: f64) -> Self {
        let bounding = fractal_bounding(&layers);
        Self {
            source,
            layers,
            strength,
            bounding,
        }
    }
}

/// Triangle-wave fold of `t` onto `[0, 1]`.
fn ping_pong(t: f64) -> f64 {
    let t = t - (t * 0.5).floor() * 2.0;
    if t < 1.0 { t } else { 2.0 - t }
}

impl<S: NoiseFn<f64, 3>> NoiseFn<f64, 3> for PingPong<S> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let lac = self.layers.lacunarity;
        let mut sum = 0.0;
        let mut amp = self.bounding;
        let mut pos = point;

        for _ in 0..self.layers.octaves {
            let n = ping_pong((self.source.get(pos) + 1.0) * self.strength);
            sum += (n - 0.5) * 2.0 * amp;
            amp *= lerp(1.0, n, self.layers.weighted_strength) * self.layers.gain;
            pos = [pos[0] * lac, pos[1] * lac, pos[2] * lac];
        }

        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::{Constant, Simplex};

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_single_octave_fbm_is_the_source() {
        let layers = FractalLayers {
            octaves: 1,
            ..Default::default()
        };
        let fbm = Fbm::new(Simplex::new(7), layers);
        let raw = Simplex::new(7);
        let p = [0.3, -1.2, 4.5];
        assert!(
            (fbm.get(p) - raw.get(p)).abs() < EPSILON,
            "One octave with bounding 1 must pass the source through"
        );
    }

    #[test]
    fn test_fbm_stays_bounded() {
        let fbm = Fbm::new(
            Simplex::new(42),
            FractalLayers {
                octaves: 5,
                gain: 0.65,
                lacunarity: 2.5,
                weighted_strength: 0.5,
            },
        );
        for i in 0..500 {
            let t = i as f64 * 0.17;
            let v = fbm.get([t, t * 0.7, -t * 0.3]);
            assert!(
                v.abs() <= 1.5,
                "fBm output {v} escaped the expected bound at step {i}"
            );
        }
    }

    #[test]
    fn test_fbm_is_deterministic() {
        let layers = FractalLayers {
            octaves: 4,
            ..Default::default()
        };
        let a = Fbm::new(Simplex::new(9), layers);
        let b = Fbm::new(Simplex::new(9), layers);
        let p = [1.0, 2.0, 3.0];
        assert!((a.get(p) - b.get(p)).abs() < EPSILON);
    }

    #[test]
    fn test_ridged_constant_zero_gives_crest() {
        // |0| folded gives the maximum ridge value at every octave, and the
        // bounding normalizes the sum back to 1.
        let ridged = Ridged::new(Constant::new(0.0), FractalLayers::default());
        assert!((ridged.get([0.0, 0.0, 0.0]) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_ping_pong_fold() {
        assert!((ping_pong(0.25) - 0.25).abs() < EPSILON);
        assert!((ping_pong(1.25) - 0.75).abs() < EPSILON);
        assert!((ping_pong(2.25) - 0.25).abs() < EPSILON, "Period is 2");
        assert!((ping_pong(-0.5) - 0.5).abs() < EPSILON, "Folds negatives too");
    }

    #[test]
    fn test_ping_pong_output_in_range() {
        let pp = PingPong::new(
            Simplex::new(3),
            FractalLayers {
                octaves: 3,
                ..Default::default()
            },
            2.64,
        );
        for i in 0..500 {
            let t = i as f64 * 0.23;
            let v = pp.get([t, -t, t * 0.5]);
            assert!(v.abs() <= 1.0 + EPSILON, "Ping-pong escaped [-1, 1]: {v}");
        }
    }
}
