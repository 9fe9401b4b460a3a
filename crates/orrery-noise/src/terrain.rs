//! The fixed catalog of terrain presets.
//!
//! Each preset wires a small pipeline of basis noise and combinators, then
//! samples it over the spherical grid. The gradient stops double as each
//! preset's default palette; the host's editor may override them per planet
//! without touching the preset.

use glam::Vec3;
use noise::core::worley::ReturnType;
use noise::{Constant, Max, OpenSimplex, Perlin, ScalePoint, Simplex, Worley};
use orrery_material::ColorStop;

use crate::field::{FieldParams, NoiseField, Terrain, sample_field};
use crate::fractal::{Fbm, FractalLayers, PingPong, Ridged};
use crate::ops::{CellLookup, SmoothMax, TerraceStep};

/// Earth-like world: simplex continents under a sea-to-forest gradient.
#[derive(Default)]
pub struct Gaia {
    params: FieldParams,
}

impl Gaia {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for Gaia {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let fbm = Fbm::new(
            Simplex::new(self.params.seed() as u32),
            FractalLayers {
                octaves: 4,
                gain: 0.65,
                lacunarity: 2.5,
                weighted_strength: 0.5,
            },
        );
        let pipeline = ScalePoint::new(fbm).set_scale(0.8);
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Gaia {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.495, [0.110, 0.318, 0.792]), // deep water
            ColorStop::new(0.540, [0.714, 0.890, 0.859]), // shallows
            ColorStop::new(0.570, [0.898, 0.851, 0.761]), // sand
            ColorStop::new(0.610, [0.447, 0.329, 0.157]), // soil
            ColorStop::new(0.650, [0.710, 0.729, 0.380]), // forest
            ColorStop::new(1.000, [0.486, 0.553, 0.298]), // highland forest
        ]
    }
}

/// Cratered gray companion. Emissive so it reads at night.
pub struct Moon {
    params: FieldParams,
}

impl Moon {
    pub fn new() -> Self {
        let mut params = FieldParams::default();
        params.set_emissive(true);
        Self { params }
    }
}

impl Default for Moon {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseField for Moon {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let fbm = Fbm::new(
            Simplex::new(self.params.seed() as u32),
            FractalLayers {
                octaves: 4,
                gain: 0.65,
                lacunarity: 2.5,
                weighted_strength: 0.5,
            },
        );
        let pipeline = ScalePoint::new(fbm).set_scale(0.8);
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Moon {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.000, [1.000, 1.000, 1.000]),
            ColorStop::new(0.664, [0.245, 0.245, 0.245]),
            ColorStop::new(1.000, [0.000, 0.000, 0.000]),
        ]
    }
}

/// A star surface: two decorrelated perlin cells smooth-maxed together so
/// granulation cells fade into each other. Emissive.
pub struct Sun {
    params: FieldParams,
}

impl Sun {
    pub fn new() -> Self {
        let mut params = FieldParams::default();
        params.set_emissive(true);
        Self { params }
    }
}

impl Default for Sun {
    fn default() -> Self {
        Self::new()
    }
}

fn sun_cells(seed: u32) -> ScalePoint<Fbm<Perlin>> {
    let fbm = Fbm::new(
        Perlin::new(seed),
        FractalLayers {
            octaves: 3,
            gain: 0.5,
            lacunarity: 2.0,
            weighted_strength: 0.5,
        },
    );
    ScalePoint::new(fbm).set_scale(12.0)
}

impl NoiseField for Sun {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let seed = self.params.seed() as u32;
        let pipeline = SmoothMax::new(sun_cells(seed.wrapping_add(1)), sun_cells(seed), 0.1);
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Sun {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.334, [1.000, 1.000, 1.000]),
            ColorStop::new(0.445, [0.988, 0.804, 0.016]),
            ColorStop::new(0.642, [0.988, 0.271, 0.016]),
            ColorStop::new(0.667, [0.988, 0.345, 0.016]),
            ColorStop::new(0.778, [0.988, 0.176, 0.016]),
            ColorStop::new(0.889, [0.988, 0.549, 0.016]),
        ]
    }
}

/// Lifeless rock: ridged cellular distance run through a ping-pong pass.
#[derive(Default)]
pub struct Barren {
    params: FieldParams,
}

impl Barren {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for Barren {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let cells = Worley::new(self.params.seed() as u32).set_return_type(ReturnType::Distance);
        let ridged = Ridged::new(
            cells,
            FractalLayers {
                octaves: 2,
                gain: 2.0,
                lacunarity: 2.5,
                weighted_strength: 0.0,
            },
        );
        let pipeline = PingPong::new(
            ridged,
            FractalLayers {
                octaves: 3,
                ..Default::default()
            },
            2.0,
        );
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Barren {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.000, [0.855, 0.745, 0.005]),
            ColorStop::new(0.194, [0.492, 0.079, 0.079]),
            ColorStop::new(0.489, [0.365, 0.207, 0.000]),
            ColorStop::new(0.991, [0.695, 0.378, 0.000]),
        ]
    }
}

/// Lava world: cellular ping-pong floored at -1 and terraced into flows.
#[derive(Default)]
pub struct Volcanic {
    params: FieldParams,
}

impl Volcanic {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for Volcanic {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let cells = Worley::new(self.params.seed() as u32).set_return_type(ReturnType::Distance);
        let folded = PingPong::new(
            cells,
            FractalLayers {
                octaves: 3,
                ..Default::default()
            },
            2.64,
        );
        let floored = Max::new(folded, Constant::new(-1.0));
        let pipeline = TerraceStep::new(floored, 1.5, -0.06);
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Volcanic {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.054, [0.802, 0.071, 0.071]),
            ColorStop::new(0.389, [0.570, 0.120, 0.518]),
            ColorStop::new(0.538, [0.219, 0.051, 0.241]),
            ColorStop::new(0.630, [0.096, 0.057, 0.447]),
            ColorStop::new(1.000, [0.321, 0.081, 0.020]),
        ]
    }
}

/// Otherworldly ridges over the volcanic palette.
#[derive(Default)]
pub struct Alien {
    params: FieldParams,
}

impl Alien {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for Alien {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let pipeline = Ridged::new(
            OpenSimplex::new(self.params.seed() as u32),
            FractalLayers {
                octaves: 3,
                ..Default::default()
            },
        );
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Alien {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.054, [0.802, 0.071, 0.071]),
            ColorStop::new(0.389, [0.570, 0.120, 0.518]),
            ColorStop::new(0.538, [0.219, 0.051, 0.241]),
            ColorStop::new(0.630, [0.096, 0.057, 0.447]),
            ColorStop::new(1.000, [0.321, 0.081, 0.020]),
        ]
    }
}

/// Artificial surface: triple-stacked fBm quantized into plates by a
/// wide-jitter cell lookup, rendered in grayscale.
#[derive(Default)]
pub struct Machine {
    params: FieldParams,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for Machine {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let seed = self.params.seed();
        let layers = FractalLayers {
            octaves: 3,
            ..Default::default()
        };
        let stacked = Fbm::new(
            Fbm::new(Fbm::new(OpenSimplex::new(seed as u32), layers), layers),
            layers,
        );
        let plates = CellLookup::new(stacked, 5.5, seed);
        let pipeline = ScalePoint::new(plates).set_scale(5.0);
        sample_field(&pipeline, &self.params)
    }
}

impl Terrain for Machine {
    fn color_stops(&self) -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.000, [0.000, 0.000, 0.000]),
            ColorStop::new(1.000, [1.000, 1.000, 1.000]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_test_resolution<T: NoiseField>(mut preset: T) -> T {
        preset.params_mut().set_resolution(16);
        preset
    }

    #[test]
    fn test_every_terrain_fills_the_grid() {
        let presets: Vec<Box<dyn Terrain>> = vec![
            Box::new(at_test_resolution(Gaia::new())),
            Box::new(at_test_resolution(Moon::new())),
            Box::new(at_test_resolution(Sun::new())),
            Box::new(at_test_resolution(Barren::new())),
            Box::new(at_test_resolution(Volcanic::new())),
            Box::new(at_test_resolution(Alien::new())),
            Box::new(at_test_resolution(Machine::new())),
        ];
        for preset in &presets {
            let field = preset.scalar_field(Vec3::ZERO);
            assert_eq!(field.len(), 16 * 16);
            assert!(
                field.iter().all(|v| v.is_finite()),
                "Preset produced a non-finite sample"
            );
        }
    }

    #[test]
    fn test_terrain_fields_are_deterministic_per_seed() {
        let a = at_test_resolution(Gaia::new());
        let b = at_test_resolution(Gaia::new());
        assert_eq!(a.scalar_field(Vec3::ZERO), b.scalar_field(Vec3::ZERO));

        let mut c = at_test_resolution(Gaia::new());
        c.params_mut().set_seed(999);
        assert_ne!(a.scalar_field(Vec3::ZERO), c.scalar_field(Vec3::ZERO));
    }

    #[test]
    fn test_gradients_are_sorted_ascending() {
        let presets: Vec<Box<dyn Terrain>> = vec![
            Box::new(Gaia::new()),
            Box::new(Moon::new()),
            Box::new(Sun::new()),
            Box::new(Barren::new()),
            Box::new(Volcanic::new()),
            Box::new(Alien::new()),
            Box::new(Machine::new()),
        ];
        for preset in &presets {
            let stops = preset.color_stops();
            assert!(!stops.is_empty());
            for pair in stops.windows(2) {
                assert!(
                    pair[0].position < pair[1].position,
                    "Gradient stops must strictly ascend"
                );
            }
        }
    }

    #[test]
    fn test_only_luminous_presets_are_emissive() {
        assert!(Sun::new().params().emissive());
        assert!(Moon::new().params().emissive());
        assert!(!Gaia::new().params().emissive());
        assert!(!Volcanic::new().params().emissive());
    }
}
