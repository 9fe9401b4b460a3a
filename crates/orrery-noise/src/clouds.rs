//! The fixed catalog of cloud-shell presets.

use glam::Vec3;
use noise::core::worley::ReturnType;
use noise::{OpenSimplex, ScalePoint, Seedable, Simplex, TranslatePoint, Turbulence, Worley};

use crate::field::{Clouds, FieldParams, NoiseField, sample_field};
use crate::fractal::{Fbm, FractalLayers, Ridged};
use crate::ops::{TerraceStep, min_max_normalize};

/// The empty cloud layer: produces no field at all, which downstream
/// consumers read as "no clouds".
#[derive(Default)]
pub struct NoClouds {
    params: FieldParams,
}

impl NoClouds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for NoClouds {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        Vec::new()
    }
}

impl Clouds for NoClouds {}

/// Wispy high-altitude streaks: ridged noise pulled through a gradient warp
/// and terraced. The only preset that shifts its sampling domain by the
/// evaluate offset.
#[derive(Default)]
pub struct CirrusClouds {
    params: FieldParams,
}

impl CirrusClouds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for CirrusClouds {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, offset: Vec3) -> Vec<f32> {
        let seed = self.params.seed() as u32;
        let ridged = Ridged::new(
            OpenSimplex::new(seed),
            FractalLayers {
                octaves: 5,
                ..Default::default()
            },
        );
        let shifted = TranslatePoint::new(ridged)
            .set_x_translation(offset.x as f64)
            .set_y_translation(offset.y as f64)
            .set_z_translation(offset.z as f64);
        let warped = Turbulence::<_, Simplex>::new(shifted)
            .set_seed(seed)
            .set_frequency(0.72)
            .set_power(1.16);
        let terraced = TerraceStep::new(warped, 1.0, 1.22);
        let pipeline = ScalePoint::new(terraced).set_scale(1.2);
        sample_field(&pipeline, &self.params)
    }
}

impl Clouds for CirrusClouds {}

/// Thick global cover: triple-stacked fBm, min-max normalized into
/// `[0, 1.5]` so most of the shell reads opaque.
#[derive(Default)]
pub struct DenseClouds {
    params: FieldParams,
}

impl DenseClouds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for DenseClouds {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let layers = FractalLayers {
            octaves: 3,
            ..Default::default()
        };
        let pipeline = Fbm::new(
            Fbm::new(
                Fbm::new(OpenSimplex::new(self.params.seed() as u32), layers),
                layers,
            ),
            layers,
        );
        let mut field = sample_field(&pipeline, &self.params);
        min_max_normalize(&mut field, 1.5, 0.0);
        field
    }
}

impl Clouds for DenseClouds {}

/// A hexagonal-cell energy shield: cellular distance normalized into
/// `[0.5, 1.5]` so the whole shell stays visible, tinted cyan.
#[derive(Default)]
pub struct PlanetaryShield {
    params: FieldParams,
}

impl PlanetaryShield {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoiseField for PlanetaryShield {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut FieldParams {
        &mut self.params
    }

    fn scalar_field(&self, _offset: Vec3) -> Vec<f32> {
        let cells = Worley::new(self.params.seed() as u32).set_return_type(ReturnType::Distance);
        let pipeline = ScalePoint::new(cells).set_scale(5.0);
        let mut field = sample_field(&pipeline, &self.params);
        min_max_normalize(&mut field, 1.0, 0.5);
        field
    }
}

impl Clouds for PlanetaryShield {
    fn tint(&self) -> [f32; 3] {
        [0.0, 1.0, 1.0]
    }
}
