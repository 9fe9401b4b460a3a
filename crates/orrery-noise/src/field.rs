//! The noise-field capability shared by terrain and cloud variants.

use glam::Vec3;
use noise::NoiseFn;
use orrery_material::ColorStop;
use orrery_sphere::SphericalGrid;
use rayon::prelude::*;

/// Parameters common to every noise-field variant.
///
/// `seed`, `resolution`, and `emissive` are editable by the host's property
/// editor; `radius` and `offset` are placement data written by the owning
/// planet when a variant is installed.
#[derive(Clone, Copy, Debug)]
pub struct FieldParams {
    seed: i32,
    resolution: u32,
    emissive: bool,
    radius: f32,
    offset: Vec3,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            resolution: 1024,
            emissive: false,
            radius: 1.0,
            offset: Vec3::ZERO,
        }
    }
}

impl FieldParams {
    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Edge length of the baked texture, independent of mesh tessellation.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution;
    }

    pub fn emissive(&self) -> bool {
        self.emissive
    }

    pub fn set_emissive(&mut self, emissive: bool) {
        self.emissive = emissive;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Install the placement this field is sampled at. Written by the
    /// owning planet; presets never touch it themselves.
    pub fn set_placement(&mut self, radius: f32, offset: Vec3) {
        self.radius = radius;
        self.offset = offset;
    }

    /// The spherical sampling grid scaled for this field's placement.
    pub(crate) fn sample_grid(&self) -> SphericalGrid {
        orrery_sphere::grid(self.radius, self.resolution, self.offset)
    }
}

/// Capability of producing a scalar field over the spherical sampling grid.
pub trait NoiseField: Send + Sync {
    fn params(&self) -> &FieldParams;

    fn params_mut(&mut self) -> &mut FieldParams;

    /// Evaluate the field: one value per texel, `resolution²` in total,
    /// nominally in `[-1, 1]`. `offset` shifts the sampling domain for
    /// presets that use it.
    fn scalar_field(&self, offset: Vec3) -> Vec<f32>;
}

/// A terrain surface variant: a noise field plus its color gradient.
pub trait Terrain: NoiseField {
    /// Gradient stops sorted ascending by position. Empty means
    /// grayscale-by-height.
    fn color_stops(&self) -> Vec<ColorStop> {
        Vec::new()
    }
}

/// A cloud shell variant: a noise field plus a single tint.
pub trait Clouds: NoiseField {
    fn tint(&self) -> [f32; 3] {
        [1.0, 1.0, 1.0]
    }
}

/// Evaluate `pipeline` at every grid point of `params`' placement.
pub(crate) fn sample_field(
    pipeline: &(impl NoiseFn<f64, 3> + Sync),
    params: &FieldParams,
) -> Vec<f32> {
    let grid = params.sample_grid();
    (0..grid.len())
        .into_par_iter()
        .map(|i| pipeline.get(grid.point(i)) as f32)
        .collect()
}
