//! The orchestrating planet aggregate.

use glam::Vec3;
use orrery_material::{ColorStop, Material, bake_clouds, bake_terrain};
use orrery_noise::{Clouds, NoiseField, Terrain};
use orrery_sphere::{Mesh, MeshConfig, SphereError};
use thiserror::Error;
use tracing::{debug, info};

/// Radial gap between the terrain surface and its cloud shell.
pub const CLOUD_SHELL_OFFSET: f32 = 0.05;

const DEFAULT_WATER_LEVEL: f32 = 0.540;

/// Errors raised while assembling or reconfiguring a planet.
#[derive(Debug, Error)]
pub enum PlanetError {
    /// Mesh configuration rejected by the sphere builder.
    #[error(transparent)]
    Mesh(#[from] SphereError),

    /// A variant's texture resolution must be at least 1.
    #[error("texture resolution must be at least 1")]
    InvalidResolution,
}

/// A generated planet: one terrain variant, one cloud variant, their sphere
/// meshes, and the materials baked from their noise fields.
///
/// The planet exclusively owns its variants; installing a new one drops the
/// previous. Meshes and materials are value objects recreated wholesale on
/// each regeneration; mutating a variant's own fields never triggers a
/// rebake by itself, the caller decides when to regenerate.
pub struct Planet {
    terrain: Box<dyn Terrain>,
    clouds: Box<dyn Clouds>,
    config: MeshConfig,
    water_level: f32,
    terrain_mesh: Mesh,
    cloud_mesh: Mesh,
    terrain_material: Material,
    cloud_material: Material,
    terrain_palette: Vec<ColorStop>,
    cloud_tint: [f32; 3],
    terrain_spin: Vec3,
    cloud_spin: Vec3,
}

impl Planet {
    /// Assemble a planet from a terrain variant, a cloud variant, and a mesh
    /// configuration.
    ///
    /// Builds both meshes (the cloud shell sits [`CLOUD_SHELL_OFFSET`] above
    /// the terrain radius), transfers the config's radius and offset onto
    /// both variants, captures their palette and tint, and bakes both
    /// materials.
    ///
    /// # Errors
    ///
    /// Fails fast on invalid mesh parameters or a zero texture resolution;
    /// nothing is substituted silently.
    pub fn new(
        mut terrain: Box<dyn Terrain>,
        mut clouds: Box<dyn Clouds>,
        config: MeshConfig,
    ) -> Result<Self, PlanetError> {
        if terrain.params().resolution() == 0 || clouds.params().resolution() == 0 {
            return Err(PlanetError::InvalidResolution);
        }

        let terrain_mesh =
            orrery_sphere::uv_sphere(config.radius, config.stacks, config.sectors, config.inverted)?;
        let cloud_mesh = orrery_sphere::uv_sphere(
            config.radius + CLOUD_SHELL_OFFSET,
            config.stacks,
            config.sectors,
            config.inverted,
        )?;

        terrain.params_mut().set_placement(config.radius, config.offset);
        clouds.params_mut().set_placement(config.radius, config.offset);

        let terrain_palette = terrain.color_stops();
        let cloud_tint = clouds.tint();

        let mut planet = Self {
            terrain,
            clouds,
            config,
            water_level: DEFAULT_WATER_LEVEL,
            terrain_mesh,
            cloud_mesh,
            terrain_material: Material::default(),
            cloud_material: Material::default(),
            terrain_palette,
            cloud_tint,
            terrain_spin: Vec3::new(0.0, 1.0, 0.0),
            cloud_spin: Vec3::new(0.0, 2.0, 0.0),
        };
        planet.bake_terrain_material();
        planet.bake_cloud_material();

        info!(
            "Assembled planet: radius {}, {}x{} tessellation, texture {}",
            config.radius,
            config.stacks,
            config.sectors,
            planet.terrain.params().resolution()
        );
        Ok(planet)
    }

    /// The terrain mesh and the cloud shell mesh, in that order.
    pub fn meshes(&self) -> (&Mesh, &Mesh) {
        (&self.terrain_mesh, &self.cloud_mesh)
    }

    /// The stored terrain material. Does not rebake.
    pub fn terrain_material(&self) -> &Material {
        &self.terrain_material
    }

    /// Replace the stored palette with an edited one, rebake, and return the
    /// fresh terrain material.
    pub fn terrain_material_with(&mut self, palette: Vec<ColorStop>) -> &Material {
        self.terrain_palette = palette;
        self.bake_terrain_material();
        &self.terrain_material
    }

    /// The stored cloud material. Does not rebake.
    pub fn cloud_material(&self) -> &Material {
        &self.cloud_material
    }

    /// Replace the stored tint with an edited one, rebake, and return the
    /// fresh cloud material.
    pub fn cloud_material_with(&mut self, tint: [f32; 3]) -> &Material {
        self.cloud_tint = tint;
        self.bake_cloud_material();
        &self.cloud_material
    }

    /// The gradient currently used for terrain albedo.
    pub fn terrain_colors(&self) -> &[ColorStop] {
        &self.terrain_palette
    }

    /// The tint currently used for cloud albedo.
    pub fn cloud_color(&self) -> [f32; 3] {
        self.cloud_tint
    }

    /// Normalized height separating submerged from land shading.
    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    /// Set the water level. Pure state mutation; the caller triggers the
    /// rebake through the material getters when it is ready.
    pub fn set_water_level(&mut self, level: f32) {
        self.water_level = level;
    }

    pub fn terrain(&self) -> &dyn Terrain {
        self.terrain.as_ref()
    }

    pub fn terrain_mut(&mut self) -> &mut dyn Terrain {
        self.terrain.as_mut()
    }

    pub fn clouds(&self) -> &dyn Clouds {
        self.clouds.as_ref()
    }

    pub fn clouds_mut(&mut self) -> &mut dyn Clouds {
        self.clouds.as_mut()
    }

    /// Install a new terrain variant, dropping the previous one.
    ///
    /// The outgoing variant's radius and offset carry over; seed and
    /// resolution are the caller's responsibility to copy if wanted. The
    /// palette is recaptured from the new variant and only the terrain
    /// material is rebaked.
    pub fn set_terrain(&mut self, mut terrain: Box<dyn Terrain>) -> Result<(), PlanetError> {
        if terrain.params().resolution() == 0 {
            return Err(PlanetError::InvalidResolution);
        }

        let radius = self.terrain.params().radius();
        let offset = self.terrain.params().offset();
        terrain.params_mut().set_placement(radius, offset);

        self.terrain = terrain;
        self.terrain_palette = self.terrain.color_stops();
        self.bake_terrain_material();
        Ok(())
    }

    /// Install a new cloud variant, dropping the previous one. Mirrors
    /// [`Planet::set_terrain`].
    pub fn set_clouds(&mut self, mut clouds: Box<dyn Clouds>) -> Result<(), PlanetError> {
        if clouds.params().resolution() == 0 {
            return Err(PlanetError::InvalidResolution);
        }

        let radius = self.clouds.params().radius();
        let offset = self.clouds.params().offset();
        clouds.params_mut().set_placement(radius, offset);

        self.clouds = clouds;
        self.cloud_tint = self.clouds.tint();
        self.bake_cloud_material();
        Ok(())
    }

    /// Rotation velocity of the terrain body, Euler degrees per second.
    /// Integrated by the host's transform system.
    pub fn terrain_spin(&self) -> Vec3 {
        self.terrain_spin
    }

    pub fn set_terrain_spin(&mut self, spin: Vec3) {
        self.terrain_spin = spin;
    }

    /// Rotation velocity of the cloud shell, Euler degrees per second.
    pub fn cloud_spin(&self) -> Vec3 {
        self.cloud_spin
    }

    pub fn set_cloud_spin(&mut self, spin: Vec3) {
        self.cloud_spin = spin;
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    fn bake_terrain_material(&mut self) {
        let params = self.terrain.params();
        let resolution = params.resolution();
        let emissive = params.emissive();
        debug!("Baking terrain material at {resolution}x{resolution}");

        let field = self.terrain.scalar_field(self.config.offset);
        self.terrain_material = bake_terrain(
            &field,
            &self.terrain_palette,
            resolution,
            self.water_level,
            emissive,
        );
    }

    fn bake_cloud_material(&mut self) {
        let resolution = self.clouds.params().resolution();
        debug!("Baking cloud material at {resolution}x{resolution}");

        let field = self.clouds.scalar_field(self.config.offset);
        self.cloud_material = bake_clouds(&field, self.cloud_tint, resolution);
    }
}
