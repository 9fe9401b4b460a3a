//! Name-keyed preset registry.
//!
//! Maps the display names the host's editor shows to constructor functions
//! producing fresh default variants. Registration is explicit and
//! enumerable; asking for an unknown name is a hard error, never a silent
//! substitute.

use std::collections::HashMap;

use orrery_noise::{
    Alien, Barren, CirrusClouds, Clouds, DenseClouds, Gaia, Machine, Moon, NoClouds,
    PlanetaryShield, Sun, Terrain, Volcanic,
};
use thiserror::Error;

type TerrainCtor = fn() -> Box<dyn Terrain>;
type CloudCtor = fn() -> Box<dyn Clouds>;

/// Errors returned by registry lookups.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown terrain preset: {0}")]
    UnknownTerrain(String),

    #[error("unknown cloud preset: {0}")]
    UnknownClouds(String),
}

fn terrain_ctor<T: Terrain + Default + 'static>() -> Box<dyn Terrain> {
    Box::new(T::default())
}

fn cloud_ctor<T: Clouds + Default + 'static>() -> Box<dyn Clouds> {
    Box::new(T::default())
}

/// Lookup table from preset name to a freshly constructed default variant.
pub struct PresetRegistry {
    terrains: HashMap<String, TerrainCtor>,
    clouds: HashMap<String, CloudCtor>,
}

impl PresetRegistry {
    /// An empty registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            terrains: HashMap::new(),
            clouds: HashMap::new(),
        }
    }

    /// The full built-in catalog.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_terrain("Gaia", terrain_ctor::<Gaia>);
        registry.register_terrain("Barren", terrain_ctor::<Barren>);
        registry.register_terrain("Volcanic", terrain_ctor::<Volcanic>);
        registry.register_terrain("Sun", terrain_ctor::<Sun>);
        registry.register_terrain("Alien", terrain_ctor::<Alien>);
        registry.register_terrain("Machine World", terrain_ctor::<Machine>);
        registry.register_terrain("Moon", terrain_ctor::<Moon>);

        registry.register_clouds("None", cloud_ctor::<NoClouds>);
        registry.register_clouds("Cirrus", cloud_ctor::<CirrusClouds>);
        registry.register_clouds("Densely Clouded", cloud_ctor::<DenseClouds>);
        registry.register_clouds("Planetary Shield", cloud_ctor::<PlanetaryShield>);
        registry
    }

    /// Register a terrain constructor. Re-registering a name replaces the
    /// previous constructor.
    pub fn register_terrain(&mut self, name: &str, ctor: TerrainCtor) {
        self.terrains.insert(name.to_string(), ctor);
    }

    /// Register a cloud constructor. Re-registering a name replaces the
    /// previous constructor.
    pub fn register_clouds(&mut self, name: &str, ctor: CloudCtor) {
        self.clouds.insert(name.to_string(), ctor);
    }

    /// Registered terrain names, sorted for stable editor listings.
    pub fn terrain_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.terrains.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered cloud names, sorted for stable editor listings.
    pub fn cloud_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clouds.keys().cloned().collect();
        names.sort();
        names
    }

    /// Construct a fresh default instance of the named terrain preset.
    pub fn terrain(&self, name: &str) -> Result<Box<dyn Terrain>, RegistryError> {
        self.terrains
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| RegistryError::UnknownTerrain(name.to_string()))
    }

    /// Construct a fresh default instance of the named cloud preset.
    pub fn clouds(&self, name: &str) -> Result<Box<dyn Clouds>, RegistryError> {
        self.clouds
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| RegistryError::UnknownClouds(name.to_string()))
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
