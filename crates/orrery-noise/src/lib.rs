//! Noise-field variants for planet surfaces and cloud shells.
//!
//! Every preset composes basis noise from the `noise` crate with the
//! fractal and domain combinators in this crate, then samples the result
//! over the cached spherical grid. Terrain presets additionally carry an
//! ordered color gradient; cloud presets carry a tint.

mod clouds;
mod field;
mod fractal;
mod ops;
mod terrain;

pub use clouds::{CirrusClouds, DenseClouds, NoClouds, PlanetaryShield};
pub use field::{Clouds, FieldParams, NoiseField, Terrain};
pub use fractal::{Fbm, FractalLayers, PingPong, Ridged};
pub use ops::{CellLookup, SmoothMax, TerraceStep, min_max_normalize};
pub use terrain::{Alien, Barren, Gaia, Machine, Moon, Sun, Volcanic};
