//! Material value objects and the scalar-field texture baker.
//!
//! A raw noise field comes in, RGBA byte buffers come out: gradient-mapped
//! albedo, a Sobel-derived normal map, a water-aware roughness map, and an
//! optional emissive copy. Buffers that are absent stay empty; the host
//! treats an empty buffer as "feature not present".

mod bake;
mod material;

pub use bake::{bake_clouds, bake_terrain};
pub use material::{ColorStop, Material};
