//! UV-sphere geometry and the cached spherical sampling grid.
//!
//! `coords` provides the process-wide, resolution-keyed grid of unit-sphere
//! sample points that every noise preset reads from; `mesh` builds the
//! latitude/longitude sphere meshes the host renders.

mod coords;
mod mesh;

pub use coords::{SphericalGrid, grid, reset_grid_cache};
pub use mesh::{Mesh, MeshConfig, SphereError, uv_sphere};
