//! UV-sphere mesh generation.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by mesh configuration validation.
#[derive(Debug, Error)]
pub enum SphereError {
    /// Sphere radius must be strictly positive.
    #[error("sphere radius must be positive, got {0}")]
    InvalidRadius(f32),

    /// A UV sphere needs at least two latitude rings.
    #[error("uv sphere needs at least 2 stacks, got {0}")]
    InvalidStacks(u32),

    /// A UV sphere needs at least three longitude segments.
    #[error("uv sphere needs at least 3 sectors, got {0}")]
    InvalidSectors(u32),

    /// Vertex count no longer fits the 16-bit index buffer.
    #[error("vertex count {0} exceeds the 16-bit index range")]
    IndexOverflow(usize),
}

/// Construction parameters for a planet's sphere meshes.
///
/// Immutable once handed to a `Planet`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Size of the sphere.
    pub radius: f32,
    /// Latitude rings, minimum of 2.
    pub stacks: u32,
    /// Longitude segments, minimum of 3.
    pub sectors: u32,
    /// Flip the winding order, for inside-out sky/shell meshes.
    pub inverted: bool,
    /// Location in world space.
    pub offset: Vec3,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            stacks: 32,
            sectors: 64,
            inverted: false,
            offset: Vec3::ZERO,
        }
    }
}

/// A triangle-list mesh with parallel vertex attribute arrays.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Build the sphere mesh described by `config`.
    pub fn from_config(config: &MeshConfig) -> Result<Self, SphereError> {
        uv_sphere(config.radius, config.stacks, config.sectors, config.inverted)
    }
}

/// Generate a latitude/longitude sphere.
///
/// Produces `(stacks + 1) · (sectors + 1)` vertices. Each quad cell emits two
/// triangles except at the poles, where the triangle collapsing onto the
/// pole ring is skipped (it would have zero area). `inverted` flips the
/// winding order so the sphere renders from the inside.
pub fn uv_sphere(
    radius: f32,
    stacks: u32,
    sectors: u32,
    inverted: bool,
) -> Result<Mesh, SphereError> {
    use std::f32::consts::{PI, TAU};

    if radius <= 0.0 {
        return Err(SphereError::InvalidRadius(radius));
    }
    if stacks < 2 {
        return Err(SphereError::InvalidStacks(stacks));
    }
    if sectors < 3 {
        return Err(SphereError::InvalidSectors(sectors));
    }
    let vertex_count = (stacks as usize + 1) * (sectors as usize + 1);
    if vertex_count > u16::MAX as usize + 1 {
        return Err(SphereError::IndexOverflow(vertex_count));
    }

    let mut mesh = Mesh::default();
    mesh.positions.reserve(vertex_count);
    mesh.normals.reserve(vertex_count);
    mesh.uvs.reserve(vertex_count);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let phi = v * PI;
        for j in 0..=sectors {
            let u = j as f32 / sectors as f32;
            let theta = u * TAU;

            let dir = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            mesh.positions.push(dir * radius);
            mesh.normals.push(dir.normalize());
            mesh.uvs.push([u, v]);
        }
    }

    for i in 0..stacks {
        // k1 walks the current ring, k2 the next one down.
        let mut k1 = (i * (sectors + 1)) as u16;
        let mut k2 = k1 + sectors as u16 + 1;
        for _ in 0..sectors {
            if !inverted {
                if i != 0 {
                    mesh.indices.extend_from_slice(&[k1 + 1, k2, k1]);
                }
                if i != stacks - 1 {
                    mesh.indices.extend_from_slice(&[k2 + 1, k2, k1 + 1]);
                }
            } else {
                if i != 0 {
                    mesh.indices.extend_from_slice(&[k1, k2, k1 + 1]);
                }
                if i != stacks - 1 {
                    mesh.indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
                }
            }
            k1 += 1;
            k2 += 1;
        }
    }

    Ok(mesh)
}
