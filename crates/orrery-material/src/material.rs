//! Core material types: [`ColorStop`] and [`Material`].

use serde::{Deserialize, Serialize};

/// One marker of a piecewise-linear color gradient over normalized height.
///
/// A gradient is a sequence of stops sorted ascending by `position`;
/// positions nominally live in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Normalized height this stop anchors to.
    pub position: f32,
    /// Linear RGB color at the anchor.
    pub color: [f32; 3],
}

impl ColorStop {
    /// Create a stop at `position` with the given color.
    pub fn new(position: f32, color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Baked texture set for one surface.
///
/// Each buffer is either empty (the feature is absent) or holds exactly
/// `resolution² · channels` bytes. Occlusion is reserved and never
/// populated by the baker.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Square texture edge length in texels.
    pub resolution: u32,
    /// Bytes per texel, always 4 (RGBA).
    pub channels: u32,
    pub albedo: Vec<u8>,
    pub emissive: Vec<u8>,
    pub normal: Vec<u8>,
    pub occlusion: Vec<u8>,
    pub metallic_roughness: Vec<u8>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Material {
    /// An empty material shell at the given resolution.
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            channels: 4,
            albedo: Vec::new(),
            emissive: Vec::new(),
            normal: Vec::new(),
            occlusion: Vec::new(),
            metallic_roughness: Vec::new(),
        }
    }

    /// Expected byte length of a populated buffer.
    pub fn buffer_len(&self) -> usize {
        (self.resolution as usize).pow(2) * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material_is_rgba_and_empty() {
        let mat = Material::new(128);
        assert_eq!(mat.resolution, 128);
        assert_eq!(mat.channels, 4);
        assert!(mat.albedo.is_empty());
        assert!(mat.emissive.is_empty());
        assert!(mat.normal.is_empty());
        assert!(mat.occlusion.is_empty());
        assert!(mat.metallic_roughness.is_empty());
    }

    #[test]
    fn test_default_material_matches_baseline_resolution() {
        let mat = Material::default();
        assert_eq!(mat.resolution, 256);
        assert_eq!(mat.channels, 4);
    }

    #[test]
    fn test_buffer_len_is_texels_times_channels() {
        assert_eq!(Material::new(64).buffer_len(), 64 * 64 * 4);
        assert_eq!(Material::new(256).buffer_len(), 256 * 256 * 4);
    }

    #[test]
    fn test_color_stop_roundtrips_through_serde() {
        let stop = ColorStop::new(0.54, [0.714, 0.890, 0.859]);
        let json = serde_json::to_string(&stop).unwrap();
        let back: ColorStop = serde_json::from_str(&json).unwrap();
        assert_eq!(stop, back);
    }
}
