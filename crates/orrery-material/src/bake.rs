//! Bakes a raw scalar field into texture buffers.
//!
//! Every pass first normalizes field values from `[-1, 1]` to `[0, 1]` via
//! `(v + 1) / 2`, then maps the normalized height per texel. Passes write
//! disjoint output ranges and only read the immutable input field, so each
//! one runs data-parallel across texels.

use rayon::prelude::*;

use crate::material::{ColorStop, Material};

/// Sobel bump strength for submerged texels, and for cloud layers.
const WATER_NORMAL_STRENGTH: f32 = 3.0;
/// Sobel bump strength for land texels at the baseline resolution.
const LAND_NORMAL_STRENGTH: f32 = 15.0;
/// Resolution at which `LAND_NORMAL_STRENGTH` is calibrated; land strength
/// scales linearly with resolution so bump intensity reads the same at any
/// texture size.
const NORMAL_STRENGTH_BASELINE: f32 = 256.0;
/// Cloud layers split their roughness remap at this fixed height instead of
/// the planet's configurable water level.
const CLOUD_ROUGHNESS_THRESHOLD: f32 = 0.540;
/// Amplitude of the per-texel cloud tint perturbation.
const CLOUD_COLOR_VARIATION: f32 = 0.8;

/// Bake the full texture set for a terrain surface.
///
/// `field` holds `resolution²` raw noise values; an empty field leaves the
/// color buffers zeroed and the normal map absent. When `emissive` is set
/// the emissive buffer is a copy of the albedo.
pub fn bake_terrain(
    field: &[f32],
    stops: &[ColorStop],
    resolution: u32,
    water_level: f32,
    emissive: bool,
) -> Material {
    let mut material = Material::new(resolution);

    let mut albedo = vec![0u8; material.buffer_len()];
    albedo[..field.len() * 4]
        .par_chunks_exact_mut(4)
        .zip(field.par_iter())
        .for_each(|(texel, &raw)| {
            let height = (raw + 1.0) * 0.5;
            let color = color_at(stops, height);
            texel[0] = (255.0 * color[0]) as u8;
            texel[1] = (255.0 * color[1]) as u8;
            texel[2] = (255.0 * color[2]) as u8;
            texel[3] = 255;
        });

    if !field.is_empty() {
        let land_strength = LAND_NORMAL_STRENGTH * resolution as f32 / NORMAL_STRENGTH_BASELINE;
        material.normal = bake_normal(field, resolution, |height| {
            if height >= water_level {
                land_strength
            } else {
                WATER_NORMAL_STRENGTH
            }
        });
    }

    let mut rough = vec![0u8; material.buffer_len()];
    rough[..field.len() * 4]
        .par_chunks_exact_mut(4)
        .zip(field.par_iter())
        .for_each(|(texel, &raw)| {
            let height = (raw + 1.0) * 0.5;
            texel[1] = roughness_byte(height, water_level);
            texel[3] = 255;
        });
    material.metallic_roughness = rough;

    if emissive {
        material.emissive = albedo.clone();
    }
    material.albedo = albedo;
    material
}

/// Bake the texture set for a cloud shell.
///
/// Coverage comes from the raw field: alpha is `255·clamp(raw, 0, 1)`,
/// independent of the normalized height that drives the tint. An empty
/// field means "no clouds": color buffers stay zeroed (fully transparent)
/// and no normal map is generated.
pub fn bake_clouds(field: &[f32], tint: [f32; 3], resolution: u32) -> Material {
    let mut material = Material::new(resolution);

    let mut albedo = vec![0u8; material.buffer_len()];
    albedo[..field.len() * 4]
        .par_chunks_exact_mut(4)
        .zip(field.par_iter())
        .for_each(|(texel, &raw)| {
            let height = (raw + 1.0) * 0.5;
            let color = cloud_color_at(tint, height);
            texel[0] = (255.0 * color[0]) as u8;
            texel[1] = (255.0 * color[1]) as u8;
            texel[2] = (255.0 * color[2]) as u8;
            texel[3] = (255.0 * raw.clamp(0.0, 1.0)) as u8;
        });
    material.albedo = albedo;

    let mut rough = vec![0u8; material.buffer_len()];
    rough[..field.len() * 4]
        .par_chunks_exact_mut(4)
        .zip(field.par_iter())
        .for_each(|(texel, &raw)| {
            let height = (raw + 1.0) * 0.5;
            texel[1] = roughness_byte(height, CLOUD_ROUGHNESS_THRESHOLD);
            texel[3] = 255;
        });
    material.metallic_roughness = rough;

    if !field.is_empty() {
        material.normal = bake_normal(field, resolution, |_| WATER_NORMAL_STRENGTH);
    }
    material
}

/// Look up the gradient color for a normalized height.
///
/// Scans the stop intervals from the start; heights at or past the last
/// stop clamp to its color. With no stops the fallback is grayscale equal
/// to the height. The first bracket test compares against the second stop,
/// so a height below the first stop still interpolates the first interval
/// and `t` goes negative; extrapolation is intentional.
fn color_at(stops: &[ColorStop], height: f32) -> [f32; 3] {
    if stops.is_empty() {
        return [height, height, height];
    }

    for pair in stops.windows(2) {
        if height < pair[1].position {
            let t = (height - pair[0].position) / (pair[1].position - pair[0].position);
            return lerp_color(pair[0].color, pair[1].color, t);
        }
    }

    stops[stops.len() - 1].color
}

/// Perturb the cloud tint by the texel's height.
///
/// A single offset proportional to `height - 0.5` is added to all three
/// channels and clamped, shifting the tint's brightness in bands rather
/// than shading it by hue.
fn cloud_color_at(tint: [f32; 3], height: f32) -> [f32; 3] {
    let offset = (height - 0.5) * CLOUD_COLOR_VARIATION;
    [
        (tint[0] + offset).clamp(0.0, 1.0),
        (tint[1] + offset).clamp(0.0, 1.0),
        (tint[2] + offset).clamp(0.0, 1.0),
    ]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

fn remap(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Two-branch roughness remap around the threshold.
///
/// Below (inclusive): `[0, threshold] -> [255, 80]`, deep water rough and
/// the shoreline glossy. Above: `[threshold, 1] -> [255, 0]`, beaches
/// rough again, peaks polished.
fn roughness_byte(height: f32, threshold: f32) -> u8 {
    let value = if height <= threshold {
        remap(height, 0.0, threshold, 255.0, 80.0)
    } else {
        remap(height, threshold, 1.0, 255.0, 0.0)
    };
    value.round() as u8
}

/// Extract a tangent-space normal map from the field with a 3×3 Sobel
/// filter.
///
/// Neighbor lookups wrap toroidally on both axes. `strength_at` maps a
/// texel's normalized height to the bump strength dividing the Z component.
fn bake_normal(
    field: &[f32],
    resolution: u32,
    strength_at: impl Fn(f32) -> f32 + Sync,
) -> Vec<u8> {
    let width = resolution as usize;
    let height = field.len() / width.max(1);
    let mut normal = vec![0u8; field.len() * 4];

    let sample = |x: usize, y: usize| (field[y * width + x] + 1.0) * 0.5;

    normal
        .par_chunks_exact_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let up = (y + height - 1) % height;
            let down = (y + 1) % height;
            for x in 0..width {
                let left = (x + width - 1) % width;
                let right = (x + 1) % width;

                let tl = sample(left, up);
                let t = sample(x, up);
                let tr = sample(right, up);
                let l = sample(left, y);
                let c = sample(x, y);
                let r = sample(right, y);
                let bl = sample(left, down);
                let b = sample(x, down);
                let br = sample(right, down);

                let mut dx = -((tr + 2.0 * r + br) - (tl + 2.0 * l + bl));
                let mut dy = -((bl + 2.0 * b + br) - (tl + 2.0 * t + tr));
                let dz = 1.0 / strength_at(c);

                let len = (dx * dx + dy * dy + dz * dz).sqrt();
                dx /= len;
                dy /= len;

                let texel = &mut row[x * 4..x * 4 + 4];
                texel[0] = ((dx * 0.5 + 0.5) * 255.0) as u8;
                texel[1] = ((dy * 0.5 + 0.5) * 255.0) as u8;
                texel[2] = 255;
                texel[3] = 255;
            }
        });

    normal
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn gaia_stops() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.495, [0.110, 0.318, 0.792]),
            ColorStop::new(0.540, [0.714, 0.890, 0.859]),
            ColorStop::new(0.570, [0.898, 0.851, 0.761]),
            ColorStop::new(0.610, [0.447, 0.329, 0.157]),
            ColorStop::new(0.650, [0.710, 0.729, 0.380]),
            ColorStop::new(1.000, [0.486, 0.553, 0.298]),
        ]
    }

    #[test]
    fn test_height_normalization_endpoints() {
        for (raw, expected) in [(-1.0f32, 0.0f32), (0.0, 0.5), (1.0, 1.0)] {
            let normalized = (raw + 1.0) * 0.5;
            assert!(
                (normalized - expected).abs() < EPSILON,
                "({raw} + 1)/2 should be {expected}, got {normalized}"
            );
        }
    }

    #[test]
    fn test_gradient_is_idempotent_at_every_stop() {
        let stops = gaia_stops();
        for stop in &stops {
            let color = color_at(&stops, stop.position);
            for ch in 0..3 {
                assert!(
                    (color[ch] - stop.color[ch]).abs() < EPSILON,
                    "Stop at {} not reproduced exactly: {color:?} vs {:?}",
                    stop.position,
                    stop.color
                );
            }
        }
    }

    #[test]
    fn test_gradient_interpolates_midway_between_stops() {
        let stops = vec![
            ColorStop::new(0.0, [0.0, 0.0, 0.0]),
            ColorStop::new(1.0, [1.0, 0.5, 0.0]),
        ];
        let color = color_at(&stops, 0.5);
        assert!((color[0] - 0.5).abs() < EPSILON);
        assert!((color[1] - 0.25).abs() < EPSILON);
        assert!((color[2] - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_gradient_clamps_past_the_last_stop() {
        let stops = gaia_stops();
        let color = color_at(&stops, 1.5);
        assert_eq!(color, stops[stops.len() - 1].color);
    }

    #[test]
    fn test_gradient_extrapolates_below_the_first_stop() {
        // The first bracket test compares against the second stop, so a
        // height below the first stop interpolates with t < 0.
        let stops = vec![
            ColorStop::new(0.4, [0.5, 0.5, 0.5]),
            ColorStop::new(0.6, [0.7, 0.7, 0.7]),
        ];
        let color = color_at(&stops, 0.2);
        assert!(
            (color[0] - 0.3).abs() < EPSILON,
            "Expected extrapolated 0.3, got {}",
            color[0]
        );
    }

    #[test]
    fn test_empty_gradient_falls_back_to_grayscale_height() {
        let color = color_at(&[], 0.25);
        assert_eq!(color, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_roughness_remap_anchors() {
        let threshold = 0.540;
        // Both branch start points map to full roughness.
        assert_eq!(roughness_byte(0.0, threshold), 255);
        assert_eq!(roughness_byte(threshold + 1e-4, threshold), 255);
        // The inclusive threshold itself takes the submerged branch.
        assert_eq!(roughness_byte(threshold, threshold), 80);
        // Branch end points.
        assert_eq!(roughness_byte(1.0, threshold), 0);
    }

    #[test]
    fn test_terrain_buffers_have_rgba_layout() {
        let field = vec![0.0f32; 16 * 16];
        let mat = bake_terrain(&field, &gaia_stops(), 16, 0.540, false);
        assert_eq!(mat.albedo.len(), 16 * 16 * 4);
        assert_eq!(mat.normal.len(), 16 * 16 * 4);
        assert_eq!(mat.metallic_roughness.len(), 16 * 16 * 4);
        assert!(mat.emissive.is_empty());
        assert!(mat.occlusion.is_empty());
        for texel in mat.albedo.chunks_exact(4) {
            assert_eq!(texel[3], 255, "Terrain albedo must be opaque");
        }
    }

    #[test]
    fn test_emissive_flag_copies_albedo() {
        let field: Vec<f32> = (0..64).map(|i| (i as f32 / 63.0) * 2.0 - 1.0).collect();
        let mat = bake_terrain(&field, &gaia_stops(), 8, 0.540, true);
        assert_eq!(mat.emissive, mat.albedo);
    }

    #[test]
    fn test_normal_bytes_decode_to_unit_vectors() {
        let field: Vec<f32> = (0..32 * 32)
            .map(|i| ((i % 7) as f32 / 3.0 - 1.0).clamp(-1.0, 1.0))
            .collect();
        let mat = bake_terrain(&field, &gaia_stops(), 32, 0.540, false);
        for texel in mat.normal.chunks_exact(4) {
            let x = texel[0] as f32 / 255.0 * 2.0 - 1.0;
            let y = texel[1] as f32 / 255.0 * 2.0 - 1.0;
            // Z is not stored; reconstruct it from the unit constraint.
            let z_sq = 1.0 - x * x - y * y;
            assert!(
                z_sq > -0.02,
                "Encoded XY exceed a unit vector: x={x}, y={y}"
            );
        }
    }

    #[test]
    fn test_flat_field_normals_point_straight_out() {
        let field = vec![0.25f32; 16 * 16];
        let mat = bake_terrain(&field, &gaia_stops(), 16, 0.540, false);
        for texel in mat.normal.chunks_exact(4) {
            // Zero gradient: dX = dY = 0 encodes to the midpoint byte.
            assert_eq!(texel[0], 127);
            assert_eq!(texel[1], 127);
            assert_eq!(texel[2], 255);
            assert_eq!(texel[3], 255);
        }
    }

    #[test]
    fn test_cloud_alpha_tracks_raw_field_not_height() {
        let field = vec![-0.5f32, 0.0, 0.5, 1.2];
        let mat = bake_clouds(&field, [1.0, 1.0, 1.0], 2);
        let alphas: Vec<u8> = mat.albedo.chunks_exact(4).map(|t| t[3]).collect();
        assert_eq!(alphas[0], 0, "Negative raw value must be fully transparent");
        assert_eq!(alphas[1], 0);
        assert_eq!(alphas[2], 127);
        assert_eq!(alphas[3], 255, "Raw value past 1 must clamp to opaque");
    }

    #[test]
    fn test_cloud_tint_perturbation_bands_and_clamps() {
        let tint = [0.0f32, 1.0, 1.0];
        // Height 1.0 shifts every channel up by 0.4.
        let high = cloud_color_at(tint, 1.0);
        assert!((high[0] - 0.4).abs() < EPSILON);
        assert_eq!(high[1], 1.0);
        assert_eq!(high[2], 1.0);
        // Height 0.0 shifts down by 0.4 and clamps at zero.
        let low = cloud_color_at(tint, 0.0);
        assert_eq!(low[0], 0.0);
        assert!((low[1] - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_empty_cloud_field_skips_normal_map() {
        let mat = bake_clouds(&[], [1.0, 1.0, 1.0], 8);
        assert!(mat.normal.is_empty(), "No-clouds field must not bake normals");
        assert_eq!(mat.albedo.len(), 8 * 8 * 4);
        assert!(mat.albedo.iter().all(|&b| b == 0));
        assert_eq!(mat.metallic_roughness.len(), 8 * 8 * 4);
    }

    #[test]
    fn test_cloud_roughness_uses_fixed_threshold() {
        // Height exactly at the fixed 0.540 threshold: submerged branch.
        let raw = 0.540f32 * 2.0 - 1.0;
        let mat = bake_clouds(&[raw; 4], [1.0, 1.0, 1.0], 2);
        for texel in mat.metallic_roughness.chunks_exact(4) {
            assert_eq!(texel[0], 0);
            assert_eq!(texel[1], 80);
            assert_eq!(texel[2], 0);
            assert_eq!(texel[3], 255);
        }
    }
}
