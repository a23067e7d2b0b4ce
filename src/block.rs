use crate::math::{depth_key, iso_project, rotate_y, shade};
use crate::voxel::Voxel;

/// A voxel placed on screen for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBlock {
    /// Top-left corner on the screen
    pub screen_position: [f64; 2],
    /// Draw-order key, not a camera distance
    pub depth: f64,
    /// Brightness scalar, `[0.5, 1.0]` inside the dome radius
    pub shade: f64,
}

/// Fixed inputs of the projection stage for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub scale: f64,
    pub origin: [f64; 2],
    /// Dome radius used to normalise the shading term
    pub radius: f64,
}

/// Rotates every voxel by `angle` and projects it. Output order follows the
/// input, one block per voxel.
pub fn project(voxels: &[Voxel], angle: f64, params: &ProjectionParams) -> Vec<ProjectedBlock> {
    voxels
        .iter()
        .map(|voxel| {
            let rotated = rotate_y(&voxel.as_point(), angle);
            ProjectedBlock {
                screen_position: iso_project(&rotated, params.scale, params.origin),
                depth: depth_key(&rotated),
                shade: shade(&rotated, angle, params.radius),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{ISO_DIAGONAL_RATIO, ISO_HEIGHT_RATIO};
    use crate::voxel::build_hemisphere;
    use std::f64::consts::TAU;

    fn params(scale: f64, radius: u32) -> ProjectionParams {
        ProjectionParams {
            scale,
            origin: [200.0, 150.0],
            radius: radius as f64,
        }
    }

    fn y_span(blocks: &[ProjectedBlock]) -> f64 {
        let ys = blocks.iter().map(|b| b.screen_position[1]);
        let max = ys.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = ys.fold(f64::INFINITY, f64::min);
        max - min
    }

    #[test]
    fn one_block_per_voxel() {
        let voxels = build_hemisphere(7, false, 2);
        let blocks = project(&voxels, 1.3, &params(3.0, 7));
        assert_eq!(blocks.len(), voxels.len());
    }

    #[test]
    fn origin_voxel_lands_on_origin() {
        let blocks = project(&[Voxel::new(0, 0, 0)], 2.1, &params(5.0, 1));
        assert_eq!(blocks[0].screen_position, [200.0, 150.0]);
        assert_eq!(blocks[0].depth, 0.0);
        assert_eq!(blocks[0].shade, 0.75);
    }

    #[test]
    fn dome_height_span_reflects_projection_ratios() {
        let radius = 11;
        let scale = 4.0;
        let voxels = build_hemisphere(radius, false, 1);
        let span = y_span(&project(&voxels, 0.0, &params(scale, radius)));

        let r = radius as f64;
        // Lower bound from the apex rise plus one diagonal radius
        let lower = scale * (r * ISO_HEIGHT_RATIO + r * ISO_DIAGONAL_RATIO);
        // Upper bound from the continuous hemisphere of radius r + 0.5
        let rim = 2f64.sqrt() * ISO_DIAGONAL_RATIO;
        let cap = (2.0 * ISO_DIAGONAL_RATIO.powi(2) + ISO_HEIGHT_RATIO.powi(2)).sqrt();
        let upper = scale * (r + 0.5) * (rim + cap);
        assert!(span >= lower && span <= upper, "span {span} not in [{lower}, {upper}]");

        // Extremes are (8, 0, 8) below and (-4, 10, -4) above
        assert!((span - scale * 21.72).abs() < 1e-9);
    }

    #[test]
    fn projection_is_periodic_in_a_full_turn() {
        let voxels = build_hemisphere(11, false, 1);
        let p = params(4.0, 11);
        for angle in [0.0, 0.4, 2.5, 5.9] {
            let a = project(&voxels, angle, &p);
            let b = project(&voxels, angle + TAU, &p);
            for (x, y) in a.iter().zip(&b) {
                assert!((x.screen_position[0] - y.screen_position[0]).abs() < 1e-9);
                assert!((x.screen_position[1] - y.screen_position[1]).abs() < 1e-9);
                assert!((x.depth - y.depth).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn shade_range_holds_across_angles() {
        let voxels: Vec<Voxel> = build_hemisphere(11, true, 1)
            .into_iter()
            .filter(|v| v.distance() <= 11.0)
            .collect();
        for step in 0..24 {
            let angle = step as f64 * TAU / 24.0;
            for block in project(&voxels, angle, &params(4.0, 11)) {
                assert!((0.5..=1.0).contains(&block.shade));
            }
        }
    }
}
