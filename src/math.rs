//! Rotation, oblique projection and the per-voxel shading heuristics.
//!
//! The projection ratios and the depth weight are visual tuning values, not
//! physically derived. Changing them changes the dome silhouette.

/// Horizontal screen scale applied to `x - z`.
pub const ISO_HORIZONTAL_RATIO: f64 = 0.95;
/// Diagonal (downward) screen scale applied to `x + z`.
pub const ISO_DIAGONAL_RATIO: f64 = 0.48;
/// Upward screen scale applied to height.
pub const ISO_HEIGHT_RATIO: f64 = 1.02;
/// Share of the height mixed into the draw-order key.
pub const DEPTH_HEIGHT_WEIGHT: f64 = 0.35;

pub const SHADE_BASE: f64 = 0.75;
pub const SHADE_RANGE: f64 = 0.25;
/// Keeps the radius normalisation away from zero.
pub const SHADE_RADIUS_PAD: f64 = 0.01;

pub const OPACITY_BASE: f64 = 0.78;
pub const OPACITY_RANGE: f64 = 0.22;

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Rotation about the vertical axis
pub fn rotation_y(angle: f64) -> [[f64; 3]; 3] {
    let (sin_a, cos_a) = angle.sin_cos();
    [[cos_a, 0.0, sin_a], [0.0, 1.0, 0.0], [-sin_a, 0.0, cos_a]]
}

/// Rotates a point about the vertical axis, leaving its height untouched
pub fn rotate_y(point: &[f64; 3], angle: f64) -> [f64; 3] {
    multiply_matrix_vector(&rotation_y(angle), point)
}

/// Maps a rotated point onto the screen around `origin`
pub fn iso_project(point: &[f64; 3], scale: f64, origin: [f64; 2]) -> [f64; 2] {
    let [x, y, z] = *point;
    let sx = (x - z) * scale * ISO_HORIZONTAL_RATIO;
    let sy = (x + z) * scale * ISO_DIAGONAL_RATIO - y * scale * ISO_HEIGHT_RATIO;
    [origin[0] + sx, origin[1] + sy]
}

/// Draw-order key: larger values are nearer the viewer
pub fn depth_key(point: &[f64; 3]) -> f64 {
    (point[0] + point[2]) + point[1] * DEPTH_HEIGHT_WEIGHT
}

/// Brightness stand-in for a rotated point, in `[0.5, 1.0]` while the point
/// lies within `radius` of the centre.
pub fn shade(point: &[f64; 3], angle: f64, radius: f64) -> f64 {
    let (sin_a, cos_a) = angle.sin_cos();
    let norm = radius + SHADE_RADIUS_PAD;
    SHADE_BASE + SHADE_RANGE * (cos_a * (point[0] / norm) + sin_a * (point[2] / norm))
}

/// Block opacity for a shading value
pub fn opacity(shade: f64) -> f64 {
    OPACITY_BASE + OPACITY_RANGE * shade
}
