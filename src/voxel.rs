use crate::error::ConfigError;

/// Unit cube at an integer position relative to the dome centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Voxel { x, y, z }
    }

    /// Euclidean distance from the dome centre
    pub fn distance(&self) -> f64 {
        let (x, y, z) = (self.x as f64, self.y as f64, self.z as f64);
        (x * x + y * y + z * z).sqrt()
    }

    pub fn as_point(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }
}

/// Validated hemisphere parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellParams {
    radius: u32,
    thickness: u32,
    filled: bool,
}

impl ShellParams {
    /// Checks the shape once at startup. Thickness is only bounded in shell mode.
    pub fn new(radius: i64, thickness: i64, filled: bool) -> Result<Self, ConfigError> {
        if radius < 1 || radius > i32::MAX as i64 {
            return Err(ConfigError::InvalidRadius(radius));
        }
        if thickness < 1 {
            return Err(ConfigError::InvalidThickness(thickness));
        }
        if !filled && thickness > radius + 1 {
            return Err(ConfigError::ThicknessTooLarge {
                thickness,
                limit: radius + 1,
            });
        }
        Ok(ShellParams {
            radius: radius as u32,
            thickness: thickness.min(radius + 1) as u32,
            filled,
        })
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn thickness(&self) -> u32 {
        self.thickness
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn build(&self) -> Vec<Voxel> {
        build_hemisphere(self.radius, self.filled, self.thickness)
    }
}

/// Outer membership bound, half a unit past the radius.
pub fn outer_bound(radius: u32) -> f64 {
    radius as f64 + 0.5
}

/// Inner membership bound for a shell of the given thickness.
pub fn inner_bound(radius: u32, thickness: u32) -> f64 {
    (radius as f64 - thickness as f64) + 0.5
}

/// Enumerates the upper half of the bounding cube (y, then z, then x) and
/// keeps every point whose distance lies within the shell band.
///
/// The order carries no meaning; the renderer re-sorts by depth every frame.
pub fn build_hemisphere(radius: u32, filled: bool, thickness: u32) -> Vec<Voxel> {
    let r = radius as i32;
    let outer = outer_bound(radius);
    let inner = inner_bound(radius, thickness);

    let mut voxels = Vec::new();
    for y in 0..=r {
        for z in -r..=r {
            for x in -r..=r {
                let voxel = Voxel::new(x, y, z);
                let d = voxel.distance();
                let place = if filled {
                    d <= outer
                } else {
                    d <= outer && d >= inner
                };
                if place {
                    voxels.push(voxel);
                }
            }
        }
    }
    voxels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_voxels_stay_inside_band() {
        for radius in 1..=12 {
            for thickness in 1..=3 {
                let outer = outer_bound(radius);
                let inner = inner_bound(radius, thickness);
                for v in build_hemisphere(radius, false, thickness) {
                    let d = v.distance();
                    assert!(d <= outer && d >= inner, "{v:?} at {d} outside [{inner}, {outer}]");
                    assert!(v.y >= 0);
                }
            }
        }
    }

    #[test]
    fn filled_voxels_stay_inside_outer_bound() {
        let voxels = build_hemisphere(6, true, 1);
        assert!(voxels.contains(&Voxel::new(0, 0, 0)));
        for v in &voxels {
            assert!(v.distance() <= outer_bound(6));
            assert!(v.y >= 0);
        }
    }

    #[test]
    fn filled_is_superset_of_shell() {
        let shell = build_hemisphere(8, false, 2);
        let filled = build_hemisphere(8, true, 2);
        assert!(filled.len() > shell.len());
        assert!(shell.iter().all(|v| filled.contains(v)));
    }

    #[test]
    fn build_is_deterministic() {
        let a = build_hemisphere(11, false, 1);
        let b = build_hemisphere(11, false, 1);
        assert_eq!(a.len(), b.len());
        assert_eq!(a, b);
    }

    #[test]
    fn zero_radius_yields_origin_only() {
        let voxels = build_hemisphere(0, false, 1);
        assert!(!voxels.is_empty());
        assert!(voxels.iter().all(|v| v.distance() <= 0.5));
        assert_eq!(voxels, vec![Voxel::new(0, 0, 0)]);
    }

    #[test]
    fn enumeration_starts_at_the_floor() {
        let voxels = build_hemisphere(3, false, 1);
        assert_eq!(voxels.first().map(|v| v.y), Some(0));
        assert_eq!(voxels.last().map(|v| v.y), Some(3));
        assert!(voxels.windows(2).all(|w| w[0].y <= w[1].y));
    }

    #[test]
    fn apex_is_part_of_the_shell() {
        let voxels = build_hemisphere(11, false, 1);
        assert!(voxels.contains(&Voxel::new(0, 11, 0)));
        assert!(!voxels.contains(&Voxel::new(0, 9, 0)));
    }

    #[test]
    fn params_reject_degenerate_shapes() {
        assert_eq!(ShellParams::new(0, 1, false), Err(ConfigError::InvalidRadius(0)));
        assert_eq!(ShellParams::new(-3, 1, false), Err(ConfigError::InvalidRadius(-3)));
        assert_eq!(ShellParams::new(4, 0, false), Err(ConfigError::InvalidThickness(0)));
        assert_eq!(
            ShellParams::new(4, 6, false),
            Err(ConfigError::ThicknessTooLarge { thickness: 6, limit: 5 })
        );
        let params = ShellParams::new(4, 5, false).unwrap();
        assert_eq!(params.thickness(), 5);
        assert!(ShellParams::new(4, 9, true).is_ok());
    }

    #[test]
    fn params_build_matches_free_function() {
        let params = ShellParams::new(5, 2, false).unwrap();
        assert_eq!(params.build(), build_hemisphere(5, false, 2));
    }
}
