//! Spawn shapes for the particle field
//!
//! Each shape is a position sampler; switching shapes rebuilds the whole
//! field, so samplers only run at construction time.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::consts::{SHELL_MAX_RADIUS, SHELL_MIN_RADIUS};

/// Spawn shape for the particle field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Shape {
    #[default]
    Orb,
    Cube,
    Ring,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Orb => "orb",
            Shape::Cube => "cube",
            Shape::Ring => "ring",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "orb" | "sphere" => Some(Shape::Orb),
            "cube" => Some(Shape::Cube),
            "ring" | "torus" => Some(Shape::Ring),
            _ => None,
        }
    }

    /// Sample one spawn position.
    ///
    /// Orb draws radius and both angles independently (polar angle uniform in
    /// [0, pi], which packs particles toward the poles; the site always
    /// looked like this, so it stays). Cube and Ring spawn well inside the
    /// 60-unit bounce boundary.
    pub fn sample_position(&self, rng: &mut Pcg32) -> [f32; 3] {
        match self {
            Shape::Orb => {
                let radius =
                    rng.random::<f32>() * (SHELL_MAX_RADIUS - SHELL_MIN_RADIUS) + SHELL_MIN_RADIUS;
                let theta = rng.random::<f32>() * TAU;
                let phi = rng.random::<f32>() * PI;
                [
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                ]
            }
            Shape::Cube => {
                let half = 30.0;
                [
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                    (rng.random::<f32>() - 0.5) * 2.0 * half,
                ]
            }
            Shape::Ring => {
                let major = 30.0;
                let tube = 6.0;
                let theta = rng.random::<f32>() * TAU;
                let phi = rng.random::<f32>() * TAU;
                let r = major + tube * phi.cos();
                [r * theta.cos(), r * theta.sin(), tube * phi.sin()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOUNDARY_RADIUS;
    use rand::SeedableRng;

    #[test]
    fn test_roundtrip_names() {
        for s in [Shape::Orb, Shape::Cube, Shape::Ring] {
            assert_eq!(Shape::from_str(s.as_str()), Some(s));
        }
        assert_eq!(Shape::from_str("dodecahedron"), None);
    }

    #[test]
    fn test_orb_spawns_within_shell() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let [x, y, z] = Shape::Orb.sample_position(&mut rng);
            let dist = (x * x + y * y + z * z).sqrt();
            assert!(dist >= SHELL_MIN_RADIUS - 1e-3);
            assert!(dist < SHELL_MAX_RADIUS + 1e-3);
        }
    }

    #[test]
    fn test_all_shapes_spawn_inside_boundary() {
        let mut rng = Pcg32::seed_from_u64(42);
        for shape in [Shape::Orb, Shape::Cube, Shape::Ring] {
            for _ in 0..500 {
                let [x, y, z] = shape.sample_position(&mut rng);
                let dist = (x * x + y * y + z * z).sqrt();
                assert!(
                    dist < BOUNDARY_RADIUS + 1e-3,
                    "{shape:?} spawned outside boundary: {dist}"
                );
            }
        }
    }
}
