//! Particle field buffers and per-tick update rules
//!
//! Particles are stored column-wise in flat f32 buffers (3 components per
//! particle, same index layout across positions/velocities/colors) so the
//! renderer can consume them without conversion.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shape::Shape;
use crate::consts::*;
use crate::lerp;

/// Which update rule runs this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Damped random walk with boundary bounce, color pulled back to green
    Chaotic,
    /// Positions pulled toward origin, color pulled toward white
    Converging,
}

/// The particle field: flat position/velocity/color buffers plus the RNG
/// that drives drift. Rebuilt from scratch on every shape or difficulty
/// switch; nothing survives a rebuild.
#[derive(Debug, Clone)]
pub struct ParticleField {
    count: usize,
    /// Scales drift jitter and explosion velocity; from the active profile
    chaos_multiplier: f32,
    pub positions: Vec<f32>,
    pub velocities: Vec<f32>,
    pub colors: Vec<f32>,
    rng: Pcg32,
}

impl ParticleField {
    /// Build a fresh field: positions sampled from `shape`, velocities in a
    /// narrow symmetric range scaled by the chaos multiplier, color pure
    /// green.
    pub fn new(count: usize, shape: Shape, chaos_multiplier: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count * 3);
        let mut velocities = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);

        for _ in 0..count {
            let [x, y, z] = shape.sample_position(&mut rng);
            positions.extend_from_slice(&[x, y, z]);
            for _ in 0..3 {
                velocities.push((rng.random::<f32>() - 0.5) * SPAWN_SPEED_RANGE * chaos_multiplier);
            }
            colors.extend_from_slice(&[0.0, 1.0, 0.0]);
        }

        Self {
            count,
            chaos_multiplier,
            positions,
            velocities,
            colors,
            rng,
        }
    }

    /// Number of particles (fixed for the field's lifetime)
    pub fn count(&self) -> usize {
        self.count
    }

    /// Advance every particle by one tick under the given mode.
    ///
    /// Per-tick constants are intentionally not dt-scaled: the update runs
    /// once per animation frame, matching the shipped behavior.
    pub fn tick(&mut self, mode: FieldMode) {
        match mode {
            FieldMode::Converging => self.tick_converging(),
            FieldMode::Chaotic => self.tick_chaotic(),
        }
    }

    /// Discrete low-pass toward the origin; color trails behind on its way
    /// to white (smaller factor).
    fn tick_converging(&mut self) {
        for p in self.positions.iter_mut() {
            *p = lerp(*p, 0.0, POSITION_LERP);
        }
        for c in self.colors.iter_mut() {
            *c = lerp(*c, 1.0, COLOR_LERP_WHITE);
        }
    }

    /// Euler step, random-walk perturbation, damping, inelastic boundary
    /// bounce, color pulled back to green.
    fn tick_chaotic(&mut self) {
        for i in 0..self.count {
            let base = i * 3;

            for k in 0..3 {
                self.positions[base + k] += self.velocities[base + k];
            }

            for k in 0..3 {
                let jitter = (self.rng.random::<f32>() - 0.5) * DRIFT_JITTER;
                self.velocities[base + k] += jitter * self.chaos_multiplier;
                self.velocities[base + k] *= VELOCITY_DAMPING;
            }

            // Inelastic bounce: reflect and attenuate, but leave the position
            // where it landed, so a particle can sit past the boundary for a
            // tick before drifting back.
            let dist = (self.positions[base] * self.positions[base]
                + self.positions[base + 1] * self.positions[base + 1]
                + self.positions[base + 2] * self.positions[base + 2])
                .sqrt();
            if dist > BOUNDARY_RADIUS {
                for k in 0..3 {
                    self.velocities[base + k] *= BOUNCE_FACTOR;
                }
            }

            self.colors[base] = lerp(self.colors[base], 0.0, COLOR_LERP_GREEN);
            self.colors[base + 1] = lerp(self.colors[base + 1], 1.0, COLOR_LERP_GREEN);
            self.colors[base + 2] = lerp(self.colors[base + 2], 0.0, COLOR_LERP_GREEN);
        }
    }

    /// Scatter every particle: velocities re-rolled in a wide symmetric
    /// range, scaled up by difficulty. Fired when a hold is released early.
    pub fn explode(&mut self, release_boost: f32) {
        let scale = EXPLOSION_SPEED_RANGE * self.chaos_multiplier * release_boost;
        for v in self.velocities.iter_mut() {
            *v = (self.rng.random::<f32>() - 0.5) * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn particle_dist(field: &ParticleField, i: usize) -> f32 {
        let b = i * 3;
        (field.positions[b] * field.positions[b]
            + field.positions[b + 1] * field.positions[b + 1]
            + field.positions[b + 2] * field.positions[b + 2])
            .sqrt()
    }

    #[test]
    fn test_buffers_share_layout() {
        let field = ParticleField::new(64, Shape::Orb, 1.0, 1);
        assert_eq!(field.count(), 64);
        assert_eq!(field.positions.len(), 64 * 3);
        assert_eq!(field.velocities.len(), 64 * 3);
        assert_eq!(field.colors.len(), 64 * 3);
    }

    #[test]
    fn test_spawn_color_is_green() {
        let field = ParticleField::new(8, Shape::Cube, 1.5, 2);
        for i in 0..8 {
            assert_eq!(&field.colors[i * 3..i * 3 + 3], &[0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_converging_strictly_decreases_distance() {
        let mut field = ParticleField::new(32, Shape::Orb, 1.0, 3);
        for _ in 0..50 {
            let before: Vec<f32> = (0..32).map(|i| particle_dist(&field, i)).collect();
            field.tick(FieldMode::Converging);
            for (i, &b) in before.iter().enumerate() {
                let after = particle_dist(&field, i);
                assert!(after < b, "particle {i} did not move inward: {b} -> {after}");
            }
        }
    }

    #[test]
    fn test_converging_never_reaches_origin() {
        let mut field = ParticleField::new(16, Shape::Orb, 1.0, 4);
        for _ in 0..500 {
            field.tick(FieldMode::Converging);
        }
        // Low-pass converges asymptotically; every particle still off-center
        for i in 0..16 {
            assert!(particle_dist(&field, i) > 0.0);
        }
    }

    #[test]
    fn test_boundary_bounce_reflects_velocity() {
        let mut field = ParticleField::new(1, Shape::Orb, 1.0, 5);
        field.positions[0] = BOUNDARY_RADIUS + 10.0;
        field.positions[1] = 0.0;
        field.positions[2] = 0.0;
        field.velocities[0] = 1.0;
        field.velocities[1] = 0.0;
        field.velocities[2] = 0.0;

        field.tick(FieldMode::Chaotic);

        // Outward velocity flipped inward and attenuated (jitter and damping
        // shift it slightly off the exact -0.5 factor)
        assert!(field.velocities[0] < 0.0);
        assert!(field.velocities[0].abs() < 1.0);
    }

    #[test]
    fn test_explode_scales_with_boost() {
        let mut calm = ParticleField::new(256, Shape::Orb, 1.0, 6);
        let mut wild = ParticleField::new(256, Shape::Orb, 1.0, 6);
        calm.explode(1.0);
        wild.explode(1.8);

        let max_calm = calm.velocities.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        let max_wild = wild.velocities.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!(max_calm <= EXPLOSION_SPEED_RANGE / 2.0 + 1e-6);
        assert!(max_wild <= EXPLOSION_SPEED_RANGE * 1.8 / 2.0 + 1e-6);
        assert!(max_wild > max_calm);
    }

    proptest! {
        /// Colors stay inside [0,1] for any interleaving of modes and an
        /// explosion thrown in; the lerps never overshoot their targets.
        #[test]
        fn prop_colors_stay_in_unit_range(
            seed in 0u64..1000,
            steps in proptest::collection::vec(0u8..3, 1..200),
        ) {
            let mut field = ParticleField::new(32, Shape::Ring, 2.2, seed);
            for step in steps {
                match step {
                    0 => field.tick(FieldMode::Chaotic),
                    1 => field.tick(FieldMode::Converging),
                    _ => field.explode(1.8),
                }
                for &c in &field.colors {
                    prop_assert!((0.0..=1.0).contains(&c), "color out of range: {c}");
                }
            }
        }

        /// Converging ticks shrink the max distance from origin regardless of
        /// how much chaos ran first.
        #[test]
        fn prop_converging_contracts(seed in 0u64..1000, chaos_ticks in 0usize..50) {
            let mut field = ParticleField::new(16, Shape::Orb, 1.5, seed);
            for _ in 0..chaos_ticks {
                field.tick(FieldMode::Chaotic);
            }
            let before = (0..16)
                .map(|i| particle_dist(&field, i))
                .fold(0.0f32, f32::max);
            field.tick(FieldMode::Converging);
            let after = (0..16)
                .map(|i| particle_dist(&field, i))
                .fold(0.0f32, f32::max);
            prop_assert!(after < before);
        }
    }
}
