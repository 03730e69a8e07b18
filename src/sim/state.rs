//! Reactor state and session types
//!
//! One owned context object holds everything the simulation mutates; the
//! shell passes it to `tick` along with the frame's input and wall-clock
//! time. No module-level globals.

use super::difficulty::Difficulty;
use super::field::{FieldMode, ParticleField};
use super::shape::Shape;
use crate::consts::PARTICLE_COUNT;

/// Current phase of the stabilization session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No hold in progress; the field drifts chaotically
    #[default]
    Idle,
    /// Player is holding; the field converges and progress accrues
    Holding,
    /// Hold reached 100%; frozen until the player dismisses the result
    Completed,
}

/// Events emitted by a tick, for the shell to act on
#[derive(Debug, Clone, PartialEq)]
pub enum ReactorEvent {
    /// A hold started
    HoldStarted,
    /// A hold was released before reaching 100%; the field exploded
    HoldBroken,
    /// A hold reached 100%
    Completed {
        elapsed_seconds: f64,
        difficulty: Difficulty,
        shape: Shape,
    },
}

/// Complete reactor state: active selection, session bookkeeping, and the
/// particle buffers.
#[derive(Debug, Clone)]
pub struct ReactorState {
    pub difficulty: Difficulty,
    pub shape: Shape,
    pub phase: SessionPhase,
    /// Wall-clock ms when the current hold began (valid while Holding)
    pub hold_started_ms: f64,
    /// Hold progress in percent, 0..=100
    pub progress: f32,
    /// Elapsed seconds of the completed hold (valid while Completed)
    pub completed_elapsed_seconds: f64,
    pub field: ParticleField,
    /// Seed for the next field rebuild; bumped on every rebuild so switching
    /// back and forth never replays the same layout
    seed: u64,
}

impl ReactorState {
    /// Create a reactor with the default selection and a fresh field
    pub fn new(seed: u64) -> Self {
        let difficulty = Difficulty::default();
        let shape = Shape::default();
        let field = ParticleField::new(
            PARTICLE_COUNT,
            shape,
            difficulty.profile().chaos_multiplier,
            seed,
        );
        Self {
            difficulty,
            shape,
            phase: SessionPhase::Idle,
            hold_started_ms: 0.0,
            progress: 0.0,
            completed_elapsed_seconds: 0.0,
            field,
            seed,
        }
    }

    /// Field update rule implied by the current phase
    pub fn field_mode(&self) -> FieldMode {
        match self.phase {
            SessionPhase::Idle => FieldMode::Chaotic,
            // Completed keeps converging so the settled cloud stays settled
            SessionPhase::Holding | SessionPhase::Completed => FieldMode::Converging,
        }
    }

    /// Throw away the particle buffers and rebuild for the current
    /// difficulty/shape selection
    pub fn rebuild_field(&mut self, count: usize) {
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.field = ParticleField::new(
            count,
            self.shape,
            self.difficulty.profile().chaos_multiplier,
            self.seed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_chaotic() {
        let state = ReactorState::new(11);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.field_mode(), FieldMode::Chaotic);
        assert_eq!(state.field.count(), PARTICLE_COUNT);
    }

    #[test]
    fn test_rebuild_discards_buffers() {
        let mut state = ReactorState::new(11);
        let before = state.field.positions.clone();
        state.rebuild_field(PARTICLE_COUNT);
        assert_eq!(state.field.positions.len(), before.len());
        assert_ne!(state.field.positions, before);
    }

    #[test]
    fn test_completed_keeps_converging() {
        let mut state = ReactorState::new(11);
        state.phase = SessionPhase::Completed;
        assert_eq!(state.field_mode(), FieldMode::Converging);
    }
}
