//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Wall-clock time passed in by the caller, never sampled here
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod field;
pub mod shape;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use field::{FieldMode, ParticleField};
pub use shape::Shape;
pub use state::{ReactorEvent, ReactorState, SessionPhase};
pub use tick::{TickInput, tick};
