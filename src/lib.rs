//! Neural Reactor - a hold-to-stabilize particle mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particle field, hold session, difficulty)
//! - `renderer`: WebGPU point-cloud presenter
//! - `presentation`: Read-only snapshot contract between sim and UI
//! - `scores`: Fastest-stabilization leaderboard in LocalStorage
//! - `settings`: Quality/accessibility preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod presentation;
pub mod renderer;
pub mod scores;
pub mod settings;
pub mod sim;

pub use scores::ScoreLedger;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Default number of particles in the field
    pub const PARTICLE_COUNT: usize = 2000;

    /// Spawn shell: radius sampled in [SHELL_MIN_RADIUS, SHELL_MAX_RADIUS)
    pub const SHELL_MIN_RADIUS: f32 = 10.0;
    pub const SHELL_MAX_RADIUS: f32 = 50.0;

    /// Particles drifting past this distance get an inelastic bounce
    pub const BOUNDARY_RADIUS: f32 = 60.0;

    /// Converging mode: per-tick lerp of position toward origin
    pub const POSITION_LERP: f32 = 0.05;
    /// Converging mode: per-tick lerp of color toward white (lags position)
    pub const COLOR_LERP_WHITE: f32 = 0.02;
    /// Chaotic mode: per-tick lerp of color back toward green
    pub const COLOR_LERP_GREEN: f32 = 0.05;

    /// Chaotic mode: velocity kept at 99% each tick
    pub const VELOCITY_DAMPING: f32 = 0.99;
    /// Chaotic mode: random-walk perturbation span (components in ± half)
    pub const DRIFT_JITTER: f32 = 0.05;
    /// Spawn velocity component span
    pub const SPAWN_SPEED_RANGE: f32 = 0.2;
    /// Explosion velocity component span before difficulty scaling
    pub const EXPLOSION_SPEED_RANGE: f32 = 2.0;
    /// Boundary bounce: velocity multiplied by this on all axes
    pub const BOUNCE_FACTOR: f32 = -0.5;

    /// Camera distance from origin
    pub const CAMERA_RADIUS: f32 = 50.0;
    /// Camera orbit speed while idle
    pub const ORBIT_SPEED_IDLE: f32 = 0.002;
    /// Camera orbit speed while holding
    pub const ORBIT_SPEED_HOLDING: f32 = 0.01;
}

/// Linear interpolation of `a` toward `b` by factor `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
