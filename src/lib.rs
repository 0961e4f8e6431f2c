//! Slope Run - the ski mini-game on the resort site
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, scoring, particles)
//! - `renderer`: Surface abstraction, scene painter and Canvas 2D backend
//! - `settings`: Player presentation preferences
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use sim::{GameEvent, GamePhase, GameSimulation, GameState};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Longest frame delta the host may feed into the simulation (ms).
    /// Tab backgrounding or debugger stalls would otherwise teleport the world.
    pub const MAX_FRAME_DT_MS: f32 = 60.0;
    /// Nominal frame delta used for the very first frame (ms)
    pub const NOMINAL_FRAME_DT_MS: f32 = 1000.0 / 60.0;

    /// Speed ramp
    pub const BASE_SPEED: f32 = 2.2;
    pub const MAX_SPEED: f32 = 8.0;
    pub const ACCEL_PER_MS: f32 = 0.00035;

    /// World units covered per (speed * ms)
    pub const SCROLL_FACTOR: f32 = 0.06;
    /// Score earned per (speed * ms)
    pub const SCORE_FACTOR: f32 = 0.012;
    /// Exponential smoothing factor for steering toward the pointer
    pub const STEER_SMOOTHING: f32 = 0.12;

    /// Course length
    pub const FINISH_DISTANCE: f32 = 2000.0;

    /// Spawn cadence: cooldown = max(MIN, BASE - speed * FACTOR)
    pub const SPAWN_INTERVAL_BASE: f32 = 520.0;
    pub const SPAWN_SPEED_FACTOR: f32 = 30.0;
    pub const MIN_SPAWN_INTERVAL: f32 = 240.0;
    pub const CHECKPOINT_CHANCE: f32 = 0.33;
    pub const SNOW_CHANCE: f32 = 0.25;

    /// Lives and hit handling
    pub const MAX_LIVES: u8 = 3;
    pub const HIT_COOLDOWN_MS: f64 = 900.0;
    pub const HURT_FLASH_MS: f32 = 220.0;

    /// Score bonuses
    pub const CHECKPOINT_BONUS: f32 = 70.0;
    pub const FINISH_BONUS: f32 = 500.0;

    /// Player skier
    pub const PLAYER_WIDTH: f32 = 18.0;
    pub const PLAYER_HEIGHT: f32 = 26.0;
    /// Player top edge as a fraction of viewport height
    pub const PLAYER_Y_FRACTION: f32 = 0.78;

    /// Trees
    pub const OBSTACLE_SIZE: f32 = 30.0;
    /// Culling margin below the viewport
    pub const OBSTACLE_CULL_MARGIN: f32 = 50.0;

    /// Gates
    pub const CHECKPOINT_WIDTH: f32 = 90.0;
    pub const CHECKPOINT_HEIGHT: f32 = 40.0;
    pub const CHECKPOINT_CULL_MARGIN: f32 = 70.0;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 0.12;
    pub const MAX_PARTICLES: usize = 512;
}

/// Clamp a raw frame delta (ms) into the range the simulation accepts.
///
/// Negative deltas (clock skew between frames) collapse to zero.
#[inline]
pub fn clamp_frame_dt(raw_dt_ms: f64) -> f32 {
    if !raw_dt_ms.is_finite() {
        return 0.0;
    }
    (raw_dt_ms as f32).clamp(0.0, consts::MAX_FRAME_DT_MS)
}

/// Score as shown to the player: never negative, whole points only
#[inline]
pub fn display_score(score: f32) -> u32 {
    score.floor().max(0.0) as u32
}
