//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied, clamped frame deltas only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the entity lists)
//! - No platform dependencies; drawing goes through the `Surface` trait

pub mod collision;
pub mod game;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, checkpoint_hit, obstacle_hit};
pub use game::GameSimulation;
pub use spawn::{SpawnOutcome, explosion, snow, sparks, spawn};
pub use state::{
    Checkpoint, GameEvent, GamePhase, GameState, Obstacle, Particle, ParticleKind, Player,
    Viewport,
};
pub use tick::{TickInput, default_stop_message, finish_message, tick};
