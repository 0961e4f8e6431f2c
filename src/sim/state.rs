//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; it is reset wholesale
//! on every start.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Splash screen, nothing ticking
    #[default]
    Idle,
    /// Active run
    Running,
    /// Reached the finish line
    Finished,
    /// Ran out of lives
    GameOver,
}

impl GamePhase {
    /// Whether this phase ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Finished | GamePhase::GameOver)
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-area viewport can't host a run
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The skier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// `pos.x` is the horizontal centre, `pos.y` the top edge
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }
}

impl Player {
    /// Collision box: centred on `pos.x`, top-anchored at `pos.y`
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x - self.width / 2.0, self.pos.y, self.width, self.height)
    }

    /// Ease toward the target x, then keep the skier fully on screen
    pub fn steer_toward(&mut self, target_x: f32, viewport_width: f32) {
        self.pos.x += (target_x - self.pos.x) * STEER_SMOOTHING;
        self.clamp_to(viewport_width);
    }

    /// Clamp to `[width/2, viewport_width - width/2]`
    ///
    /// A viewport narrower than the skier pins it to the left bound.
    pub fn clamp_to(&mut self, viewport_width: f32) {
        let min_x = self.width / 2.0;
        let max_x = (viewport_width - self.width / 2.0).max(min_x);
        self.pos.x = self.pos.x.clamp(min_x, max_x);
    }

    /// Canonical starting spot: centred, near the bottom of the slope
    pub fn reset(&mut self, viewport: Viewport) {
        self.pos = Vec2::new(viewport.width / 2.0, viewport.height * PLAYER_Y_FRACTION);
        self.clamp_to(viewport.width);
    }
}

/// A tree. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: OBSTACLE_SIZE,
            height: OBSTACLE_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// A slalom gate. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// One-way latch: false -> true once, never back
    pub collected: bool,
}

impl Checkpoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: CHECKPOINT_WIDTH,
            height: CHECKPOINT_HEIGHT,
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

/// What spawned a particle; decides its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Tree hit
    Explosion,
    /// Gate collected
    Spark,
    /// Ambient snow puff
    Snow,
}

impl ParticleKind {
    /// CSS colour for the canvas
    pub fn color(&self) -> &'static str {
        match self {
            ParticleKind::Explosion => "#ff6b6b",
            ParticleKind::Spark => "#00d4ff",
            ParticleKind::Snow => "rgba(255,255,255,0.65)",
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Per-tick velocity
    pub vel: Vec2,
    /// Ticks left to live
    pub life: i32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Move one tick under gravity and age by one tick
    pub fn step(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= 1;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Something the host may want to react to (HUD pop, log line, sound)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player touched a tree; `life_lost` is false while the hit cooldown runs
    ObstacleHit { life_lost: bool, lives: u8 },
    /// A gate was collected for the given bonus
    GateCollected { bonus: f32 },
    /// Finish line reached with the final raw score
    Finished { score: f32 },
    /// Last life lost with the final raw score
    GameOver { score: f32 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Raw score; display through [`crate::display_score`]
    pub score: f32,
    pub distance: f32,
    pub speed: f32,
    pub lives: u8,
    /// Simulated time since start (ms)
    pub elapsed_ms: f32,
    /// Time until the next spawn (ms)
    pub spawn_cooldown: f32,
    /// Host timestamp of the last life loss
    pub last_hit_at: Option<f64>,
    /// Remaining hurt flash (ms)
    pub hurt_timer_ms: f32,
    pub viewport: Viewport,
    pub player: Player,
    /// Latest horizontal input target
    pub pointer_x: f32,
    pub obstacles: Vec<Obstacle>,
    pub checkpoints: Vec<Checkpoint>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Terminal status message set when a run stops
    pub status: Option<String>,
    /// Events queued since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh idle state for the given viewport
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        let mut state = Self {
            phase: GamePhase::Idle,
            score: 0.0,
            distance: 0.0,
            speed: tuning.base_speed,
            lives: tuning.max_lives,
            elapsed_ms: 0.0,
            spawn_cooldown: 0.0,
            last_hit_at: None,
            hurt_timer_ms: 0.0,
            viewport,
            player: Player::default(),
            pointer_x: 0.0,
            obstacles: Vec::new(),
            checkpoints: Vec::new(),
            particles: Vec::new(),
            status: None,
            events: Vec::new(),
        };
        state.reset_player();
        state
    }

    /// Reset every counter and collection for a new run (phase untouched)
    pub fn reset(&mut self, tuning: &Tuning) {
        self.score = 0.0;
        self.distance = 0.0;
        self.speed = tuning.base_speed;
        self.lives = tuning.max_lives;
        self.elapsed_ms = 0.0;
        self.spawn_cooldown = 0.0;
        self.last_hit_at = None;
        self.hurt_timer_ms = 0.0;
        self.obstacles.clear();
        self.checkpoints.clear();
        self.particles.clear();
        self.events.clear();
        self.status = None;
        self.reset_player();
    }

    /// Re-centre the skier and point the input target at it
    pub fn reset_player(&mut self) {
        self.player.reset(self.viewport);
        self.pointer_x = self.player.pos.x;
    }

    /// Queue particles, dropping whatever doesn't fit under the cap
    pub fn push_particles(&mut self, particles: impl IntoIterator<Item = Particle>, cap: usize) {
        let room = cap.saturating_sub(self.particles.len());
        self.particles.extend(particles.into_iter().take(room));
    }

    /// Hurt flash intensity in 0..=1
    pub fn hurt_intensity(&self, tuning: &Tuning) -> f32 {
        if tuning.hurt_flash_ms <= 0.0 {
            return 0.0;
        }
        (self.hurt_timer_ms / tuning.hurt_flash_ms).clamp(0.0, 1.0)
    }
}
