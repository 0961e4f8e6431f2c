//! Per-frame simulation tick
//!
//! Advances a running session by one host frame: spawn, speed ramp, scoring,
//! steering, world scroll, collision resolution, particle aging, finish check.

use glam::Vec2;
use rand::Rng;

use super::collision::{checkpoint_hit, obstacle_hit};
use super::spawn::{explosion, spawn, sparks};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::display_score;
use crate::tuning::Tuning;

/// Timing for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Frame delta in ms, already clamped by the host
    pub dt: f32,
    /// Monotonic host timestamp in ms (drives the hit cooldown)
    pub now: f64,
}

impl TickInput {
    pub fn new(dt: f32, now: f64) -> Self {
        Self { dt, now }
    }
}

/// Message shown when a run ends without a more specific reason
pub fn default_stop_message(score: f32) -> String {
    format!("Game over! Final score: {}", display_score(score))
}

/// Message shown on crossing the finish line
pub fn finish_message(score: f32) -> String {
    format!("Finish! Final score: {}", display_score(score))
}

/// Leave `Running` for `phase` and record the status line
pub(crate) fn end_run(state: &mut GameState, phase: GamePhase, message: String) {
    log::info!(
        "Run ended ({:?}): score {}, distance {:.0}",
        phase,
        display_score(state.score),
        state.distance
    );
    state.phase = phase;
    state.status = Some(message);
    // The timer only decays while ticking
    state.hurt_timer_ms = 0.0;
}

/// Advance the game state by one frame. No-op unless `Running`.
pub fn tick<R: Rng>(state: &mut GameState, tuning: &Tuning, rng: &mut R, input: &TickInput) {
    if state.phase != GamePhase::Running {
        return;
    }

    let dt = input.dt;
    let w = state.viewport.width;
    let h = state.viewport.height;

    spawn(state, tuning, rng, dt);

    // Speed ramps with simulated time, not frame count
    state.elapsed_ms += dt;
    state.speed = tuning.speed_at(state.elapsed_ms);

    state.distance += state.speed * dt * SCROLL_FACTOR;
    state.score += state.speed * dt * SCORE_FACTOR;

    state.hurt_timer_ms = (state.hurt_timer_ms - dt).max(0.0);

    state.player.steer_toward(state.pointer_x, w);

    let dy = state.speed * dt * SCROLL_FACTOR;

    // --- Trees ---
    let player = state.player.clone();
    let mut hits: Vec<Vec2> = Vec::new();
    state.obstacles.retain_mut(|o| {
        o.pos.y += dy;
        if obstacle_hit(&player, o) {
            hits.push(o.center());
            return false;
        }
        o.pos.y < h + OBSTACLE_CULL_MARGIN
    });

    for at in hits {
        resolve_obstacle_hit(state, tuning, rng, at, input.now);
    }
    if state.phase != GamePhase::Running {
        return;
    }

    // --- Gates ---
    let mut collected: Vec<Vec2> = Vec::new();
    for c in state.checkpoints.iter_mut() {
        c.pos.y += dy;
        if !c.collected && checkpoint_hit(&state.player, c) {
            c.collected = true;
            collected.push(c.center());
        }
    }
    state
        .checkpoints
        .retain(|c| c.pos.y < h + CHECKPOINT_CULL_MARGIN);

    for at in collected {
        state.score += tuning.checkpoint_bonus;
        let burst = sparks(rng, at);
        state.push_particles(burst, tuning.max_particles);
        state.events.push(GameEvent::GateCollected {
            bonus: tuning.checkpoint_bonus,
        });
    }

    // --- Particles ---
    for particle in state.particles.iter_mut() {
        particle.step();
    }
    state.particles.retain(|p| p.is_alive());

    // --- Finish line ---
    if state.distance >= tuning.finish_distance {
        state.score += tuning.finish_bonus;
        state.events.push(GameEvent::Finished { score: state.score });
        let message = finish_message(state.score);
        end_run(state, GamePhase::Finished, message);
    }
}

/// Debris always; a life only once the cooldown has run out
fn resolve_obstacle_hit<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    at: Vec2,
    now: f64,
) {
    let burst = explosion(rng, at);
    state.push_particles(burst, tuning.max_particles);

    if state.phase != GamePhase::Running {
        return;
    }

    let cooled_down = state
        .last_hit_at
        .is_none_or(|last| now - last >= tuning.hit_cooldown_ms);
    if !cooled_down {
        state.events.push(GameEvent::ObstacleHit {
            life_lost: false,
            lives: state.lives,
        });
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.last_hit_at = Some(now);
    state.hurt_timer_ms = tuning.hurt_flash_ms;
    log::debug!("Tree hit at {:.1}ms, {} lives left", now, state.lives);
    state.events.push(GameEvent::ObstacleHit {
        life_lost: true,
        lives: state.lives,
    });

    if state.lives == 0 {
        state.events.push(GameEvent::GameOver { score: state.score });
        let message = default_stop_message(state.score);
        end_run(state, GamePhase::GameOver, message);
    }
}
