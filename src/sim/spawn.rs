//! Spawning of trees, gates and particle bursts
//!
//! All randomness comes from the caller's RNG so a seeded run replays exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Checkpoint, GameState, Obstacle, Particle, ParticleKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// What a single spawn call produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnOutcome {
    pub obstacle: bool,
    pub checkpoint: bool,
    pub snow: bool,
}

/// Count down the spawn cooldown and spawn a wave when it runs out.
///
/// Exactly one tree per expiry; a gate and a snow puff are coin flips.
pub fn spawn<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    dt: f32,
) -> SpawnOutcome {
    state.spawn_cooldown -= dt;
    if state.spawn_cooldown > 0.0 {
        return SpawnOutcome::default();
    }

    let w = state.viewport.width;
    let h = state.viewport.height;

    state.spawn_cooldown = tuning.spawn_interval(state.speed);

    let ox = rng.random::<f32>() * (w - 40.0) + 20.0;
    state.obstacles.push(Obstacle::new(ox, -OBSTACLE_SIZE));
    let mut outcome = SpawnOutcome {
        obstacle: true,
        ..Default::default()
    };

    if rng.random::<f32>() < CHECKPOINT_CHANCE {
        let cx = rng.random::<f32>() * (w - 120.0) + 60.0;
        state.checkpoints.push(Checkpoint::new(cx, -CHECKPOINT_HEIGHT));
        outcome.checkpoint = true;
    }

    if rng.random::<f32>() < SNOW_CHANCE {
        let burst = snow(rng, Vec2::new(w / 2.0, h * 0.3));
        state.push_particles(burst, tuning.max_particles);
        outcome.snow = true;
    }

    outcome
}

/// Red debris when a tree is hit
pub fn explosion<R: Rng>(rng: &mut R, at: Vec2) -> Vec<Particle> {
    (0..10)
        .map(|_| Particle {
            pos: at,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.5,
                (rng.random::<f32>() - 0.8) * 4.2,
            ),
            life: 22,
            kind: ParticleKind::Explosion,
        })
        .collect()
}

/// Cyan sparks when a gate is collected
pub fn sparks<R: Rng>(rng: &mut R, at: Vec2) -> Vec<Particle> {
    (0..14)
        .map(|_| Particle {
            pos: at,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 6.2,
                (rng.random::<f32>() - 0.8) * 5.4,
            ),
            life: 18,
            kind: ParticleKind::Spark,
        })
        .collect()
}

/// Loose ambient puff scattered around `at`
pub fn snow<R: Rng>(rng: &mut R, at: Vec2) -> Vec<Particle> {
    (0..8)
        .map(|_| {
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * 80.0,
                (rng.random::<f32>() - 0.5) * 60.0,
            );
            Particle {
                pos: at + jitter,
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 0.8,
                    (rng.random::<f32>() - 0.2) * 1.2,
                ),
                life: 26,
                kind: ParticleKind::Snow,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh_state() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(Viewport::new(480.0, 320.0), &tuning), tuning)
    }

    #[test]
    fn test_first_call_spawns_immediately() {
        let (mut state, tuning) = fresh_state();
        let mut rng = Pcg32::seed_from_u64(7);
        let outcome = spawn(&mut state, &tuning, &mut rng, 16.0);
        assert!(outcome.obstacle);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_cooldown, tuning.spawn_interval(state.speed));
    }

    #[test]
    fn test_no_spawn_while_cooling_down() {
        let (mut state, tuning) = fresh_state();
        let mut rng = Pcg32::seed_from_u64(7);
        state.spawn_cooldown = 100.0;
        let outcome = spawn(&mut state, &tuning, &mut rng, 16.0);
        assert_eq!(outcome, SpawnOutcome::default());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_cooldown, 84.0);
    }

    #[test]
    fn test_spawn_positions_within_lanes() {
        let (mut state, tuning) = fresh_state();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            state.spawn_cooldown = 0.0;
            spawn(&mut state, &tuning, &mut rng, 0.0);
        }
        assert_eq!(state.obstacles.len(), 200);
        for o in &state.obstacles {
            assert!(o.pos.x >= 20.0 && o.pos.x <= 460.0);
            assert_eq!(o.pos.y, -OBSTACLE_SIZE);
        }
        for c in &state.checkpoints {
            assert!(c.pos.x >= 60.0 && c.pos.x <= 420.0);
            assert!(!c.collected);
        }
        // Roughly a third of spawns bring a gate
        assert!(state.checkpoints.len() > 30 && state.checkpoints.len() < 110);
    }

    #[test]
    fn test_burst_sizes() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(explosion(&mut rng, Vec2::ZERO).len(), 10);
        assert_eq!(sparks(&mut rng, Vec2::ZERO).len(), 14);
        let puff = snow(&mut rng, Vec2::new(100.0, 100.0));
        assert_eq!(puff.len(), 8);
        for p in &puff {
            assert!((p.pos.x - 100.0).abs() <= 40.0);
            assert!((p.pos.y - 100.0).abs() <= 30.0);
        }
    }
}
