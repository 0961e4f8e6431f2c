//! Session owner
//!
//! `GameSimulation` bundles the state, the tuning and the RNG for one canvas,
//! and is the only thing the host talks to. The host writes the pointer target
//! and drives `advance` + `render` once per animation frame; nothing else
//! mutates the state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameEvent, GamePhase, GameState, Viewport};
use super::tick::{TickInput, default_stop_message, end_run, tick};
use crate::display_score;
use crate::renderer::{SceneOptions, Surface, draw_scene};
use crate::tuning::Tuning;

/// One mini-game instance
#[derive(Debug, Clone)]
pub struct GameSimulation<R = Pcg32> {
    state: GameState,
    tuning: Tuning,
    /// Replacement tuning waiting for the next `start`
    pending_tuning: Option<Tuning>,
    rng: R,
    /// None until the host attaches a drawable surface
    viewport: Option<Viewport>,
    scene: SceneOptions,
}

impl GameSimulation<Pcg32> {
    /// Seeded simulation without a surface yet
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSimulation<R> {
    /// Simulation drawing its randomness from `rng`
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        let state = GameState::new(Viewport::new(0.0, 0.0), &tuning);
        Self {
            state,
            tuning,
            pending_tuning: None,
            rng,
            viewport: None,
            scene: SceneOptions::default(),
        }
    }

    /// Attach (or re-measure) the drawing surface.
    ///
    /// Re-centres the skier; the on-screen clamp holds as soon as this returns,
    /// including mid-run.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_usable() {
            log::warn!("Ignoring unusable viewport {}x{}", width, height);
            return;
        }
        self.viewport = Some(viewport);
        self.state.viewport = viewport;
        self.state.reset_player();
    }

    /// Forget the surface; later `start` calls do nothing
    pub fn detach_surface(&mut self) {
        self.viewport = None;
    }

    pub fn has_surface(&self) -> bool {
        self.viewport.is_some()
    }

    /// Latest horizontal input target in viewport coordinates
    pub fn set_pointer_x(&mut self, x: f32) {
        if x.is_finite() {
            self.state.pointer_x = x;
        }
    }

    /// Begin a fresh run. Returns false (and stays put) without a surface.
    pub fn start(&mut self) -> bool {
        let Some(viewport) = self.viewport else {
            log::warn!("No game surface attached, start ignored");
            return false;
        };
        if let Some(tuning) = self.pending_tuning.take() {
            self.tuning = tuning;
        }
        self.state.viewport = viewport;
        self.state.reset(&self.tuning);
        self.state.phase = GamePhase::Running;
        log::info!(
            "Run started on {}x{} viewport",
            viewport.width,
            viewport.height
        );
        true
    }

    /// Halt a running session, recording `reason` or the default final-score line.
    ///
    /// Returns false when nothing was running.
    pub fn stop(&mut self, reason: Option<&str>) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        let message = match reason {
            Some(reason) => reason.to_string(),
            None => default_stop_message(self.state.score),
        };
        end_run(&mut self.state, GamePhase::Idle, message);
        true
    }

    /// Advance one frame. `dt` must already be clamped by the host.
    pub fn advance(&mut self, dt: f32, now: f64) {
        let input = TickInput::new(dt, now);
        tick(&mut self.state, &self.tuning, &mut self.rng, &input);
    }

    /// Draw the current frame
    pub fn render<S: Surface>(&self, surface: &mut S) {
        draw_scene(&self.state, &self.tuning, &self.scene, surface);
    }

    pub fn set_scene_options(&mut self, scene: SceneOptions) {
        self.scene = scene;
    }

    /// Swap balance parameters; takes effect on the next `start`
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.pending_tuning = Some(tuning);
    }

    /// Tuning of the current (or last) run
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Unchecked state access for tests that script the world.
    /// Callers are responsible for the player clamp and entity lists.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn score(&self) -> f32 {
        self.state.score
    }

    /// Score as the HUD shows it
    pub fn display_score(&self) -> u32 {
        display_score(self.state.score)
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    pub fn distance(&self) -> f32 {
        self.state.distance
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    /// Terminal status line from the last stop, if any
    pub fn status_message(&self) -> Option<&str> {
        self.state.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_SPEED;

    #[test]
    fn test_start_without_surface_is_noop() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        assert!(!sim.start());
        assert_eq!(sim.phase(), GamePhase::Idle);
        sim.advance(16.0, 16.0);
        assert_eq!(sim.distance(), 0.0);
    }

    #[test]
    fn test_unusable_resize_keeps_idle() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(0.0, 200.0);
        assert!(!sim.has_surface());
        assert!(!sim.start());
    }

    #[test]
    fn test_detached_surface_blocks_start() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        sim.detach_surface();
        assert!(!sim.start());
        assert_eq!(sim.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_start_resets_session() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        assert!(sim.start());
        for i in 0..50 {
            sim.advance(16.0, i as f64 * 16.0);
        }
        assert!(sim.distance() > 0.0);

        assert!(sim.stop(None));
        assert!(sim.start());
        assert_eq!(sim.distance(), 0.0);
        assert_eq!(sim.score(), 0.0);
        assert_eq!(sim.speed(), sim.tuning().base_speed);
        assert_eq!(sim.lives(), sim.tuning().max_lives);
        assert!(sim.state().obstacles.is_empty());
        assert!(sim.status_message().is_none());
        assert_eq!(sim.state().player.pos.x, 200.0);
    }

    #[test]
    fn test_stop_messages() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        assert!(!sim.stop(None));

        sim.start();
        sim.state_mut().score = 41.7;
        assert!(sim.stop(None));
        assert_eq!(sim.phase(), GamePhase::Idle);
        assert_eq!(sim.status_message(), Some("Game over! Final score: 41"));

        sim.start();
        assert!(sim.stop(Some("Closed")));
        assert_eq!(sim.status_message(), Some("Closed"));
    }

    #[test]
    fn test_stopped_run_does_not_advance() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        sim.start();
        sim.advance(16.0, 16.0);
        sim.stop(None);
        let distance = sim.distance();
        sim.advance(16.0, 32.0);
        assert_eq!(sim.distance(), distance);
    }

    #[test]
    fn test_resize_mid_run_reclamps_player() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(800.0, 600.0);
        sim.start();
        sim.set_pointer_x(790.0);
        for i in 0..60 {
            sim.advance(16.0, i as f64 * 16.0);
        }
        sim.resize(200.0, 300.0);
        let player = &sim.state().player;
        assert!(player.pos.x >= player.width / 2.0);
        assert!(player.pos.x <= 200.0 - player.width / 2.0);
        assert!(sim.is_running());
    }

    #[test]
    fn test_tuning_swap_waits_for_next_start() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        sim.start();
        for i in 0..100 {
            sim.advance(16.7, i as f64 * 16.7);
        }
        let before = sim.speed();

        sim.set_tuning(Tuning {
            base_speed: 1.0,
            max_lives: 1,
            ..Default::default()
        });
        sim.advance(16.7, 100.0 * 16.7);
        assert!(sim.speed() >= before);
        assert!(sim.lives() <= sim.tuning().max_lives);
        assert_eq!(sim.tuning().base_speed, BASE_SPEED);

        sim.stop(None);
        sim.start();
        assert_eq!(sim.speed(), 1.0);
        assert_eq!(sim.lives(), 1);
    }

    #[test]
    fn test_non_finite_pointer_ignored() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        sim.set_pointer_x(f32::NAN);
        assert_eq!(sim.state().pointer_x, 200.0);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut sim = GameSimulation::new(Tuning::default(), 1);
        sim.resize(400.0, 300.0);
        sim.start();
        sim.state_mut().events.push(GameEvent::GateCollected { bonus: 70.0 });
        assert_eq!(sim.drain_events().len(), 1);
        assert!(sim.drain_events().is_empty());
    }
}
