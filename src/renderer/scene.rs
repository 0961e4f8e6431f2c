//! Scene painter
//!
//! One fixed look: sky gradient with drifting snow, slalom gates, trees,
//! particles, the skier, a small speed/distance readout and a red flash after
//! a lost life.

use glam::Vec2;

use super::Surface;
use crate::sim::{GameState, Rect};
use crate::tuning::Tuning;

const SKY_TOP: &str = "#87ceeb";
const SKY_BOTTOM: &str = "#e0f6ff";
const SNOW_DOT: &str = "rgba(255, 255, 255, 0.22)";
const SNOW_DOT_COUNT: usize = 18;
const GATE_OPEN: &str = "#ff6b6b";
const GATE_COLLECTED: &str = "#00d400";
const GATE_FILL: &str = "rgba(255, 107, 107, 0.10)";
const TREE: &str = "#228b22";
const SKIER: &str = "#ff006e";
const GOGGLES: &str = "white";
const HUD_TEXT: &str = "#1a1a1a";
const HURT_FLASH: &str = "#ff3b3b";
/// Peak alpha of the hurt overlay
const HURT_FLASH_ALPHA: f32 = 0.35;
/// Particle life that maps to full opacity
const PARTICLE_FADE_LIFE: f32 = 22.0;
/// HUD speed readout multiplier (speed units -> km/h)
const KMH_PER_SPEED: f32 = 8.0;

/// Presentation switches derived from player settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub particles: bool,
    pub hurt_flash: bool,
    pub hud_text: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            particles: true,
            hurt_flash: true,
            hud_text: true,
        }
    }
}

/// Paint the full frame
pub fn draw_scene<S: Surface>(
    state: &GameState,
    tuning: &Tuning,
    options: &SceneOptions,
    surface: &mut S,
) {
    let (w, h) = surface.size();

    draw_background(state, surface, w, h);

    for cp in &state.checkpoints {
        let rect = cp.rect();
        let outline = if cp.collected { GATE_COLLECTED } else { GATE_OPEN };
        surface.stroke_rect(rect, outline, 3.0);
        surface.fill_rect(rect, GATE_FILL);
    }

    for o in &state.obstacles {
        let r = o.rect();
        let tree = [
            Vec2::new(r.x + r.width / 2.0, r.y),
            Vec2::new(r.x, r.bottom()),
            Vec2::new(r.right(), r.bottom()),
        ];
        surface.fill_polygon(&tree, TREE);
    }

    if options.particles {
        for p in &state.particles {
            surface.set_alpha((p.life as f32 / PARTICLE_FADE_LIFE).clamp(0.0, 1.0));
            surface.fill_rect(Rect::new(p.pos.x - 2.0, p.pos.y - 2.0, 4.0, 4.0), p.kind.color());
        }
        surface.set_alpha(1.0);
    }

    let player = &state.player;
    surface.fill_rect(player.hitbox(), SKIER);
    surface.fill_rect(
        Rect::new(player.pos.x - 6.0, player.pos.y + 6.0, 4.0, 4.0),
        GOGGLES,
    );
    surface.fill_rect(
        Rect::new(player.pos.x + 2.0, player.pos.y + 6.0, 4.0, 4.0),
        GOGGLES,
    );

    if options.hud_text {
        let kmh = (state.speed * KMH_PER_SPEED).round();
        surface.fill_text(&format!("Speed: {} km/h", kmh), Vec2::new(10.0, 20.0), HUD_TEXT);
        surface.fill_text(
            &format!("Distance: {} m", state.distance.round()),
            Vec2::new(10.0, 36.0),
            HUD_TEXT,
        );
        surface.fill_text(&format!("Lives: {}", state.lives), Vec2::new(10.0, 52.0), HUD_TEXT);
    }

    if options.hurt_flash {
        let intensity = state.hurt_intensity(tuning);
        if intensity > 0.0 {
            surface.set_alpha(intensity * HURT_FLASH_ALPHA);
            surface.fill_rect(Rect::new(0.0, 0.0, w, h), HURT_FLASH);
            surface.set_alpha(1.0);
        }
    }
}

/// Sky plus snow dots that drift with distance travelled
fn draw_background<S: Surface>(state: &GameState, surface: &mut S, w: f32, h: f32) {
    surface.fill_vertical_gradient(Rect::new(0.0, 0.0, w, h), SKY_TOP, SKY_BOTTOM);

    if w <= 0.0 || h <= 0.0 {
        return;
    }
    for i in 0..SNOW_DOT_COUNT {
        let fi = i as f32;
        let sx = (((fi + 1.0) * 12.9898 + state.distance * 0.01).sin() * w + w) % w;
        let sy = (fi * h / SNOW_DOT_COUNT as f32 + state.distance * 0.18) % h;
        surface.fill_circle(Vec2::new(sx, sy), 2.0, SNOW_DOT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Checkpoint, Obstacle, Particle, ParticleKind, Viewport};

    /// Records draw calls instead of painting
    #[derive(Default)]
    struct Recorder {
        alpha: f32,
        rects: Vec<(Rect, String, f32)>,
        strokes: Vec<(Rect, String)>,
        polygons: usize,
        circles: usize,
        texts: Vec<String>,
        gradients: usize,
    }

    impl Surface for Recorder {
        fn size(&self) -> (f32, f32) {
            (400.0, 300.0)
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.alpha = alpha;
        }
        fn fill_rect(&mut self, rect: Rect, color: &str) {
            self.rects.push((rect, color.to_string(), self.alpha));
        }
        fn stroke_rect(&mut self, rect: Rect, color: &str, _line_width: f32) {
            self.strokes.push((rect, color.to_string()));
        }
        fn fill_polygon(&mut self, points: &[Vec2], _color: &str) {
            assert_eq!(points.len(), 3);
            self.polygons += 1;
        }
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: &str) {
            self.circles += 1;
        }
        fn fill_text(&mut self, text: &str, _pos: Vec2, _color: &str) {
            self.texts.push(text.to_string());
        }
        fn fill_vertical_gradient(&mut self, _rect: Rect, _top: &str, _bottom: &str) {
            self.gradients += 1;
        }
    }

    fn sample_state(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(Viewport::new(400.0, 300.0), tuning);
        state.obstacles.push(Obstacle::new(10.0, 10.0));
        state.obstacles.push(Obstacle::new(100.0, 40.0));
        let mut gate = Checkpoint::new(50.0, 60.0);
        gate.collected = true;
        state.checkpoints.push(gate);
        state.particles.push(Particle {
            pos: Vec2::new(5.0, 5.0),
            vel: Vec2::ZERO,
            life: 11,
            kind: ParticleKind::Spark,
        });
        state.speed = 2.5;
        state.distance = 123.4;
        state
    }

    #[test]
    fn test_draws_every_entity() {
        let tuning = Tuning::default();
        let state = sample_state(&tuning);
        let mut surface = Recorder::default();
        draw_scene(&state, &tuning, &SceneOptions::default(), &mut surface);

        assert_eq!(surface.gradients, 1);
        assert_eq!(surface.circles, SNOW_DOT_COUNT);
        assert_eq!(surface.polygons, 2);
        assert_eq!(surface.strokes.len(), 1);
        assert_eq!(surface.strokes[0].1, GATE_COLLECTED);
        assert!(surface.rects.iter().any(|(_, c, _)| c == SKIER));
        assert!(
            surface
                .rects
                .iter()
                .any(|(_, c, a)| c == "#00d4ff" && (*a - 0.5).abs() < 1e-6)
        );
        assert_eq!(
            surface.texts,
            vec!["Speed: 20 km/h", "Distance: 123 m", "Lives: 3"]
        );
        assert_eq!(surface.alpha, 1.0);
    }

    #[test]
    fn test_hurt_flash_overlay() {
        let tuning = Tuning::default();
        let mut state = sample_state(&tuning);
        state.hurt_timer_ms = tuning.hurt_flash_ms;
        let mut surface = Recorder::default();
        draw_scene(&state, &tuning, &SceneOptions::default(), &mut surface);
        let overlay = surface.rects.iter().find(|(_, c, _)| c == HURT_FLASH);
        assert!(matches!(overlay, Some((_, _, a)) if (*a - HURT_FLASH_ALPHA).abs() < 1e-6));
    }

    #[test]
    fn test_options_suppress_effects() {
        let tuning = Tuning::default();
        let mut state = sample_state(&tuning);
        state.hurt_timer_ms = tuning.hurt_flash_ms;
        let options = SceneOptions {
            particles: false,
            hurt_flash: false,
            hud_text: false,
        };
        let mut surface = Recorder::default();
        draw_scene(&state, &tuning, &options, &mut surface);
        assert!(surface.rects.iter().all(|(_, c, _)| c != HURT_FLASH && c != "#00d4ff"));
        assert!(surface.texts.is_empty());
    }
}
