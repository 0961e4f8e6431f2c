//! Collision detection
//!
//! Plain axis-aligned rectangles in screen space (y grows downward). Trees use
//! full box overlap; gates additionally require the skier's centre line to pass
//! between the poles, so grazing a gate edge doesn't count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Checkpoint, Obstacle, Player};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap; touching edges don't count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether the vertical spans overlap (strictly)
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// Tree vs skier: any box overlap
pub fn obstacle_hit(player: &Player, obstacle: &Obstacle) -> bool {
    player.hitbox().intersects(&obstacle.rect())
}

/// Gate vs skier: centre x strictly between the poles and vertical overlap
pub fn checkpoint_hit(player: &Player, checkpoint: &Checkpoint) -> bool {
    let gate = checkpoint.rect();
    let center_x = player.pos.x;
    center_x > gate.left() && center_x < gate.right() && player.hitbox().overlaps_vertically(&gate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::default();
        player.pos = Vec2::new(x, y);
        player
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_obstacle_graze_counts() {
        // Skier box spans x 91..109; tree spans 105..135
        let player = player_at(100.0, 200.0);
        let tree = Obstacle::new(105.0, 190.0);
        assert!(obstacle_hit(&player, &tree));
    }

    #[test]
    fn test_checkpoint_graze_does_not_count() {
        // Box overlaps the gate but the centre line is outside it
        let player = player_at(100.0, 200.0);
        let gate = Checkpoint::new(105.0, 190.0);
        assert!(player.hitbox().intersects(&gate.rect()));
        assert!(!checkpoint_hit(&player, &gate));
    }

    #[test]
    fn test_checkpoint_center_pass() {
        let player = player_at(150.0, 200.0);
        let gate = Checkpoint::new(105.0, 190.0);
        assert!(checkpoint_hit(&player, &gate));
    }

    #[test]
    fn test_checkpoint_needs_vertical_overlap() {
        let player = player_at(150.0, 200.0);
        let gate = Checkpoint::new(105.0, 100.0);
        assert!(!checkpoint_hit(&player, &gate));
    }
}
