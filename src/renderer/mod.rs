//! Rendering module
//!
//! The scene is painted through the [`Surface`] trait so the simulation never
//! touches the DOM. The browser build implements it over a Canvas 2D context;
//! tests implement it with a recorder.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::{SceneOptions, draw_scene};

use glam::Vec2;

use crate::sim::Rect;

/// Immediate-mode 2D drawing target, in CSS pixels.
///
/// Colours are CSS colour strings. Everything is redrawn every frame.
pub trait Surface {
    /// Viewport width and height
    fn size(&self) -> (f32, f32);

    /// Global alpha for subsequent draws (0..=1)
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, rect: Rect, color: &str);

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);

    /// Closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2], color: &str);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);

    /// Left-aligned text with its baseline at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2, color: &str);

    /// Top-to-bottom linear gradient over `rect`
    fn fill_vertical_gradient(&mut self, rect: Rect, top: &str, bottom: &str);
}
