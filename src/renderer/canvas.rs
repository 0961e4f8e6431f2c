//! Canvas 2D backend
//!
//! The host sets the device-pixel-ratio transform on the context, so all
//! coordinates here are CSS pixels.

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::Surface;
use crate::sim::Rect;

const HUD_FONT: &str = "12px sans-serif";

/// [`Surface`] over a `CanvasRenderingContext2d`
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f32, height: f32) -> Self {
        Self { ctx, width, height }
    }

    /// Track the canvas' CSS size after a resize
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Apply the DPR scale so drawing happens in CSS pixels
    pub fn set_pixel_ratio(&self, dpr: f64) {
        if let Err(e) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("Failed to set canvas transform: {:?}", e);
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(HUD_FONT);
        self.ctx.set_text_align("left");
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: &str, bottom: &str) {
        let gradient = self.ctx.create_linear_gradient(
            0.0,
            rect.y as f64,
            0.0,
            rect.bottom() as f64,
        );
        if gradient.add_color_stop(0.0, top).is_err()
            || gradient.add_color_stop(1.0, bottom).is_err()
        {
            // Unparseable colour: fall back to a flat fill
            self.fill_rect(rect, bottom);
            return;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }
}
