//! Canvas double that records draw calls instead of rasterising them.

use crate::graphics::{Canvas, Rgba};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Background { width: f64, height: f64 },
    GlobalAlpha(f64),
    Rect { x: f64, y: f64, width: f64, height: f64, color: Rgba },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64, color: Rgba },
    Line { x0: f64, y0: f64, x1: f64, y1: f64 },
    Block { x: f64, y: f64, size: f64 },
}

pub struct RecordingCanvas {
    pub size: (f64, f64),
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingCanvas {
            size: (width, height),
            calls: Vec::new(),
        }
    }

    pub fn blocks(&self) -> Vec<(f64, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                DrawCall::Block { x, y, size } => Some((x, y, size)),
                _ => None,
            })
            .collect()
    }

    pub fn ellipses(&self) -> Vec<(f64, f64, f64, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                DrawCall::Ellipse { cx, cy, rx, ry, .. } => Some((cx, cy, rx, ry)),
                _ => None,
            })
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Line { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn measure_current_size(&self) -> (f64, f64) {
        self.size
    }

    fn clear_and_fill_background(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Background { width, height });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.calls.push(DrawCall::GlobalAlpha(alpha));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgba) {
        self.calls.push(DrawCall::Ellipse { cx, cy, rx, ry, color });
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, _color: Rgba) {
        self.calls.push(DrawCall::Line { x0, y0, x1, y1 });
    }

    fn draw_unit_block(&mut self, x: f64, y: f64, size: f64) {
        self.calls.push(DrawCall::Block { x, y, size });
    }
}
