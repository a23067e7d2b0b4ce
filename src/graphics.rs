//! Drawing surface shared by both previews.

use crate::error::{PreviewError, PreviewResult};

/// Largest backing store a surface will allocate
pub const MAX_DEVICE_PIXELS: usize = 1 << 26;

/// Straight (non-premultiplied) colour with alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }
}

pub const BACKGROUND: Rgba = Rgba::opaque(0x0f, 0x12, 0x17);
pub const BLOCK_FILL: Rgba = Rgba::new(255, 122, 24, 0.95);
pub const BLOCK_EDGE: Rgba = Rgba::new(0, 0, 0, 0.35);
pub const BLOCK_HIGHLIGHT: Rgba = Rgba::new(255, 154, 61, 0.18);

/// Smallest block that gets an edge and a highlight band
pub const BLOCK_DETAIL_MIN_SIZE: f64 = 4.0;
const HIGHLIGHT_BAND_RATIO: f64 = 0.32;

/// Operations the previews need from a drawing surface.
///
/// Coordinates are logical; implementations apply their own pixel ratio.
pub trait Canvas {
    /// Live logical size, including any resize applied since the last frame
    fn measure_current_size(&self) -> (f64, f64);

    fn clear_and_fill_background(&mut self, width: f64, height: f64);

    /// Multiplier for the alpha of every following fill
    fn set_global_alpha(&mut self, alpha: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgba);

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba);

    /// Outline of width `line_width` centred on the rectangle's edges
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: Rgba) {
        let half = line_width / 2.0;
        let (ox, oy) = (x - half, y - half);
        let (ow, oh) = (width + line_width, height + line_width);
        let side = (oh - 2.0 * line_width).max(0.0);

        self.fill_rect(ox, oy, ow, line_width, color);
        self.fill_rect(ox, oy + oh - line_width, ow, line_width, color);
        self.fill_rect(ox, oy + line_width, line_width, side, color);
        self.fill_rect(ox + ow - line_width, oy + line_width, line_width, side, color);
    }

    /// One shaded block with its top-left corner at `(x, y)`
    fn draw_unit_block(&mut self, x: f64, y: f64, size: f64) {
        self.fill_rect(x, y, size, size, BLOCK_FILL);

        if size >= BLOCK_DETAIL_MIN_SIZE {
            self.stroke_rect(x + 0.5, y + 0.5, size - 1.0, size - 1.0, 1.0, BLOCK_EDGE);
            let band = (size * HIGHLIGHT_BAND_RATIO).floor().max(1.0);
            self.fill_rect(x, y, size, band, BLOCK_HIGHLIGHT);
        }
    }
}

/// RGB pixel buffer with a logical size and a device pixel ratio.
#[derive(Debug, Clone)]
pub struct Surface {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    device_width: usize,
    device_height: usize,
    pixels: Vec<[f64; 3]>,
    global_alpha: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> PreviewResult<Self> {
        let mut surface = Surface {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            device_width: 0,
            device_height: 0,
            pixels: Vec::new(),
            global_alpha: 1.0,
        };
        surface.resize(width, height, pixel_ratio)?;
        Ok(surface)
    }

    /// Reallocates the backing store. Must only be called between frames.
    ///
    /// Sizes past [`MAX_DEVICE_PIXELS`] are rejected and leave the surface as it was.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> PreviewResult<()> {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let device_width = ((width * ratio).floor() as usize).max(1);
        let device_height = ((height * ratio).floor() as usize).max(1);
        match device_width.checked_mul(device_height) {
            Some(count) if count <= MAX_DEVICE_PIXELS => {}
            _ => {
                return Err(PreviewError::SurfaceTooLarge {
                    width: device_width,
                    height: device_height,
                })
            }
        }

        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.pixel_ratio = ratio;
        if device_width != self.device_width || device_height != self.device_height {
            self.device_width = device_width;
            self.device_height = device_height;
            self.pixels = vec![[0.0; 3]; device_width * device_height];
        }
        Ok(())
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn device_size(&self) -> (usize, usize) {
        (self.device_width, self.device_height)
    }

    /// Device pixel as 8-bit RGB, `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.device_width || y >= self.device_height {
            return None;
        }
        let [r, g, b] = self.pixels[y * self.device_width + x];
        Some([to_u8(r), to_u8(g), to_u8(b)])
    }

    /// Row-major 8-bit RGB copy of the buffer
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b]| [to_u8(r), to_u8(g), to_u8(b)])
            .collect()
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let alpha = (color.a * self.global_alpha).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let src = [color.r, color.g, color.b].map(|c| c as f64 / 255.0);
        let dst = &mut self.pixels[y * self.device_width + x];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s * alpha + *d * (1.0 - alpha);
        }
    }

    /// Device pixel span whose centres fall in `[start, end)` logical units
    fn device_span(&self, start: f64, end: f64, limit: usize) -> std::ops::Range<usize> {
        let lo = (start * self.pixel_ratio - 0.5).ceil().max(0.0);
        let hi = (end * self.pixel_ratio - 0.5).ceil().max(0.0);
        let lo = (lo as usize).min(limit);
        let hi = (hi as usize).min(limit);
        lo..hi.max(lo)
    }
}

fn to_u8(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Canvas for Surface {
    fn measure_current_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear_and_fill_background(&mut self, width: f64, height: f64) {
        let rows = self.device_span(0.0, height, self.device_height);
        let cols = self.device_span(0.0, width, self.device_width);
        let [r, g, b] = [BACKGROUND.r, BACKGROUND.g, BACKGROUND.b].map(|c| c as f64 / 255.0);
        for y in rows {
            for x in cols.clone() {
                self.pixels[y * self.device_width + x] = [r, g, b];
            }
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let rows = self.device_span(y, y + height, self.device_height);
        let cols = self.device_span(x, x + width, self.device_width);
        for py in rows {
            for px in cols.clone() {
                self.blend(px, py, color);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Rgba) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let rows = self.device_span(cy - ry, cy + ry, self.device_height);
        let cols = self.device_span(cx - rx, cx + rx, self.device_width);
        for py in rows {
            let dy = ((py as f64 + 0.5) / self.pixel_ratio - cy) / ry;
            for px in cols.clone() {
                let dx = ((px as f64 + 0.5) / self.pixel_ratio - cx) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Bresenham line between two logical points
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
        let ratio = self.pixel_ratio;
        let (mut x0, mut y0, x1, y1) = (
            (x0 * ratio).floor() as isize,
            (y0 * ratio).floor() as isize,
            (x1 * ratio).floor() as isize,
            (y1 * ratio).floor() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            if x0 >= 0
                && x0 < self.device_width as isize
                && y0 >= 0
                && y0 < self.device_height as isize
            {
                self.blend(x0 as usize, y0 as usize, color);
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
