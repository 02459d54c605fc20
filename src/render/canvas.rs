//! Software canvas
//!
//! An RGBA pixel buffer with the handful of primitives the renderers need:
//! solid fills, a vertical gradient, ellipses, rings, polygons and sprite
//! blits with nearest-neighbor scaling and horizontal mirroring. All
//! drawing alpha-blends over the existing pixels.

use image::{Rgba, RgbaImage};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a 0xAARRGGBB literal
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale the color channels toward black, keeping alpha
    pub fn dimmed(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }
}

/// RGBA drawing target backed by an [`image::RgbaImage`]
#[derive(Debug, Clone)]
pub struct Canvas {
    buf: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.buf
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let p = self.buf.get_pixel(x, y).0;
        Color::rgba(p[0], p[1], p[2], p[3])
    }

    /// Replace every pixel with an opaque color
    pub fn clear(&mut self, color: Color) {
        let px = color.with_alpha(0xFF).to_rgba();
        for p in self.buf.pixels_mut() {
            *p = px;
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.a == 0
            || x < 0
            || y < 0
            || x >= self.buf.width() as i32
            || y >= self.buf.height() as i32
        {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if color.a == 0xFF {
            self.buf.put_pixel(x, y, color.to_rgba());
            return;
        }
        let dst = self.buf.get_pixel_mut(x, y);
        let a = color.a as u32;
        let inv = 255 - a;
        dst.0 = [
            ((color.r as u32 * a + dst.0[0] as u32 * inv) / 255) as u8,
            ((color.g as u32 * a + dst.0[1] as u32 * inv) / 255) as u8,
            ((color.b as u32 * a + dst.0[2] as u32 * inv) / 255) as u8,
            dst.0[3].max(color.a),
        ];
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.floor() as i32;
        let y0 = rect.y.floor() as i32;
        let x1 = (rect.x + rect.w).ceil() as i32;
        let y1 = (rect.y + rect.h).ceil() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Vertical linear gradient across the given band
    pub fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let y0 = rect.y.floor() as i32;
        let y1 = (rect.y + rect.h).ceil() as i32;
        let span = (y1 - y0).max(1) as f32;
        for y in y0..y1 {
            let t = (y - y0) as f32 / span;
            let row = Color {
                r: lerp_u8(top.r, bottom.r, t),
                g: lerp_u8(top.g, bottom.g, t),
                b: lerp_u8(top.b, bottom.b, t),
                a: lerp_u8(top.a, bottom.a, t),
            };
            self.fill_rect(Rect::new(rect.x, y as f32, rect.w, 1.0), row);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.fill_oval(cx, cy, radius, radius, color);
    }

    /// Filled axis-aligned ellipse
    pub fn fill_oval(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let y0 = (cy - ry).floor() as i32;
        let y1 = (cy + ry).ceil() as i32;
        for y in y0..=y1 {
            let dy = (y as f32 + 0.5 - cy) / ry;
            let inside = 1.0 - dy * dy;
            if inside <= 0.0 {
                continue;
            }
            let half = rx * inside.sqrt();
            let x0 = (cx - half).floor() as i32;
            let x1 = (cx + half).ceil() as i32;
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Circle outline of the given stroke width
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, stroke: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let outer = radius + stroke / 2.0;
        let inner = (radius - stroke / 2.0).max(0.0);
        let y0 = (cy - outer).floor() as i32;
        let y1 = (cy + outer).ceil() as i32;
        for y in y0..=y1 {
            for x in (cx - outer).floor() as i32..=(cx + outer).ceil() as i32 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d >= inner && d <= outer {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Filled polygon, even-odd rule, scanline rasterized
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let y0 = min_y.floor() as i32;
        let y1 = max_y.ceil() as i32;
        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let scan = y as f32 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (x0p, y0p) = points[i];
                let (x1p, y1p) = points[(i + 1) % points.len()];
                if (y0p <= scan && y1p > scan) || (y1p <= scan && y0p > scan) {
                    let t = (scan - y0p) / (y1p - y0p);
                    crossings.push(x0p + t * (x1p - x0p));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                for x in pair[0].round() as i32..pair[1].round() as i32 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Blit a region of a sprite sheet into a destination rectangle with
    /// nearest-neighbor scaling. `flip_x` mirrors horizontally (pet facing
    /// left). Fully transparent source pixels are skipped; `alpha` scales
    /// the whole blit.
    pub fn draw_sprite(
        &mut self,
        sheet: &RgbaImage,
        src: Rect,
        dst: Rect,
        flip_x: bool,
        alpha: f32,
    ) {
        if dst.w <= 0.0 || dst.h <= 0.0 || src.w <= 0.0 || src.h <= 0.0 {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let dx0 = dst.x.floor() as i32;
        let dy0 = dst.y.floor() as i32;
        let dx1 = (dst.x + dst.w).ceil() as i32;
        let dy1 = (dst.y + dst.h).ceil() as i32;
        for y in dy0..dy1 {
            let v = (y as f32 + 0.5 - dst.y) / dst.h;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            let sy = (src.y + v * src.h) as u32;
            if sy >= sheet.height() {
                continue;
            }
            for x in dx0..dx1 {
                let mut u = (x as f32 + 0.5 - dst.x) / dst.w;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                if flip_x {
                    u = 1.0 - u;
                }
                let sx = (src.x + u * src.w) as u32;
                if sx >= sheet.width() {
                    continue;
                }
                let p = sheet.get_pixel(sx, sy).0;
                if p[3] == 0 {
                    continue;
                }
                let a = (p[3] as f32 * alpha) as u8;
                self.blend_pixel(x, y, Color::rgba(p[0], p[1], p[2], a));
            }
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}
