//! Nest (the pet's home basket)

use crate::pet::daynight;
use crate::render::canvas::{Canvas, Color};

/// Default nest position in world coordinates
pub const DEFAULT_NEST_X: f32 = 0.85;
pub const DEFAULT_NEST_Y: f32 = 0.85;

/// Draws the basket the pet sleeps in. The position is world-normalized
/// and survives screen size changes.
#[derive(Debug)]
pub struct NestRenderer {
    nest_x: f32,
    nest_y: f32,
}

impl NestRenderer {
    pub fn new() -> Self {
        Self {
            nest_x: DEFAULT_NEST_X,
            nest_y: DEFAULT_NEST_Y,
        }
    }

    pub fn nest_x(&self) -> f32 {
        self.nest_x
    }

    pub fn nest_y(&self) -> f32 {
        self.nest_y
    }

    /// Clamped into the band the pet can actually walk to, so a bedtime
    /// trip always ends within the sleep radius.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.nest_x = x.clamp(0.1, 0.9);
        self.nest_y = y.clamp(0.5, 0.9);
    }

    pub fn draw(
        &self,
        canvas: &mut Canvas,
        screen_x: f32,
        screen_y: f32,
        screen_width: u32,
        hour: u32,
        pet_sleeping: bool,
    ) {
        let radius = screen_width as f32 * 0.1;
        let bright = daynight::ambient_brightness(hour) > 0.5;

        let basket = if bright {
            Color::from_argb(0xFF8B7355)
        } else {
            Color::from_argb(0xFF5D4E3A)
        };
        let hollow = if bright {
            Color::from_argb(0xFF6B5344)
        } else {
            Color::from_argb(0xFF3D3428)
        };
        let cushion = if pet_sleeping {
            Color::from_argb(0xFFE8D5C4)
        } else {
            Color::from_argb(0xFFD4C4B0)
        };

        // Basket rim
        canvas.fill_oval(screen_x, screen_y + radius * 0.05, radius, radius * 0.55, basket);
        // Hollow
        let inner = radius * 0.85;
        canvas.fill_oval(screen_x, screen_y + inner * 0.05, inner, inner * 0.45, hollow);
        // Cushion
        let pad = radius * 0.7;
        canvas.fill_oval(screen_x, screen_y + pad * 0.05, pad, pad * 0.35, cushion);
        // Rim highlight
        canvas.stroke_circle(
            screen_x - radius * 0.4,
            screen_y - radius * 0.15,
            radius * 0.2,
            4.0,
            Color::WHITE.with_alpha(0x33),
        );
    }
}

impl Default for NestRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_clamped_to_the_lower_screen() {
        let mut n = NestRenderer::new();
        n.set_position(2.0, 0.0);
        assert_eq!(n.nest_x(), 0.9);
        assert_eq!(n.nest_y(), 0.5);
    }

    #[test]
    fn clamped_position_stays_reachable() {
        // The walkable band tops out at 0.9 on both axes; a nest past it
        // must clamp inside so the pet can arrive.
        let mut n = NestRenderer::new();
        n.set_position(0.95, 0.95);
        assert!(n.nest_x() <= 0.9);
        assert!(n.nest_y() <= 0.9);
    }

    #[test]
    fn draw_touches_pixels_near_the_nest() {
        let n = NestRenderer::new();
        let mut c = Canvas::new(200, 200);
        n.draw(&mut c, 100.0, 100.0, 200, 13, false);
        let p = c.pixel(100, 100);
        assert_ne!((p.r, p.g, p.b, p.a), (0, 0, 0, 0));
    }
}
