//! Background: sky gradient, night stars and the ground band

use crate::pet::daynight::{self, TimeOfDay};
use crate::render::canvas::{Canvas, Color, Rect};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;

const STAR_COUNT: usize = 50;

/// Draws the sky, stars and ground for the current hour
#[derive(Debug)]
pub struct BackgroundRenderer {
    /// Fixed star field: (x, y, radius) in normalized coordinates, biased
    /// toward the upper half of the screen
    stars: Vec<(f32, f32, f32)>,
    started: Instant,
}

impl BackgroundRenderer {
    pub fn new() -> Self {
        let mut rng = SmallRng::seed_from_u64(0x57A125);
        let stars = (0..STAR_COUNT)
            .map(|_| {
                (
                    rng.random_range(0.0..1.0f32),
                    rng.random_range(0.0..0.6f32),
                    rng.random_range(1.0..3.0f32),
                )
            })
            .collect();
        Self {
            stars,
            started: Instant::now(),
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, hour: u32, now: Instant) {
        let (w, h) = (canvas.width(), canvas.height());
        let time = daynight::time_of_day(hour);
        let (top, bottom) = daynight::sky_colors(time);

        canvas.fill_vertical_gradient(Rect::new(0.0, 0.0, w as f32, h as f32), top, bottom);

        if time == TimeOfDay::Night {
            self.draw_stars(canvas, hour, now);
        }

        self.draw_ground(canvas, time);
    }

    fn draw_stars(&self, canvas: &mut Canvas, hour: u32, now: Instant) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let brightness = daynight::ambient_brightness(hour);
        let alpha = (((1.0 - brightness) * 255.0) as u8).min(200);
        let tick = now.duration_since(self.started).as_millis() as i64 / 100;

        for &(x, y, size) in &self.stars {
            // Cheap twinkle: every star dims briefly on its own phase
            let phase = (tick + (x * 1000.0) as i64) % 20;
            let a = if phase < 3 { alpha / 2 } else { alpha };
            canvas.fill_circle(x * w, y * h, size, Color::WHITE.with_alpha(a));
        }
    }

    fn draw_ground(&self, canvas: &mut Canvas, time: TimeOfDay) {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        let ground_height = h * 0.15;
        let ground_top = h - ground_height;

        let ground = match time {
            TimeOfDay::Morning => Color::from_argb(0xFF7CB342),
            TimeOfDay::Afternoon => Color::from_argb(0xFF558B2F),
            TimeOfDay::Evening => Color::from_argb(0xFF33691E),
            TimeOfDay::Night => Color::from_argb(0xFF1B3D1B),
        };

        canvas.fill_rect(Rect::new(0.0, ground_top, w, ground_height), ground);
        // Grass edge
        canvas.fill_rect(
            Rect::new(0.0, ground_top + 5.0, w, 3.0),
            ground.with_alpha(0x66).dimmed(0.5),
        );
    }
}

impl Default for BackgroundRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_sky_is_darker_than_noon() {
        let r = BackgroundRenderer::new();
        let now = Instant::now();

        let mut day = Canvas::new(32, 32);
        r.draw(&mut day, 13, now);
        let mut night = Canvas::new(32, 32);
        r.draw(&mut night, 2, now);

        let lum = |c: &Canvas| {
            let p = c.pixel(16, 4);
            p.r as u32 + p.g as u32 + p.b as u32
        };
        assert!(lum(&day) > lum(&night));
    }

    #[test]
    fn ground_band_covers_bottom() {
        let r = BackgroundRenderer::new();
        let mut c = Canvas::new(32, 100);
        r.draw(&mut c, 13, Instant::now());
        // Bottom rows are the afternoon ground green
        let p = c.pixel(10, 95);
        assert!(p.g > p.r && p.g > p.b);
    }
}
