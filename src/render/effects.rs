//! Touch feedback effects
//!
//! Short-lived overlays spawned by gestures: a rising heart for petting,
//! a food morsel for feeding, a star burst for playing, plus scattering
//! particles. The renderer owns the active set; entries are appended on
//! gestures and dropped during the draw pass once their age reaches 1.

use crate::render::canvas::{Canvas, Color};
use std::time::{Duration, Instant};

/// What an effect looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Heart,
    Food,
    Play,
    /// Small scattering dot; `seed` fixes its flight direction
    Particle { color: Color, seed: u32 },
    /// Burst shown when the growth stage advances
    LevelUp,
}

/// One live effect
#[derive(Debug, Clone, Copy)]
pub struct Effect {
    kind: EffectKind,
    x: f32,
    y: f32,
    start: Instant,
    duration: Duration,
}

impl Effect {
    fn new(kind: EffectKind, x: f32, y: f32, start: Instant, duration_ms: u64) -> Self {
        Self {
            kind,
            x,
            y,
            start,
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Normalized age: 0 at spawn, 1 at expiry, monotonically increasing
    fn age(&self, now: Instant) -> f32 {
        now.duration_since(self.start).as_secs_f32() / self.duration.as_secs_f32()
    }

    fn expired(&self, now: Instant) -> bool {
        self.age(now) >= 1.0
    }
}

/// Owns and draws the active effect collection
#[derive(Debug)]
pub struct EffectRenderer {
    effects: Vec<Effect>,
    particle_seed: u32,
}

impl EffectRenderer {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            particle_seed: 0,
        }
    }

    pub fn active_count(&self) -> usize {
        self.effects.len()
    }

    pub fn add_heart(&mut self, x: f32, y: f32, now: Instant) {
        self.effects.push(Effect::new(EffectKind::Heart, x, y, now, 800));
        self.scatter(x, y, now, 5, Color::from_argb(0xFFFF6B6B));
    }

    pub fn add_food(&mut self, x: f32, y: f32, now: Instant) {
        self.effects.push(Effect::new(EffectKind::Food, x, y, now, 600));
    }

    pub fn add_play(&mut self, x: f32, y: f32, now: Instant) {
        self.effects.push(Effect::new(EffectKind::Play, x, y, now, 500));
        self.scatter(x, y, now, 8, Color::from_argb(0xFFFFD93D));
    }

    pub fn add_level_up(&mut self, x: f32, y: f32, now: Instant) {
        self.effects.push(Effect::new(EffectKind::LevelUp, x, y, now, 1200));
        self.scatter(x, y, now, 12, Color::from_argb(0xFFFFE066));
    }

    fn scatter(&mut self, x: f32, y: f32, now: Instant, count: u32, color: Color) {
        for _ in 0..count {
            self.particle_seed = self.particle_seed.wrapping_add(47);
            self.effects.push(Effect::new(
                EffectKind::Particle {
                    color,
                    seed: self.particle_seed,
                },
                x,
                y,
                now,
                400,
            ));
        }
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Draw everything still alive and drop what expired
    pub fn draw(&mut self, canvas: &mut Canvas, now: Instant) {
        self.effects.retain(|e| !e.expired(now));
        for effect in &self.effects {
            let age = effect.age(now).clamp(0.0, 1.0);
            match effect.kind {
                EffectKind::Heart => draw_heart(canvas, effect, age),
                EffectKind::Food => draw_food(canvas, effect, age),
                EffectKind::Play => draw_star_burst(canvas, effect, age, 25.0, 0xFFFFD93D),
                EffectKind::LevelUp => draw_star_burst(canvas, effect, age, 40.0, 0xFFFFE066),
                EffectKind::Particle { color, seed } => {
                    draw_particle(canvas, effect, age, color, seed);
                }
            }
        }
    }
}

impl Default for EffectRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn fade_alpha(age: f32) -> u8 {
    ((1.0 - age) * 255.0) as u8
}

fn draw_heart(canvas: &mut Canvas, effect: &Effect, age: f32) {
    let color = Color::from_argb(0xFFFF6B6B).with_alpha(fade_alpha(age));
    let scale = 1.0 + age * 0.5;
    let size = 40.0 * scale;
    let cx = effect.x;
    let cy = effect.y - age * 80.0;

    // Two lobes and a point
    canvas.fill_circle(cx - size * 0.25, cy - size * 0.15, size * 0.3, color);
    canvas.fill_circle(cx + size * 0.25, cy - size * 0.15, size * 0.3, color);
    canvas.fill_polygon(
        &[
            (cx - size * 0.5, cy - size * 0.05),
            (cx + size * 0.5, cy - size * 0.05),
            (cx, cy + size * 0.5),
        ],
        color,
    );
}

fn draw_food(canvas: &mut Canvas, effect: &Effect, age: f32) {
    let color = Color::from_argb(0xFF8B4513).with_alpha(fade_alpha(age));
    let y = effect.y - age * 40.0;
    canvas.fill_oval(effect.x, y, 15.0, 9.0, color);
}

fn draw_star_burst(canvas: &mut Canvas, effect: &Effect, age: f32, radius: f32, argb: u32) {
    let color = Color::from_argb(argb).with_alpha(fade_alpha(age));
    let scale = 1.0 + age * 0.8;
    let cx = effect.x;
    let cy = effect.y - age * 60.0;
    let outer = radius * scale;
    let inner = outer * 0.4;

    let mut points = Vec::with_capacity(10);
    for i in 0..10 {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
        points.push((cx + angle.cos() * r, cy - angle.sin() * r));
    }
    canvas.fill_polygon(&points, color);
}

fn draw_particle(canvas: &mut Canvas, effect: &Effect, age: f32, color: Color, seed: u32) {
    let angle = (seed % 360) as f32 * std::f32::consts::PI / 180.0;
    let distance = age * 100.0;
    let x = effect.x + angle.cos() * distance;
    let y = effect.y + angle.sin() * distance - age * 50.0;
    let size = 8.0 * (1.0 - age * 0.5);
    canvas.fill_circle(x, y, size, color.with_alpha(fade_alpha(age)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_gesture_spawns_heart_plus_particles() {
        let mut r = EffectRenderer::new();
        r.add_heart(50.0, 50.0, Instant::now());
        assert_eq!(r.active_count(), 6);
    }

    #[test]
    fn effects_expire_during_draw() {
        let mut r = EffectRenderer::new();
        let t0 = Instant::now();
        r.add_play(50.0, 50.0, t0);
        assert_eq!(r.active_count(), 9);

        let mut c = Canvas::new(100, 100);
        // Mid-life: still alive
        r.draw(&mut c, t0 + Duration::from_millis(300));
        assert_eq!(r.active_count(), 9);

        // Particles (400ms) gone, star (500ms) still there
        r.draw(&mut c, t0 + Duration::from_millis(450));
        assert_eq!(r.active_count(), 1);

        r.draw(&mut c, t0 + Duration::from_millis(600));
        assert_eq!(r.active_count(), 0);
    }

    #[test]
    fn clear_empties_the_set() {
        let mut r = EffectRenderer::new();
        r.add_food(10.0, 10.0, Instant::now());
        r.add_level_up(10.0, 10.0, Instant::now());
        assert!(r.active_count() > 0);
        r.clear();
        assert_eq!(r.active_count(), 0);
    }
}
