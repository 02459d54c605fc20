//! Pet sprite drawing
//!
//! Picks the frame rectangle from the sheet's layout table, scales it by
//! growth stage, mirrors it by facing, and overlays the focus aura while a
//! focus session runs. Without a loaded sheet a placeholder blob keeps the
//! pet visible.

use crate::pet::animation::AnimationState;
use crate::pet::model::{GrowthStage, PetType};
use crate::render::canvas::{Canvas, Color, Rect};
use crate::render::sprite::{SpriteLayout, SpriteSheet};
use log::warn;
use std::path::Path;
use std::time::Instant;

/// Pet size as a fraction of screen width, by growth stage
pub fn pet_size_ratio(stage: GrowthStage) -> f32 {
    match stage {
        GrowthStage::Baby => 0.18,
        GrowthStage::Teen => 0.22,
        GrowthStage::Adult => 0.26,
    }
}

/// Everything the pet drawer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct PetFrame {
    pub state: AnimationState,
    pub frame: u32,
    pub facing_right: bool,
    pub screen_x: f32,
    pub screen_y: f32,
    pub growth_stage: GrowthStage,
    pub focusing: bool,
}

#[derive(Debug)]
pub struct PetRenderer {
    sheet: Option<SpriteSheet>,
    pet_type: PetType,
    variation: usize,
    started: Instant,
}

impl PetRenderer {
    pub fn new(pet_type: PetType, variation: usize) -> Self {
        Self {
            sheet: None,
            pet_type,
            variation,
            started: Instant::now(),
        }
    }

    pub fn pet_type(&self) -> PetType {
        self.pet_type
    }

    /// Switch species/variation and try to load its sheet from the asset
    /// directory. A failed load falls back to the placeholder; the engine
    /// keeps running.
    pub fn load_sprite(&mut self, pet_type: PetType, variation: usize, asset_dir: Option<&Path>) {
        if pet_type == self.pet_type && variation == self.variation && self.sheet.is_some() {
            return;
        }
        self.pet_type = pet_type;
        self.variation = variation;
        self.sheet = None;

        let Some(dir) = asset_dir else {
            return;
        };
        let name = pet_type
            .variations()
            .get(variation)
            .copied()
            .unwrap_or("default");
        let path = dir.join(format!("pet_{}_{}.png", pet_type.name(), name));
        match SpriteSheet::load(&path, SpriteLayout::for_pet(pet_type)) {
            Ok(sheet) => self.sheet = Some(sheet),
            Err(e) => warn!("sprite load failed, using placeholder: {e}"),
        }
    }

    /// Install an already-built sheet (embedded assets, tests)
    pub fn set_sheet(&mut self, sheet: SpriteSheet) {
        self.sheet = Some(sheet);
    }

    pub fn draw(&self, canvas: &mut Canvas, frame: &PetFrame, screen_width: u32, now: Instant) {
        let size = screen_width as f32 * pet_size_ratio(frame.growth_stage);

        match &self.sheet {
            Some(sheet) => {
                let src = sheet.source_rect(frame.state, frame.frame);
                // Keep the source aspect ratio inside a size x size box
                let aspect = if src.h > 0.0 { src.w / src.h } else { 1.0 };
                let (dw, dh) = if aspect >= 1.0 {
                    (size, size / aspect)
                } else {
                    (size * aspect, size)
                };
                let dst = Rect::centered(frame.screen_x, frame.screen_y, dw, dh);
                canvas.draw_sprite(sheet.image(), src, dst, !frame.facing_right, 1.0);
            }
            None => self.draw_placeholder(canvas, frame, size),
        }

        if frame.focusing || frame.state == AnimationState::Focus {
            self.draw_focus_aura(canvas, frame.screen_x, frame.screen_y, size, now);
        }
    }

    /// Colored blob with eyes, used when no sheet is loaded
    fn draw_placeholder(&self, canvas: &mut Canvas, frame: &PetFrame, size: f32) {
        let body = match self.pet_type {
            PetType::Cat => Color::from_argb(0xFFE8A87C),
            PetType::Dog => Color::from_argb(0xFFC4956A),
            PetType::Bird => Color::from_argb(0xFFFFD93D),
            PetType::Rabbit => Color::from_argb(0xFFFFB6C1),
        };
        let radius = size * 0.4;
        canvas.fill_circle(frame.screen_x, frame.screen_y, radius, body);

        let eye = Color::from_argb(0xFF222222);
        let eye_size = size * 0.05;
        let eye_y = frame.screen_y - radius * 0.2;
        // Sleeping pets keep their eyes shut
        if frame.state != AnimationState::Sleep {
            canvas.fill_circle(frame.screen_x - radius * 0.3, eye_y, eye_size, eye);
            canvas.fill_circle(frame.screen_x + radius * 0.3, eye_y, eye_size, eye);
        }
    }

    /// Expanding rings while the focus timer runs
    fn draw_focus_aura(&self, canvas: &mut Canvas, cx: f32, cy: f32, size: f32, now: Instant) {
        let t = now.duration_since(self.started).as_millis() as f64;
        for i in 0..3 {
            let phase = ((t / 600.0) + i as f64 * 0.33) % 1.0;
            let radius = size * 0.5 + phase as f32 * size * 0.4;
            let alpha = ((1.0 - phase) * 60.0) as u8;
            canvas.stroke_circle(
                cx,
                cy,
                radius,
                3.0,
                Color::from_argb(0xFF87CEEB).with_alpha(alpha),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn frame(state: AnimationState) -> PetFrame {
        PetFrame {
            state,
            frame: 0,
            facing_right: true,
            screen_x: 50.0,
            screen_y: 50.0,
            growth_stage: GrowthStage::Baby,
            focusing: false,
        }
    }

    #[test]
    fn size_grows_with_stage() {
        assert!(pet_size_ratio(GrowthStage::Adult) > pet_size_ratio(GrowthStage::Teen));
        assert!(pet_size_ratio(GrowthStage::Teen) > pet_size_ratio(GrowthStage::Baby));
    }

    #[test]
    fn placeholder_is_drawn_without_a_sheet() {
        let r = PetRenderer::new(PetType::Cat, 0);
        let mut c = Canvas::new(100, 100);
        r.draw(&mut c, &frame(AnimationState::Idle), 100, Instant::now());
        let p = c.pixel(50, 50);
        assert_ne!((p.r, p.g, p.b, p.a), (0, 0, 0, 0));
    }

    #[test]
    fn sheet_pixels_land_on_the_canvas() {
        let mut r = PetRenderer::new(PetType::Cat, 0);
        let mut img = RgbaImage::new(4, 2);
        for p in img.pixels_mut() {
            p.0 = [10, 200, 10, 255];
        }
        r.set_sheet(SpriteSheet::from_image(img, SpriteLayout::for_pet(PetType::Cat)));

        let mut c = Canvas::new(100, 100);
        r.draw(&mut c, &frame(AnimationState::Idle), 100, Instant::now());
        let p = c.pixel(50, 50);
        assert_eq!((p.r, p.g, p.b), (10, 200, 10));
    }

    #[test]
    fn missing_sheet_file_falls_back_quietly() {
        let mut r = PetRenderer::new(PetType::Cat, 0);
        let dir = tempfile::tempdir().unwrap();
        r.load_sprite(PetType::Dog, 1, Some(dir.path()));
        // No sheet, but drawing must still work
        let mut c = Canvas::new(100, 100);
        r.draw(&mut c, &frame(AnimationState::Idle), 100, Instant::now());
    }
}
