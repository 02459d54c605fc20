//! Launcher page-scroll offsets and the world/screen transform
//!
//! World coordinates are normalized to [0,1] on both axes so pet positions
//! survive rotations and resolution changes. The launcher reports its page
//! scroll as an offset in [0,1] (0.5 = centered); the X transform shifts
//! content slightly against the scroll to fake depth.

/// Fraction of the screen width the background shifts across a full page
/// sweep. 0 disables the parallax, 1 would pin content to the launcher page.
pub const PARALLAX_STRENGTH: f32 = 0.1;

/// Last-reported launcher scroll offsets plus the pure world<->screen
/// transform derived from them.
#[derive(Debug, Clone, Copy)]
pub struct PageOffsets {
    x_offset: f32,
    y_offset: f32,
    x_offset_step: f32,
    y_offset_step: f32,
}

impl PageOffsets {
    pub fn new() -> Self {
        Self {
            x_offset: 0.5,
            y_offset: 0.5,
            x_offset_step: 0.0,
            y_offset_step: 0.0,
        }
    }

    pub fn on_offsets_changed(
        &mut self,
        x_offset: f32,
        y_offset: f32,
        x_offset_step: f32,
        y_offset_step: f32,
    ) {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self.x_offset_step = x_offset_step;
        self.y_offset_step = y_offset_step;
    }

    pub fn x_offset(&self) -> f32 {
        self.x_offset
    }

    pub fn y_offset(&self) -> f32 {
        self.y_offset
    }

    pub fn x_offset_step(&self) -> f32 {
        self.x_offset_step
    }

    pub fn y_offset_step(&self) -> f32 {
        self.y_offset_step
    }

    /// World X (0..1) to screen pixels, with the horizontal parallax shift
    pub fn to_screen_x(&self, world_x: f32, screen_width: u32) -> f32 {
        let w = screen_width as f32;
        world_x * w - (self.x_offset - 0.5) * PARALLAX_STRENGTH * w
    }

    /// World Y (0..1) to screen pixels. No parallax on the vertical axis.
    pub fn to_screen_y(&self, world_y: f32, screen_height: u32) -> f32 {
        world_y * screen_height as f32
    }

    /// Exact inverse of [`Self::to_screen_x`] under the current offset, so
    /// a touch point maps to the world position that would screen-map back
    /// to it. Required for swipe-to-move round-trips.
    pub fn to_world_x(&self, screen_x: f32, screen_width: u32) -> f32 {
        let w = screen_width as f32;
        (screen_x + (self.x_offset - 0.5) * PARALLAX_STRENGTH * w) / w
    }

    /// Exact inverse of [`Self::to_screen_y`]
    pub fn to_world_y(&self, screen_y: f32, screen_height: u32) -> f32 {
        screen_y / screen_height as f32
    }
}

impl Default for PageOffsets {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_offset_is_identity_scale() {
        let o = PageOffsets::new();
        assert_eq!(o.to_screen_x(0.5, 1000), 500.0);
        assert_eq!(o.to_screen_y(0.25, 2000), 500.0);
    }

    #[test]
    fn scroll_shifts_x_but_not_y() {
        let mut o = PageOffsets::new();
        o.on_offsets_changed(1.0, 0.5, 0.25, 0.0);
        // Full right scroll pulls content left by half the parallax strength
        assert_eq!(o.to_screen_x(0.5, 1000), 500.0 - 0.5 * PARALLAX_STRENGTH * 1000.0);
        assert_eq!(o.to_screen_y(0.5, 1000), 500.0);
    }

    #[test]
    fn world_screen_round_trip() {
        let mut o = PageOffsets::new();
        for step in 0..=10 {
            let x_offset = step as f32 / 10.0;
            o.on_offsets_changed(x_offset, 0.5, 0.1, 0.0);
            for wx in [0.0_f32, 0.1, 0.33, 0.5, 0.77, 1.0] {
                let sx = o.to_screen_x(wx, 1080);
                let back = o.to_world_x(sx, 1080);
                assert!(
                    (back - wx).abs() < 1e-5,
                    "round trip failed at offset={x_offset} world_x={wx}: got {back}"
                );
            }
        }
        let sy = o.to_screen_y(0.42, 1920);
        assert!((o.to_world_y(sy, 1920) - 0.42).abs() < 1e-6);
    }
}
