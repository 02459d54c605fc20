//! Sprite sheets and per-animation frame tables
//!
//! Frame source rectangles are explicit per animation state, carried by a
//! [`SpriteLayout`] in grid-cell units and resolved to pixels against the
//! decoded sheet. No row arithmetic is inferred from the state enum, so a
//! sheet with an unusual arrangement only needs a different table.
//!
//! Sheets ship with white backgrounds; near-white pixels are keyed to
//! transparent on load.

use crate::pet::animation::AnimationState;
use crate::pet::model::PetType;
use crate::render::canvas::Rect;
use image::RgbaImage;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Channel threshold above which a pixel counts as background white
const WHITE_KEY_THRESHOLD: u8 = 250;

/// One frame's position in grid-cell units (a frame may span several cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col: u32,
    pub row: u32,
    pub cols: u32,
    pub rows: u32,
}

impl CellRect {
    const fn cell(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            cols: 1,
            rows: 1,
        }
    }

    const fn wide(col: u32, row: u32, cols: u32) -> Self {
        Self {
            col,
            row,
            cols,
            rows: 1,
        }
    }
}

/// Grid dimensions plus the explicit frame list for each animation state
#[derive(Debug, Clone)]
pub struct SpriteLayout {
    pub grid_cols: u32,
    pub grid_rows: u32,
    frames: HashMap<AnimationState, Vec<CellRect>>,
}

impl SpriteLayout {
    pub fn new(
        grid_cols: u32,
        grid_rows: u32,
        frames: HashMap<AnimationState, Vec<CellRect>>,
    ) -> Result<Self, SpriteError> {
        for (state, list) in &frames {
            if list.is_empty() {
                return Err(SpriteError::EmptyAnimation { state: *state });
            }
            for rect in list {
                if rect.col + rect.cols > grid_cols || rect.row + rect.rows > grid_rows {
                    return Err(SpriteError::FrameOutOfGrid {
                        state: *state,
                        rect: *rect,
                        grid: (grid_cols, grid_rows),
                    });
                }
            }
        }
        if !frames.contains_key(&AnimationState::Idle) {
            return Err(SpriteError::EmptyAnimation {
                state: AnimationState::Idle,
            });
        }
        Ok(Self {
            grid_cols,
            grid_rows,
            frames,
        })
    }

    /// The built-in layout for a pet species
    pub fn for_pet(pet_type: PetType) -> Self {
        use AnimationState::*;
        let table = match pet_type {
            PetType::Cat => {
                // 4x2 grid: standing | walk x3 / sleeping | happy x3
                let walk = vec![CellRect::cell(1, 0), CellRect::cell(2, 0), CellRect::cell(3, 0)];
                let happy = vec![CellRect::cell(1, 1), CellRect::cell(2, 1), CellRect::cell(3, 1)];
                HashMap::from([
                    (Idle, vec![CellRect::cell(0, 0)]),
                    (Sit, vec![CellRect::cell(0, 0)]),
                    (Walk, walk.clone()),
                    (Run, walk),
                    (Sleep, vec![CellRect::cell(0, 1)]),
                    (Eat, vec![CellRect::cell(0, 0)]),
                    (Happy, happy.clone()),
                    (Play, happy.clone()),
                    (Focus, vec![CellRect::cell(0, 0)]),
                    (LevelUp, happy),
                ])
            }
            PetType::Dog => {
                // 4x2 grid where the stand/sleep poses span two cells
                let walk = vec![CellRect::cell(2, 0), CellRect::cell(3, 0)];
                let happy = vec![CellRect::cell(2, 1), CellRect::cell(3, 1)];
                HashMap::from([
                    (Idle, vec![CellRect::wide(0, 0, 2)]),
                    (Sit, vec![CellRect::wide(0, 0, 2)]),
                    (Walk, walk.clone()),
                    (Run, walk),
                    (Sleep, vec![CellRect::wide(0, 1, 2)]),
                    (Eat, vec![CellRect::wide(0, 0, 2)]),
                    (Happy, happy.clone()),
                    (Play, happy.clone()),
                    (Focus, vec![CellRect::wide(0, 0, 2)]),
                    (LevelUp, happy),
                ])
            }
            PetType::Bird => {
                // 2x2 grid: perch | hop / sleep | flutter
                HashMap::from([
                    (Idle, vec![CellRect::cell(0, 0)]),
                    (Sit, vec![CellRect::cell(0, 0)]),
                    (Walk, vec![CellRect::cell(1, 0), CellRect::cell(0, 0)]),
                    (Run, vec![CellRect::cell(1, 0), CellRect::cell(0, 0)]),
                    (Sleep, vec![CellRect::cell(0, 1)]),
                    (Eat, vec![CellRect::cell(0, 0)]),
                    (Happy, vec![CellRect::cell(1, 1), CellRect::cell(0, 0)]),
                    (Play, vec![CellRect::cell(1, 1), CellRect::cell(0, 0)]),
                    (Focus, vec![CellRect::cell(0, 0)]),
                    (LevelUp, vec![CellRect::cell(1, 1)]),
                ])
            }
            PetType::Rabbit => {
                // 4x2 grid holding one eight-frame hop cycle
                let hop: Vec<CellRect> = (0..8)
                    .map(|i| CellRect::cell(i % 4, i / 4))
                    .collect();
                HashMap::from([
                    (Idle, vec![CellRect::cell(0, 0)]),
                    (Sit, vec![CellRect::cell(0, 0)]),
                    (Walk, hop.clone()),
                    (Run, hop.clone()),
                    (Sleep, vec![CellRect::cell(0, 0)]),
                    (Eat, vec![CellRect::cell(0, 0)]),
                    (Happy, hop.clone()),
                    (Play, hop.clone()),
                    (Focus, vec![CellRect::cell(0, 0)]),
                    (LevelUp, hop),
                ])
            }
        };
        let (cols, rows) = match pet_type {
            PetType::Bird => (2, 2),
            _ => (4, 2),
        };
        // Built-in tables are checked by unit tests; construction cannot
        // fail for them, but fall back to a 1-cell idle if it ever does.
        Self::new(cols, rows, table).unwrap_or_else(|_| Self {
            grid_cols: 1,
            grid_rows: 1,
            frames: HashMap::from([(Idle, vec![CellRect::cell(0, 0)])]),
        })
    }

    /// Number of frames for a state (Idle's count when the state is absent)
    pub fn frame_count(&self, state: AnimationState) -> u32 {
        self.frame_list(state).len() as u32
    }

    fn frame_list(&self, state: AnimationState) -> &[CellRect] {
        self.frames
            .get(&state)
            .or_else(|| self.frames.get(&AnimationState::Idle))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pixel source rectangle for (state, frame) against a sheet of the
    /// given size. The frame index wraps.
    pub fn source_rect(&self, state: AnimationState, frame: u32, sheet_w: u32, sheet_h: u32) -> Rect {
        let list = self.frame_list(state);
        if list.is_empty() {
            return Rect::new(0.0, 0.0, sheet_w as f32, sheet_h as f32);
        }
        let cell = list[(frame as usize) % list.len()];
        let cell_w = sheet_w as f32 / self.grid_cols as f32;
        let cell_h = sheet_h as f32 / self.grid_rows as f32;
        Rect::new(
            cell.col as f32 * cell_w,
            cell.row as f32 * cell_h,
            cell.cols as f32 * cell_w,
            cell.rows as f32 * cell_h,
        )
    }
}

/// Sprite loading failures. A missing or broken sheet is not fatal: the
/// pet renderer falls back to a placeholder.
#[derive(Debug)]
pub enum SpriteError {
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    EmptyAnimation {
        state: AnimationState,
    },
    FrameOutOfGrid {
        state: AnimationState,
        rect: CellRect,
        grid: (u32, u32),
    },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "failed to decode sprite sheet '{}': {source}", path.display())
            }
            Self::EmptyAnimation { state } => {
                write!(f, "animation {state:?} has no frames")
            }
            Self::FrameOutOfGrid { state, rect, grid } => write!(
                f,
                "frame {rect:?} of {state:?} exceeds the {}x{} grid",
                grid.0, grid.1
            ),
        }
    }
}

impl std::error::Error for SpriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A decoded, white-keyed sheet plus its layout
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
    layout: SpriteLayout,
}

impl SpriteSheet {
    /// Decode a sheet from disk and key out the white background
    pub fn load(path: &Path, layout: SpriteLayout) -> Result<Self, SpriteError> {
        let decoded = image::open(path)
            .map_err(|source| SpriteError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        debug!(
            "sprite sheet loaded: {} ({}x{}, grid {}x{})",
            path.display(),
            decoded.width(),
            decoded.height(),
            layout.grid_cols,
            layout.grid_rows
        );
        Ok(Self::from_image(decoded, layout))
    }

    /// Wrap an already-decoded image (tests, embedded assets)
    pub fn from_image(mut image: RgbaImage, layout: SpriteLayout) -> Self {
        key_out_white(&mut image);
        Self { image, layout }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn layout(&self) -> &SpriteLayout {
        &self.layout
    }

    /// Pixel source rect for the given animation frame
    pub fn source_rect(&self, state: AnimationState, frame: u32) -> Rect {
        self.layout
            .source_rect(state, frame, self.image.width(), self.image.height())
    }
}

/// Turn near-white pixels fully transparent
fn key_out_white(image: &mut RgbaImage) {
    for p in image.pixels_mut() {
        let [r, g, b, a] = p.0;
        if r >= WHITE_KEY_THRESHOLD && g >= WHITE_KEY_THRESHOLD && b >= WHITE_KEY_THRESHOLD && a > 0
        {
            p.0 = [0, 0, 0, 0];
        }
    }
}
