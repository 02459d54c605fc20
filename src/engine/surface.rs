//! Surface lifecycle tracking and the presentation seam
//!
//! [`SurfaceLifecycle`] is the thread-safe gate over whether drawing may
//! proceed. Lifecycle callbacks arrive on the platform thread while the
//! render thread reads the same state every tick, so everything here lives
//! in atomics. The one correctness-critical exclusion in the engine is the
//! `drawing` flag: two overlapping lock/present cycles on the same surface
//! would corrupt frames, so exactly one caller may win
//! [`SurfaceLifecycle::try_start_drawing`] per frame.
//!
//! [`WallpaperSurface`] is the narrow seam to the actual platform surface;
//! [`FramebufferSurface`] is the software implementation used by preview
//! mode and tests.

use crate::render::canvas::Canvas;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

/// Lifecycle phase of the platform surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SurfaceState {
    NotCreated = 0,
    Ready = 1,
    Changing = 2,
    Destroyed = 3,
}

impl SurfaceState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Ready,
            2 => Self::Changing,
            3 => Self::Destroyed,
            _ => Self::NotCreated,
        }
    }
}

/// Thread-safe surface state: lifecycle phase, visibility, screen size and
/// the in-progress-draw flag.
#[derive(Debug)]
pub struct SurfaceLifecycle {
    state: AtomicU8,
    visible: AtomicBool,
    drawing: AtomicBool,
    width: AtomicU32,
    height: AtomicU32,
}

impl SurfaceLifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(SurfaceState::NotCreated as u8),
            visible: AtomicBool::new(false),
            drawing: AtomicBool::new(false),
            width: AtomicU32::new(0),
            height: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> SurfaceState {
        SurfaceState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Computed on every call, never cached
    pub fn can_draw(&self) -> bool {
        self.state() == SurfaceState::Ready && self.visible.load(Ordering::Acquire)
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (
            self.width.load(Ordering::Acquire),
            self.height.load(Ordering::Acquire),
        )
    }

    /// Single entry gate for a draw: checks `can_draw` and claims the
    /// exclusive drawing flag. Only the caller that gets `true` may draw
    /// this frame; everyone else skips.
    pub fn try_start_drawing(&self) -> bool {
        self.can_draw()
            && self
                .drawing
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    /// Unconditionally clears the drawing flag. Must run on every exit path
    /// of the draw routine, including errors.
    pub fn finish_drawing(&self) {
        self.drawing.store(false, Ordering::Release);
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.load(Ordering::Acquire)
    }

    pub fn on_surface_created(&self) {
        let prev = self.state.swap(SurfaceState::Ready as u8, Ordering::AcqRel);
        debug!("surface created (prev={:?})", SurfaceState::from_u8(prev));
    }

    /// The surface is Changing while the new dimensions are stored, so a
    /// concurrent `can_draw` check cannot pass mid-reconfiguration.
    pub fn on_surface_changed(&self, width: u32, height: u32) {
        self.state
            .store(SurfaceState::Changing as u8, Ordering::Release);
        self.width.store(width, Ordering::Release);
        self.height.store(height, Ordering::Release);
        self.state.store(SurfaceState::Ready as u8, Ordering::Release);
        debug!("surface changed: {width}x{height}");
    }

    /// Destroy also force-clears the drawing flag so a draw preempted
    /// mid-flight can never leave the gate stuck.
    pub fn on_surface_destroyed(&self) {
        let prev = self
            .state
            .swap(SurfaceState::Destroyed as u8, Ordering::AcqRel);
        self.drawing.store(false, Ordering::Release);
        debug!("surface destroyed (prev={:?})", SurfaceState::from_u8(prev));
    }

    pub fn on_visibility_changed(&self, visible: bool) {
        let prev = self.visible.swap(visible, Ordering::AcqRel);
        if prev != visible {
            debug!("visibility: {prev} -> {visible} (can_draw={})", self.can_draw());
        }
    }

    /// Back to the initial state. Called when the engine is torn down.
    pub fn reset(&self) {
        self.state
            .store(SurfaceState::NotCreated as u8, Ordering::Release);
        self.visible.store(false, Ordering::Release);
        self.drawing.store(false, Ordering::Release);
        self.width.store(0, Ordering::Release);
        self.height.store(0, Ordering::Release);
    }
}

impl Default for SurfaceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient presentation failures. All of these mean "skip the frame",
/// never "crash".
#[derive(Debug)]
pub enum SurfaceError {
    /// The canvas could not be locked (surface mid-destruction or resize)
    LockFailed(String),
    /// The locked canvas could not be presented
    PresentFailed(String),
    /// The surface has no pixels yet (zero-sized or not configured)
    NotConfigured,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockFailed(reason) => write!(f, "canvas lock failed: {reason}"),
            Self::PresentFailed(reason) => write!(f, "canvas present failed: {reason}"),
            Self::NotConfigured => write!(f, "surface not configured"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The platform presentation seam. One frame is: `lock` the canvas, draw
/// into it, `present` it. Implementations live outside the engine core
/// (compositor glue, test buffers).
pub trait WallpaperSurface: Send {
    /// Acquire the canvas for drawing. Failing is a skipped frame.
    fn lock(&mut self) -> Result<&mut Canvas, SurfaceError>;

    /// Push the locked canvas to the screen.
    fn present(&mut self) -> Result<(), SurfaceError>;

    /// The backing store changed size.
    fn resize(&mut self, width: u32, height: u32);
}

/// In-memory surface backed by a software [`Canvas`]. Used by preview mode
/// (frames exported through the present hook) and by tests.
pub struct FramebufferSurface {
    canvas: Canvas,
    frames_presented: u64,
    present_hook: Option<Box<dyn FnMut(&Canvas) + Send>>,
}

impl FramebufferSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            frames_presented: 0,
            present_hook: None,
        }
    }

    /// Install a callback invoked with the finished canvas on every present
    pub fn set_present_hook(&mut self, hook: Box<dyn FnMut(&Canvas) + Send>) {
        self.present_hook = Some(hook);
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl fmt::Debug for FramebufferSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramebufferSurface")
            .field("size", &(self.canvas.width(), self.canvas.height()))
            .field("frames_presented", &self.frames_presented)
            .finish()
    }
}

impl WallpaperSurface for FramebufferSurface {
    fn lock(&mut self) -> Result<&mut Canvas, SurfaceError> {
        if self.canvas.width() == 0 || self.canvas.height() == 0 {
            return Err(SurfaceError::NotConfigured);
        }
        Ok(&mut self.canvas)
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.frames_presented += 1;
        if let Some(hook) = self.present_hook.as_mut() {
            hook(&self.canvas);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width != self.canvas.width() || height != self.canvas.height() {
            self.canvas = Canvas::new(width, height);
        }
    }
}
