//! Pointer gesture classification
//!
//! Raw pointer events (down/move/up, single pointer) become semantic
//! gestures through timing and distance heuristics: tap, double tap, long
//! press and swipe. Long press fires during the move phase as soon as the
//! hold timeout passes; once it has fired, the matching up emits nothing.

use log::debug;
use std::time::{Duration, Instant};

const LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(500);
const DOUBLE_TAP_TIMEOUT: Duration = Duration::from_millis(300);
const SWIPE_THRESHOLD: f32 = 100.0;
const DOUBLE_TAP_RADIUS: f32 = 100.0;

/// Phase of a raw pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A raw platform pointer event. The timestamp is explicit so gesture
/// sequences can be replayed in tests.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
    pub time: Instant,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: f32, y: f32, time: Instant) -> Self {
        Self { phase, x, y, time }
    }
}

/// Classified gesture, with screen-space coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Quick touch: petting
    Tap { x: f32, y: f32 },
    /// Held touch: feeding
    LongPress { x: f32, y: f32 },
    /// Two taps in quick succession: playing
    DoubleTap { x: f32, y: f32 },
    /// Drag past the distance threshold: guide the pet somewhere
    Swipe {
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
    },
}

/// Classifies a single active touch sequence. No multi-touch.
#[derive(Debug)]
pub struct TouchTracker {
    down_time: Option<Instant>,
    down_x: f32,
    down_y: f32,
    last_tap: Option<(Instant, f32, f32)>,
    long_press_fired: bool,
    /// Set when a gesture was already emitted for the current sequence,
    /// suppressing any further gesture on the matching up.
    consumed: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self {
            down_time: None,
            down_x: 0.0,
            down_y: 0.0,
            last_tap: None,
            long_press_fired: false,
            consumed: false,
        }
    }

    /// Feed one pointer event; returns the gesture it completed, if any
    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event.phase {
            PointerPhase::Down => {
                self.down_time = Some(event.time);
                self.down_x = event.x;
                self.down_y = event.y;
                self.long_press_fired = false;
                self.consumed = false;
                None
            }
            PointerPhase::Move => self.on_move(event),
            PointerPhase::Up => self.on_up(event),
        }
    }

    fn on_move(&mut self, event: PointerEvent) -> Option<Gesture> {
        let down_time = self.down_time?;
        let held = event.time.duration_since(down_time);
        let travel = distance(event.x, event.y, self.down_x, self.down_y);

        if held >= LONG_PRESS_TIMEOUT && travel < SWIPE_THRESHOLD && !self.long_press_fired {
            self.long_press_fired = true;
            self.consumed = true;
            debug!("gesture: long press at ({:.0}, {:.0})", self.down_x, self.down_y);
            return Some(Gesture::LongPress {
                x: self.down_x,
                y: self.down_y,
            });
        }
        None
    }

    fn on_up(&mut self, event: PointerEvent) -> Option<Gesture> {
        let _down_time = self.down_time.take()?;

        // A long press already handled this sequence; the release is not
        // an additional tap.
        if self.consumed {
            return None;
        }

        let travel = distance(event.x, event.y, self.down_x, self.down_y);
        if travel >= SWIPE_THRESHOLD {
            debug!(
                "gesture: swipe ({:.0}, {:.0}) -> ({:.0}, {:.0})",
                self.down_x, self.down_y, event.x, event.y
            );
            return Some(Gesture::Swipe {
                start_x: self.down_x,
                start_y: self.down_y,
                end_x: event.x,
                end_y: event.y,
            });
        }

        if let Some((tap_time, tap_x, tap_y)) = self.last_tap
            && event.time.duration_since(tap_time) < DOUBLE_TAP_TIMEOUT
            && distance(event.x, event.y, tap_x, tap_y) < DOUBLE_TAP_RADIUS
        {
            // Clear the pending tap so a third tap starts a fresh pair
            // instead of chaining into a second double tap.
            self.last_tap = None;
            debug!("gesture: double tap at ({:.0}, {:.0})", event.x, event.y);
            return Some(Gesture::DoubleTap {
                x: event.x,
                y: event.y,
            });
        }

        self.last_tap = Some((event.time, event.x, event.y));
        debug!("gesture: tap at ({:.0}, {:.0})", event.x, event.y);
        Some(Gesture::Tap {
            x: event.x,
            y: event.y,
        })
    }
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn distance(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    (dx * dx + dy * dy).sqrt()
}
