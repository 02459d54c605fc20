//! Animation states and frame progression
//!
//! Each animation state has a fixed definition (frame count, frame
//! duration, whether it loops, what it transitions into). The controller
//! advances at most one frame per update tick, wrapping looping animations
//! and auto-transitioning one-shots into their follow-up state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Closed set of pet animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationState {
    Idle,
    Walk,
    Run,
    Sit,
    Sleep,
    Eat,
    Happy,
    Play,
    /// Companion focus timer is running
    Focus,
    /// Growth stage just advanced
    LevelUp,
}

/// Static definition of one animation
#[derive(Debug, Clone, Copy)]
pub struct AnimationDef {
    pub frame_count: u32,
    pub frame_duration: Duration,
    pub looping: bool,
    /// Follow-up state for one-shots. Ignored while `looping`.
    pub next_state: Option<AnimationState>,
}

impl AnimationDef {
    const fn looping(frame_count: u32, frame_duration_ms: u64) -> Self {
        Self {
            frame_count,
            frame_duration: Duration::from_millis(frame_duration_ms),
            looping: true,
            next_state: None,
        }
    }

    const fn one_shot(frame_count: u32, frame_duration_ms: u64, next: AnimationState) -> Self {
        Self {
            frame_count,
            frame_duration: Duration::from_millis(frame_duration_ms),
            looping: false,
            next_state: Some(next),
        }
    }
}

/// Immutable animation table shared by the controller and the renderers
pub type AnimationTable = Arc<HashMap<AnimationState, AnimationDef>>;

/// The default definitions, shared by every pet
pub fn default_animations() -> AnimationTable {
    use AnimationState::*;
    Arc::new(HashMap::from([
        (Idle, AnimationDef::looping(4, 500)),
        (Walk, AnimationDef::looping(6, 100)),
        (Run, AnimationDef::looping(6, 80)),
        (Sit, AnimationDef::looping(2, 800)),
        (Sleep, AnimationDef::looping(2, 1000)),
        (Eat, AnimationDef::one_shot(4, 200, Idle)),
        (Happy, AnimationDef::one_shot(4, 150, Idle)),
        (Play, AnimationDef::one_shot(6, 120, Idle)),
        (Focus, AnimationDef::looping(2, 900)),
        (LevelUp, AnimationDef::one_shot(6, 150, Happy)),
    ]))
}

/// Per-pet animation state machine: current state, frame index and timers
#[derive(Debug)]
pub struct AnimationController {
    table: AnimationTable,
    state: AnimationState,
    def: AnimationDef,
    frame: u32,
    frame_started: Option<Instant>,
    state_started: Option<Instant>,
}

impl AnimationController {
    pub fn new(table: AnimationTable) -> Self {
        let def = lookup(&table, AnimationState::Idle);
        Self {
            table,
            state: AnimationState::Idle,
            def,
            frame: 0,
            frame_started: None,
            state_started: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn def(&self) -> &AnimationDef {
        &self.def
    }

    /// Time spent in the current state
    pub fn state_elapsed(&self, now: Instant) -> Duration {
        self.state_started
            .map(|s| now.duration_since(s))
            .unwrap_or(Duration::ZERO)
    }

    /// Switch state: no-op when unchanged, otherwise restart frame and
    /// state timers from `now`
    pub fn set_state(&mut self, new_state: AnimationState, now: Instant) {
        if self.state == new_state {
            return;
        }
        self.state = new_state;
        self.def = lookup(&self.table, new_state);
        self.frame = 0;
        self.frame_started = Some(now);
        self.state_started = Some(now);
    }

    /// Play a non-looping reactive animation (happy/eat/play); it returns
    /// to its follow-up state on completion
    pub fn play_once(&mut self, state: AnimationState, now: Instant) {
        self.set_state(state, now);
    }

    /// Advance the animation. At most one frame (and at most one state
    /// transition) happens per call regardless of how much time passed, so
    /// a stalled loop cannot churn through states in one tick.
    ///
    /// Returns true when a one-shot completed and auto-transitioned.
    pub fn update(&mut self, now: Instant) -> bool {
        let started = *self.frame_started.get_or_insert(now);
        if now.duration_since(started) < self.def.frame_duration {
            return false;
        }

        self.frame += 1;
        self.frame_started = Some(now);

        if self.frame >= self.def.frame_count {
            if self.def.looping {
                self.frame = 0;
            } else {
                let next = self.def.next_state.unwrap_or(AnimationState::Idle);
                self.set_state(next, now);
                return true;
            }
        }
        false
    }
}

fn lookup(table: &AnimationTable, state: AnimationState) -> AnimationDef {
    table
        .get(&state)
        .or_else(|| table.get(&AnimationState::Idle))
        .copied()
        .unwrap_or(AnimationDef::looping(1, 500))
}
