//! Adaptive frame scheduling
//!
//! The draw loop does not run at a fixed rate: while the user interacts the
//! engine renders at ~60fps, settles to ~30fps when nothing is happening,
//! and drops to ~10fps while the pet sleeps. The scheduler is a small state
//! machine over those three tiers plus delta-time bookkeeping for the
//! movement integration.

use log::debug;
use std::time::{Duration, Instant};

/// Render activity tier. Governs the target frame interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// User is interacting: ~60fps
    Active,
    /// Nothing urgent on screen: ~30fps
    Idle,
    /// Pet is asleep: ~10fps
    Sleep,
}

/// Frame interval per state, in milliseconds
const INTERVAL_ACTIVE_MS: u64 = 16;
const INTERVAL_IDLE_MS: u64 = 33;
const INTERVAL_SLEEP_MS: u64 = 100;

/// Upper bound on delta time. After the loop was suspended (wallpaper not
/// visible) the first resumed frame would otherwise integrate a huge dt.
const MAX_DELTA_TIME: f32 = 0.1;

/// How long Active persists without further interaction before demoting
pub const ACTIVE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Chooses the frame interval from the current render state and computes
/// clamped per-frame delta times.
///
/// All methods take the current time as a parameter so tests can drive the
/// scheduler through simulated clock sequences.
#[derive(Debug)]
pub struct FrameScheduler {
    state: RenderState,
    last_frame: Option<Instant>,
    state_changed_at: Option<Instant>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: RenderState::Idle,
            last_frame: None,
            state_changed_at: None,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Target interval between draw ticks for the current state
    pub fn frame_interval(&self) -> Duration {
        let ms = match self.state {
            RenderState::Active => INTERVAL_ACTIVE_MS,
            RenderState::Idle => INTERVAL_IDLE_MS,
            RenderState::Sleep => INTERVAL_SLEEP_MS,
        };
        Duration::from_millis(ms)
    }

    /// User interaction: force Active and restart the demotion timer.
    ///
    /// Unlike `on_idle`/`on_sleep` this always restamps the change time,
    /// so continued interaction keeps pushing the timeout out.
    pub fn on_interaction(&mut self, now: Instant) {
        if self.state != RenderState::Active {
            debug!("render state: {:?} -> Active", self.state);
        }
        self.state = RenderState::Active;
        self.state_changed_at = Some(now);
    }

    /// Transition to Idle unless already there
    pub fn on_idle(&mut self, now: Instant) {
        if self.state != RenderState::Idle {
            debug!("render state: {:?} -> Idle", self.state);
            self.state = RenderState::Idle;
            self.state_changed_at = Some(now);
        }
    }

    /// Transition to Sleep unless already there
    pub fn on_sleep(&mut self, now: Instant) {
        if self.state != RenderState::Sleep {
            debug!("render state: {:?} -> Sleep", self.state);
            self.state = RenderState::Sleep;
            self.state_changed_at = Some(now);
        }
    }

    /// Demote Active to Idle once the interaction timeout has passed.
    /// Called once per tick before drawing.
    pub fn check_active_timeout(&mut self, now: Instant) {
        if self.state == RenderState::Active
            && let Some(changed) = self.state_changed_at
            && now.duration_since(changed) > ACTIVE_TIMEOUT
        {
            self.on_idle(now);
        }
    }

    /// Seconds since the previous call, clamped to [`MAX_DELTA_TIME`].
    ///
    /// The first call after `reset_time` returns 0.0 so a freshly resumed
    /// loop does not integrate the whole suspension gap.
    pub fn calculate_delta_time(&mut self, now: Instant) -> f32 {
        let dt = match self.last_frame {
            None => 0.0,
            Some(last) => now.duration_since(last).as_secs_f32(),
        };
        self.last_frame = Some(now);
        dt.min(MAX_DELTA_TIME)
    }

    /// Forget the last frame time. Called whenever the draw loop stops so
    /// the next start begins a fresh dt sequence.
    pub fn reset_time(&mut self) {
        self.last_frame = None;
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_follows_state() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        assert_eq!(s.state(), RenderState::Idle);
        assert_eq!(s.frame_interval(), Duration::from_millis(33));

        s.on_interaction(t0);
        assert_eq!(s.frame_interval(), Duration::from_millis(16));

        s.on_sleep(t0);
        assert_eq!(s.frame_interval(), Duration::from_millis(100));

        s.on_idle(t0);
        assert_eq!(s.frame_interval(), Duration::from_millis(33));
    }

    #[test]
    fn active_decays_to_idle_after_timeout() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        s.on_interaction(t0);

        // Below the timeout: still Active
        s.check_active_timeout(t0 + Duration::from_millis(1999));
        assert_eq!(s.state(), RenderState::Active);

        s.check_active_timeout(t0 + Duration::from_millis(2500));
        assert_eq!(s.state(), RenderState::Idle);
        assert_eq!(s.frame_interval(), Duration::from_millis(33));
    }

    #[test]
    fn interaction_restamps_timeout() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        s.on_interaction(t0);
        s.on_interaction(t0 + Duration::from_millis(1500));
        // 2.5s after the first interaction but only 1s after the second
        s.check_active_timeout(t0 + Duration::from_millis(2500));
        assert_eq!(s.state(), RenderState::Active);
    }

    #[test]
    fn sleep_and_idle_do_not_restamp_when_unchanged() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        s.on_sleep(t0);
        let stamped = s.state_changed_at;
        s.on_sleep(t0 + Duration::from_secs(5));
        assert_eq!(s.state_changed_at, stamped);
    }

    #[test]
    fn first_delta_after_reset_is_zero() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        assert_eq!(s.calculate_delta_time(t0), 0.0);

        let dt = s.calculate_delta_time(t0 + Duration::from_millis(33));
        assert!((dt - 0.033).abs() < 1e-4);

        s.reset_time();
        assert_eq!(s.calculate_delta_time(t0 + Duration::from_secs(60)), 0.0);
    }

    #[test]
    fn delta_is_clamped_after_long_gap() {
        let mut s = FrameScheduler::new();
        let t0 = Instant::now();
        s.calculate_delta_time(t0);
        let dt = s.calculate_delta_time(t0 + Duration::from_secs(10));
        assert_eq!(dt, MAX_DELTA_TIME);
    }
}
