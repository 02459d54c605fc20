//! Autonomous pet behavior
//!
//! Turns discrete actions (touch reactions, nest trips) and elapsed time
//! into a continuous position and animation-state requests. While the pet
//! is idling it periodically rolls a weighted random action: wander, head
//! home, sit down, look around, or goof off. The RNG is injected so a
//! seeded run replays the same life.

use crate::pet::animation::{AnimationController, AnimationState};
use glam::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;
use std::time::{Duration, Instant};

/// World units (screen fractions) per second while walking
const MOVE_SPEED: f32 = 0.12;
/// Distance at which a movement target counts as reached
const ARRIVAL_THRESHOLD: f32 = 0.02;
/// Bounds on the pause between autonomous idle actions
const IDLE_ACTION_MIN: Duration = Duration::from_millis(2000);
const IDLE_ACTION_MAX: Duration = Duration::from_millis(5000);

/// Horizontal band the pet may occupy
const X_RANGE: (f32, f32) = (0.1, 0.9);
/// Vertical band: keeps the pet out of the status bar and off screen edges
const Y_RANGE: (f32, f32) = (0.3, 0.9);

/// Movement, facing and autonomous action planning for one pet
#[derive(Debug)]
pub struct PetBehavior {
    controller: AnimationController,
    pos: Vec2,
    target: Option<Vec2>,
    facing_right: bool,
    home: Option<Vec2>,
    next_idle_action: Option<Instant>,
    looking_around: bool,
    look_end: Instant,
    rng: SmallRng,
}

impl PetBehavior {
    pub fn new(controller: AnimationController, rng: SmallRng) -> Self {
        Self {
            controller,
            pos: Vec2::new(0.5, 0.7),
            target: None,
            facing_right: true,
            home: None,
            next_idle_action: None,
            looking_around: false,
            look_end: Instant::now(),
            rng,
        }
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn is_looking_around(&self) -> bool {
        self.looking_around
    }

    pub fn home(&self) -> Option<Vec2> {
        self.home
    }

    pub fn set_home(&mut self, x: f32, y: f32) {
        self.home = Some(Vec2::new(
            x.clamp(X_RANGE.0, X_RANGE.1),
            y.clamp(Y_RANGE.0, Y_RANGE.1),
        ));
    }

    /// Place the pet directly (initialization / restore)
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x.clamp(X_RANGE.0, X_RANGE.1), y.clamp(Y_RANGE.0, Y_RANGE.1));
    }

    /// Per-tick update: look-around timeout, movement integration, frame
    /// advance, then autonomous idle actions. Returns true when a one-shot
    /// animation auto-transitioned this tick.
    pub fn update(&mut self, dt: f32, now: Instant) -> bool {
        if self.looking_around && now > self.look_end {
            self.looking_around = false;
            self.facing_right = !self.facing_right;
        }

        self.update_movement(dt, now);

        let transitioned = self.controller.update(now);

        let state = self.controller.state();
        if state == AnimationState::Idle || state == AnimationState::Sit {
            self.check_idle_action(now);
        }

        transitioned
    }

    /// Start walking toward a point. Out-of-range targets are clamped into
    /// the safe viewing band, never rejected.
    pub fn move_to(&mut self, x: f32, y: f32, now: Instant) {
        let target = Vec2::new(x.clamp(X_RANGE.0, X_RANGE.1), y.clamp(Y_RANGE.0, Y_RANGE.1));
        if (target.x - self.pos.x).abs() > 0.01 {
            self.facing_right = target.x > self.pos.x;
        }
        self.target = Some(target);
        self.controller.set_state(AnimationState::Walk, now);
    }

    /// Petted (tap)
    pub fn on_pet(&mut self, now: Instant) {
        self.cancel_movement();
        self.controller.play_once(AnimationState::Happy, now);
    }

    /// Fed (long press)
    pub fn on_feed(&mut self, now: Instant) {
        self.cancel_movement();
        self.controller.play_once(AnimationState::Eat, now);
    }

    /// Played with (double tap)
    pub fn on_play(&mut self, now: Instant) {
        self.cancel_movement();
        self.controller.play_once(AnimationState::Play, now);
    }

    pub fn sleep(&mut self, now: Instant) {
        self.cancel_movement();
        self.controller.set_state(AnimationState::Sleep, now);
    }

    /// No-op unless currently asleep
    pub fn wake_up(&mut self, now: Instant) {
        if self.controller.state() == AnimationState::Sleep {
            self.controller.set_state(AnimationState::Idle, now);
        }
    }

    fn cancel_movement(&mut self) {
        self.target = None;
    }

    fn update_movement(&mut self, dt: f32, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let delta = target - self.pos;
        let distance = delta.length();

        if distance < ARRIVAL_THRESHOLD {
            self.pos = target;
            self.cancel_movement();
            self.controller.set_state(AnimationState::Idle, now);
            return;
        }

        let step = (MOVE_SPEED * dt / distance).min(1.0);
        self.pos += delta * step;
    }

    fn check_idle_action(&mut self, now: Instant) {
        match self.next_idle_action {
            Some(at) if now < at => return,
            // First roll after becoming idle just schedules the next one
            None => {
                self.schedule_next_idle_action(now);
                return;
            }
            Some(_) => {}
        }
        self.schedule_next_idle_action(now);

        if self.controller.state() == AnimationState::Sit {
            match self.rng.random_range(0..4) {
                0 | 1 => self.controller.set_state(AnimationState::Idle, now),
                2 => self.wander(now),
                _ => {} // stay seated
            }
            return;
        }

        match self.rng.random_range(0..15) {
            0..=3 => self.wander(now),
            4 => {
                if let Some(home) = self.home {
                    self.move_to(home.x, home.y, now);
                }
            }
            5 | 6 => self.controller.set_state(AnimationState::Sit, now),
            7 => {
                self.looking_around = true;
                self.look_end = now + Duration::from_millis(self.rng.random_range(500..1500));
                self.facing_right = !self.facing_right;
            }
            8 => self.controller.play_once(AnimationState::Play, now),
            9 => self.controller.play_once(AnimationState::Happy, now),
            _ => {} // keep idling
        }
    }

    /// Short random walk near the current position
    fn wander(&mut self, now: Instant) {
        let dx = self.rng.random_range(-0.15..0.15f32);
        let dy = self.rng.random_range(-0.05..0.05f32);
        let (x, y) = (self.pos.x + dx, self.pos.y + dy);
        self.move_to(x, y, now);
    }

    fn schedule_next_idle_action(&mut self, now: Instant) {
        let span = (IDLE_ACTION_MAX - IDLE_ACTION_MIN).as_millis() as u64;
        let wait = IDLE_ACTION_MIN + Duration::from_millis(self.rng.random_range(0..=span));
        self.next_idle_action = Some(now + wait);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::animation::default_animations;
    use rand::SeedableRng;

    fn behavior(seed: u64) -> PetBehavior {
        PetBehavior::new(
            AnimationController::new(default_animations()),
            SmallRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn move_to_walks_and_arrives() {
        let mut b = behavior(7);
        let t0 = Instant::now();
        b.set_position(0.5, 0.7);
        b.move_to(0.8, 0.5, t0);
        assert_eq!(b.controller().state(), AnimationState::Walk);
        assert!(b.facing_right());

        // Integrate well past the travel time at a fixed step
        let mut now = t0;
        for _ in 0..200 {
            now += Duration::from_millis(33);
            b.update(0.033, now);
        }

        assert!(b.target().is_none(), "target cleared on arrival");
        assert_eq!(b.controller().state(), AnimationState::Idle);
        assert!((b.position().x - 0.8).abs() < ARRIVAL_THRESHOLD);
        assert!((b.position().y - 0.5).abs() < ARRIVAL_THRESHOLD);
    }

    #[test]
    fn out_of_range_target_is_clamped() {
        let mut b = behavior(7);
        let t0 = Instant::now();
        b.move_to(5.0, -3.0, t0);
        let target = b.target().unwrap();
        assert_eq!(target.x, X_RANGE.1);
        assert_eq!(target.y, Y_RANGE.0);
    }

    #[test]
    fn facing_follows_movement_direction() {
        let mut b = behavior(7);
        let t0 = Instant::now();
        b.set_position(0.5, 0.7);
        b.move_to(0.2, 0.7, t0);
        assert!(!b.facing_right());
        b.move_to(0.85, 0.7, t0);
        assert!(b.facing_right());
    }

    #[test]
    fn reactions_cancel_movement() {
        let mut b = behavior(7);
        let t0 = Instant::now();
        b.move_to(0.8, 0.8, t0);
        assert!(b.target().is_some());

        b.on_feed(t0);
        assert!(b.target().is_none());
        assert_eq!(b.controller().state(), AnimationState::Eat);
    }

    #[test]
    fn wake_up_only_applies_when_asleep() {
        let mut b = behavior(7);
        let t0 = Instant::now();
        b.on_pet(t0);
        assert_eq!(b.controller().state(), AnimationState::Happy);
        b.wake_up(t0);
        // Not asleep: state untouched
        assert_eq!(b.controller().state(), AnimationState::Happy);

        b.sleep(t0);
        assert_eq!(b.controller().state(), AnimationState::Sleep);
        b.wake_up(t0);
        assert_eq!(b.controller().state(), AnimationState::Idle);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut b = behavior(seed);
            let mut now = Instant::now();
            let mut trace = Vec::new();
            for _ in 0..2000 {
                now += Duration::from_millis(33);
                b.update(0.033, now);
                trace.push((b.controller().state(), b.position()));
            }
            trace
        };
        // Same seed, same life; positions are pure f32 arithmetic
        assert_eq!(run(42).len(), run(42).len());
        let (a, b) = (run(42), run(42));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.0, y.0);
            assert_eq!(x.1, y.1);
        }
    }

    #[test]
    fn idle_rolls_eventually_do_something() {
        let mut b = behavior(3);
        let mut now = Instant::now();
        let mut saw_non_idle = false;
        for _ in 0..4000 {
            now += Duration::from_millis(33);
            b.update(0.033, now);
            if b.controller().state() != AnimationState::Idle {
                saw_non_idle = true;
                break;
            }
        }
        assert!(saw_non_idle, "pet never acted on its own");
    }

    #[test]
    fn look_around_flips_facing_back() {
        let mut b = behavior(11);
        let t0 = Instant::now();
        let before = b.facing_right();

        // Drive into a look-around directly via the private fields' public
        // effects: force the flag through many idle rolls is flaky, so
        // emulate the timeout path instead.
        b.looking_around = true;
        b.look_end = t0 + Duration::from_millis(100);
        b.facing_right = !before;

        b.update(0.033, t0 + Duration::from_millis(200));
        assert!(!b.is_looking_around());
        assert_eq!(b.facing_right(), before);
    }
}
