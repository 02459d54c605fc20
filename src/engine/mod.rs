//! Engine orchestration
//!
//! [`WallpaperEngine`] is the handle the platform layer talks to. Lifecycle
//! callbacks flip atomics in [`SurfaceLifecycle`] directly (so the render
//! thread sees them without queue latency), then post an [`EngineEvent`] for
//! anything that touches mutable engine state. [`EngineCore`] owns all of
//! that state and runs on the render thread, driven by the event queue and
//! the self-rescheduling draw tick.

pub mod offset;
pub mod scheduler;
pub mod surface;
pub mod thread;
pub mod touch;

use crate::config::Config;
use crate::engine::offset::PageOffsets;
use crate::engine::scheduler::{FrameScheduler, RenderState};
use crate::engine::surface::{SurfaceLifecycle, WallpaperSurface};
use crate::engine::thread::{RenderThread, TickSchedule};
use crate::engine::touch::{Gesture, PointerEvent, TouchTracker};
use crate::pet::animation::{AnimationController, AnimationState, default_animations};
use crate::pet::behavior::PetBehavior;
use crate::pet::daynight;
use crate::pet::model::{GrowthStage, PetType};
use crate::render::background::BackgroundRenderer;
use crate::render::effects::EffectRenderer;
use crate::render::nest::NestRenderer;
use crate::render::pet::{PetFrame, PetRenderer};
use glam::Vec2;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// How close (world units) to the nest the pet must get before a bedtime
/// trip ends in sleep
const NEST_SLEEP_RADIUS: f32 = 0.05;

/// How often the day/night rhythm is re-evaluated
const RHYTHM_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Everything the platform layer can ask of the engine. Lifecycle atomics
/// are updated before these are posted; the variants carry the rest.
#[derive(Debug, Clone, Copy)]
pub enum EngineEvent {
    /// (Re)start the draw loop if the surface is drawable
    StartLoop,
    /// Stop the draw loop and forget frame timing
    StopLoop,
    /// The backing store changed size
    SurfaceChanged { width: u32, height: u32 },
    /// Raw pointer input
    Pointer(PointerEvent),
    /// Launcher page scroll
    OffsetsChanged {
        x_offset: f32,
        y_offset: f32,
        x_step: f32,
        y_step: f32,
    },
    /// Switch the displayed pet
    SetPet { pet_type: PetType, variation: usize },
    /// The companion app reports a (possibly advanced) growth stage
    SetGrowthStage(GrowthStage),
    /// A focus session started or ended
    SetFocusing(bool),
    /// Move the nest / home point
    SetHome { x: f32, y: f32 },
}

/// Callback invoked on the render thread for every classified gesture
pub type GestureListener = Box<dyn FnMut(&Gesture) + Send>;

/// All mutable engine state. Lives on the render thread; everything else
/// reaches it through [`EngineEvent`]s.
pub struct EngineCore {
    lifecycle: Arc<SurfaceLifecycle>,
    loop_running: Arc<AtomicBool>,
    surface: Box<dyn WallpaperSurface>,
    scheduler: FrameScheduler,
    tick: TickSchedule,
    offsets: PageOffsets,
    touch: TouchTracker,
    behavior: PetBehavior,
    background: BackgroundRenderer,
    nest: NestRenderer,
    pet_renderer: PetRenderer,
    effects: EffectRenderer,
    growth_stage: GrowthStage,
    focusing: bool,
    going_to_nest: bool,
    last_rhythm_check: Option<Instant>,
    asset_dir: Option<PathBuf>,
    hour_override: Option<u32>,
    debug_overlay: bool,
    gesture_listener: Option<GestureListener>,
}

impl EngineCore {
    pub fn new(
        config: &Config,
        surface: Box<dyn WallpaperSurface>,
        lifecycle: Arc<SurfaceLifecycle>,
        loop_running: Arc<AtomicBool>,
        gesture_listener: Option<GestureListener>,
    ) -> Self {
        let rng = match config.pet.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut behavior = PetBehavior::new(AnimationController::new(default_animations()), rng);

        let mut nest = NestRenderer::new();
        nest.set_position(config.nest.x, config.nest.y);
        behavior.set_home(nest.nest_x(), nest.nest_y());

        let asset_dir = config.general.asset_dir.as_ref().map(PathBuf::from);
        let mut pet_renderer = PetRenderer::new(config.pet.pet_type, config.pet.variation);
        pet_renderer.load_sprite(
            config.pet.pet_type,
            config.pet.variation,
            asset_dir.as_deref(),
        );

        Self {
            lifecycle,
            loop_running,
            surface,
            scheduler: FrameScheduler::new(),
            tick: TickSchedule::new(),
            offsets: PageOffsets::new(),
            touch: TouchTracker::new(),
            behavior,
            background: BackgroundRenderer::new(),
            nest,
            pet_renderer,
            effects: EffectRenderer::new(),
            growth_stage: GrowthStage::Baby,
            focusing: false,
            going_to_nest: false,
            last_rhythm_check: None,
            asset_dir,
            hour_override: config.general.hour_override,
            debug_overlay: config.general.debug_overlay,
            gesture_listener,
        }
    }

    pub fn behavior(&self) -> &PetBehavior {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut PetBehavior {
        &mut self.behavior
    }

    pub fn render_state(&self) -> RenderState {
        self.scheduler.state()
    }

    pub fn is_loop_running(&self) -> bool {
        self.loop_running.load(Ordering::Acquire)
    }

    /// How long the event loop may block before the next draw tick
    pub fn tick_timeout(&self, now: Instant) -> Option<Duration> {
        self.tick.timeout(now)
    }

    fn hour(&self) -> u32 {
        self.hour_override.unwrap_or_else(daynight::current_hour)
    }

    pub fn handle_event(&mut self, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::StartLoop => self.try_start_loop(now),
            EngineEvent::StopLoop => self.stop_loop(),
            EngineEvent::SurfaceChanged { width, height } => {
                self.surface.resize(width, height);
                self.try_start_loop(now);
            }
            EngineEvent::Pointer(pointer) => {
                self.scheduler.on_interaction(now);
                if let Some(gesture) = self.touch.handle(pointer) {
                    self.dispatch_gesture(gesture, now);
                }
            }
            EngineEvent::OffsetsChanged {
                x_offset,
                y_offset,
                x_step,
                y_step,
            } => {
                self.offsets
                    .on_offsets_changed(x_offset, y_offset, x_step, y_step);
            }
            EngineEvent::SetPet {
                pet_type,
                variation,
            } => {
                self.pet_renderer
                    .load_sprite(pet_type, variation, self.asset_dir.as_deref());
            }
            EngineEvent::SetGrowthStage(stage) => self.on_growth_changed(stage, now),
            EngineEvent::SetFocusing(focusing) => self.on_focus_changed(focusing, now),
            EngineEvent::SetHome { x, y } => {
                self.nest.set_position(x, y);
                self.behavior.set_home(self.nest.nest_x(), self.nest.nest_y());
            }
        }
    }

    /// Start the draw loop if the surface is drawable and it is not already
    /// running. Rapid visibility flapping funnels through the CAS so only
    /// one loop ever exists.
    fn try_start_loop(&mut self, now: Instant) {
        if !self.lifecycle.can_draw() {
            return;
        }
        if self
            .loop_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        debug!("draw loop started");
        self.scheduler.reset_time();
        self.tick.post_now(now);
    }

    fn stop_loop(&mut self) {
        if self.loop_running.swap(false, Ordering::AcqRel) {
            debug!("draw loop stopped");
        }
        self.tick.remove();
        self.scheduler.reset_time();
    }

    /// Fire the draw tick if it is due. Each tick re-schedules the next at
    /// the scheduler's current interval; the chain breaks as soon as the
    /// surface is not drawable.
    pub fn run_tick(&mut self, now: Instant) {
        if !self.tick.due(now) {
            return;
        }
        self.tick.remove();

        if !self.lifecycle.can_draw() {
            if self.loop_running.swap(false, Ordering::AcqRel) {
                debug!("draw loop stopped: surface not drawable");
            }
            self.scheduler.reset_time();
            return;
        }

        self.scheduler.check_active_timeout(now);
        self.draw_frame(now);
        self.tick.post_delayed(now, self.scheduler.frame_interval());
    }

    fn draw_frame(&mut self, now: Instant) {
        if !self.lifecycle.try_start_drawing() {
            return;
        }
        let dt = self.scheduler.calculate_delta_time(now);
        self.advance_simulation(dt, now);
        self.render(now);
        self.lifecycle.finish_drawing();
    }

    fn advance_simulation(&mut self, dt: f32, now: Instant) {
        self.check_rhythm(now);
        self.behavior.update(dt, now);

        // A bedtime trip ends in sleep only if the pet actually reached the
        // nest; an interrupted trip just ends.
        if self.going_to_nest && self.behavior.target().is_none() {
            self.going_to_nest = false;
            let nest = Vec2::new(self.nest.nest_x(), self.nest.nest_y());
            if (self.behavior.position() - nest).length() < NEST_SLEEP_RADIUS {
                self.behavior.sleep(now);
            }
        }

        match self.behavior.controller().state() {
            AnimationState::Sleep => self.scheduler.on_sleep(now),
            _ => {
                // Anything but sleep renders at least at the idle tier
                if self.scheduler.state() == RenderState::Sleep {
                    self.scheduler.on_idle(now);
                }
            }
        }
    }

    /// 1Hz day/night check: send the pet to bed late at night, wake it in
    /// the morning. Runs inside the draw tick so a suspended wallpaper
    /// checks again immediately on resume.
    fn check_rhythm(&mut self, now: Instant) {
        if let Some(last) = self.last_rhythm_check
            && now.duration_since(last) < RHYTHM_CHECK_INTERVAL
        {
            return;
        }
        self.last_rhythm_check = Some(now);

        let hour = self.hour();
        let asleep = self.behavior.controller().state() == AnimationState::Sleep;

        if daynight::should_go_to_nest(hour) && !asleep && !self.going_to_nest {
            info!("bedtime (hour {hour}): heading to the nest");
            self.going_to_nest = true;
            self.behavior
                .move_to(self.nest.nest_x(), self.nest.nest_y(), now);
        } else if asleep && daynight::should_be_awake(hour) {
            info!("morning (hour {hour}): waking up");
            self.behavior.wake_up(now);
        }

        if self.debug_overlay {
            debug!(
                "state={:?} frame={} pos=({:.2},{:.2}) render={:?} hour={hour}",
                self.behavior.controller().state(),
                self.behavior.controller().frame(),
                self.behavior.position().x,
                self.behavior.position().y,
                self.scheduler.state(),
            );
        }
    }

    fn dispatch_gesture(&mut self, gesture: Gesture, now: Instant) {
        if let Some(listener) = self.gesture_listener.as_mut() {
            listener(&gesture);
        }

        // A sleeping pet ignores everything except a (double) tap, which
        // only wakes it.
        if self.behavior.controller().state() == AnimationState::Sleep {
            if matches!(gesture, Gesture::Tap { .. } | Gesture::DoubleTap { .. }) {
                self.going_to_nest = false;
                self.behavior.wake_up(now);
            }
            return;
        }

        match gesture {
            Gesture::Tap { x, y } => {
                self.behavior.on_pet(now);
                self.effects.add_heart(x, y, now);
            }
            Gesture::LongPress { x, y } => {
                self.behavior.on_feed(now);
                self.effects.add_food(x, y, now);
            }
            Gesture::DoubleTap { x, y } => {
                self.behavior.on_play(now);
                self.effects.add_play(x, y, now);
            }
            Gesture::Swipe { end_x, end_y, .. } => {
                let (width, height) = self.lifecycle.screen_size();
                if width == 0 || height == 0 {
                    return;
                }
                let wx = self.offsets.to_world_x(end_x, width);
                let wy = self.offsets.to_world_y(end_y, height);
                // Guiding the pet overrides a bedtime trip
                self.going_to_nest = false;
                self.behavior.move_to(wx, wy, now);
            }
        }
    }

    fn on_growth_changed(&mut self, stage: GrowthStage, now: Instant) {
        if stage == self.growth_stage {
            return;
        }
        let advanced = stage > self.growth_stage;
        self.growth_stage = stage;
        if !advanced {
            return;
        }
        info!("growth stage advanced to {stage:?}");
        self.behavior
            .controller_mut()
            .play_once(AnimationState::LevelUp, now);

        let (width, height) = self.lifecycle.screen_size();
        if width > 0 && height > 0 {
            let pos = self.behavior.position();
            let sx = self.offsets.to_screen_x(pos.x, width);
            let sy = self.offsets.to_screen_y(pos.y, height);
            self.effects.add_level_up(sx, sy, now);
        }
    }

    fn on_focus_changed(&mut self, focusing: bool, now: Instant) {
        if focusing == self.focusing {
            return;
        }
        self.focusing = focusing;
        let controller = self.behavior.controller_mut();
        if focusing {
            if controller.state() != AnimationState::Sleep {
                controller.set_state(AnimationState::Focus, now);
            }
        } else if controller.state() == AnimationState::Focus {
            controller.set_state(AnimationState::Idle, now);
        }
    }

    fn render(&mut self, now: Instant) {
        let hour = self.hour();
        let growth_stage = self.growth_stage;
        let focusing = self.focusing;

        // Disjoint borrows: the canvas comes out of `surface` while the
        // renderers read the rest of the state.
        let Self {
            surface,
            offsets,
            behavior,
            background,
            nest,
            pet_renderer,
            effects,
            ..
        } = self;

        let canvas = match surface.lock() {
            Ok(canvas) => canvas,
            Err(e) => {
                warn!("skipping frame: {e}");
                return;
            }
        };
        let (width, height) = (canvas.width(), canvas.height());

        background.draw(canvas, hour, now);

        let state = behavior.controller().state();
        let sleeping = state == AnimationState::Sleep;
        nest.draw(
            canvas,
            offsets.to_screen_x(nest.nest_x(), width),
            offsets.to_screen_y(nest.nest_y(), height),
            width,
            hour,
            sleeping,
        );

        let pos = behavior.position();
        let frame = PetFrame {
            state,
            frame: behavior.controller().frame(),
            facing_right: behavior.facing_right(),
            screen_x: offsets.to_screen_x(pos.x, width),
            screen_y: offsets.to_screen_y(pos.y, height),
            growth_stage,
            focusing,
        };
        pet_renderer.draw(canvas, &frame, width, now);

        effects.draw(canvas, now);

        if let Err(e) = surface.present() {
            warn!("present failed: {e}");
        }
    }
}

/// Public handle to a running engine. Safe to call from any thread; the
/// method names mirror the platform lifecycle callbacks.
pub struct WallpaperEngine {
    thread: RenderThread,
    lifecycle: Arc<SurfaceLifecycle>,
    loop_running: Arc<AtomicBool>,
}

impl WallpaperEngine {
    pub fn new(config: &Config, surface: Box<dyn WallpaperSurface>) -> Self {
        Self::with_gesture_listener(config, surface, None)
    }

    pub fn with_gesture_listener(
        config: &Config,
        surface: Box<dyn WallpaperSurface>,
        listener: Option<GestureListener>,
    ) -> Self {
        let lifecycle = Arc::new(SurfaceLifecycle::new());
        let loop_running = Arc::new(AtomicBool::new(false));
        let core = EngineCore::new(
            config,
            surface,
            Arc::clone(&lifecycle),
            Arc::clone(&loop_running),
            listener,
        );
        Self {
            thread: RenderThread::spawn(core),
            lifecycle,
            loop_running,
        }
    }

    pub fn lifecycle(&self) -> &Arc<SurfaceLifecycle> {
        &self.lifecycle
    }

    pub fn is_loop_running(&self) -> bool {
        self.loop_running.load(Ordering::Acquire)
    }

    pub fn surface_created(&self) {
        self.lifecycle.on_surface_created();
        self.thread.post(EngineEvent::StartLoop);
    }

    pub fn surface_changed(&self, width: u32, height: u32) {
        self.lifecycle.on_surface_changed(width, height);
        self.thread.post(EngineEvent::SurfaceChanged { width, height });
    }

    pub fn surface_destroyed(&self) {
        self.lifecycle.on_surface_destroyed();
        self.thread.post(EngineEvent::StopLoop);
    }

    pub fn visibility_changed(&self, visible: bool) {
        self.lifecycle.on_visibility_changed(visible);
        self.thread.post(if visible {
            EngineEvent::StartLoop
        } else {
            EngineEvent::StopLoop
        });
    }

    pub fn offsets_changed(&self, x_offset: f32, y_offset: f32, x_step: f32, y_step: f32) {
        self.thread.post(EngineEvent::OffsetsChanged {
            x_offset,
            y_offset,
            x_step,
            y_step,
        });
    }

    /// Returns false when the render thread is no longer accepting events
    pub fn pointer_event(&self, event: PointerEvent) -> bool {
        self.thread.post(EngineEvent::Pointer(event))
    }

    pub fn set_pet(&self, pet_type: PetType, variation: usize) {
        self.thread.post(EngineEvent::SetPet {
            pet_type,
            variation,
        });
    }

    pub fn set_growth_stage(&self, stage: GrowthStage) {
        self.thread.post(EngineEvent::SetGrowthStage(stage));
    }

    pub fn set_focusing(&self, focusing: bool) {
        self.thread.post(EngineEvent::SetFocusing(focusing));
    }

    pub fn set_home(&self, x: f32, y: f32) {
        self.thread.post(EngineEvent::SetHome { x, y });
    }

    /// Stop the render thread and wait for it to exit
    pub fn shutdown(mut self) {
        self.thread.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::surface::FramebufferSurface;
    use crate::engine::touch::PointerPhase;
    use std::sync::atomic::AtomicU64;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.pet.seed = Some(7);
        config.general.hour_override = Some(13);
        config
    }

    /// Core wired to an in-memory surface with a present counter, plus a
    /// ready+visible lifecycle.
    fn test_core(config: &Config, width: u32, height: u32) -> (EngineCore, Arc<AtomicU64>) {
        let presented = Arc::new(AtomicU64::new(0));
        let mut fb = FramebufferSurface::new(width, height);
        let counter = Arc::clone(&presented);
        fb.set_present_hook(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let lifecycle = Arc::new(SurfaceLifecycle::new());
        lifecycle.on_surface_created();
        lifecycle.on_surface_changed(width, height);
        lifecycle.on_visibility_changed(true);

        let core = EngineCore::new(
            config,
            Box::new(fb),
            lifecycle,
            Arc::new(AtomicBool::new(false)),
            None,
        );
        (core, presented)
    }

    fn drive(core: &mut EngineCore, from: Instant, ticks: u32, step_ms: u64) -> Instant {
        let mut now = from;
        for _ in 0..ticks {
            now += Duration::from_millis(step_ms);
            core.run_tick(now);
        }
        now
    }

    #[test]
    fn started_loop_presents_and_reschedules() {
        let config = test_config();
        let (mut core, presented) = test_core(&config, 64, 64);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::StartLoop, t0);
        assert!(core.is_loop_running());

        drive(&mut core, t0, 10, 40);
        assert!(presented.load(Ordering::SeqCst) >= 10);
        assert!(core.tick_timeout(t0).is_some());
    }

    #[test]
    fn loop_stops_when_visibility_drops() {
        let config = test_config();
        let (mut core, presented) = test_core(&config, 64, 64);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::StartLoop, t0);
        let now = drive(&mut core, t0, 5, 40);
        let before = presented.load(Ordering::SeqCst);

        core.lifecycle.on_visibility_changed(false);
        drive(&mut core, now, 10, 40);
        assert!(!core.is_loop_running());
        assert_eq!(presented.load(Ordering::SeqCst), before);
    }

    #[test]
    fn duplicate_start_does_not_reset_a_running_loop() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 64, 64);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::StartLoop, t0);
        let now = drive(&mut core, t0, 3, 40);
        // A second start while running must be a no-op
        core.handle_event(EngineEvent::StartLoop, now);
        assert!(core.is_loop_running());
        let (mut fresh, _) = test_core(&config, 64, 64);
        fresh.handle_event(EngineEvent::StartLoop, t0);
        assert!(fresh.is_loop_running());
    }

    #[test]
    fn tap_makes_the_pet_happy_and_spawns_effects() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 200, 200);
        let t0 = Instant::now();

        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Down, 100.0, 100.0, t0)),
            t0,
        );
        let up = t0 + Duration::from_millis(50);
        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Up, 100.0, 100.0, up)),
            up,
        );

        assert_eq!(core.behavior().controller().state(), AnimationState::Happy);
        assert_eq!(core.render_state(), RenderState::Active);
        assert_eq!(core.effects.active_count(), 6);
    }

    #[test]
    fn swipe_sends_the_pet_toward_the_touch_point() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 1000, 1000);
        let t0 = Instant::now();

        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Down, 100.0, 500.0, t0)),
            t0,
        );
        let up = t0 + Duration::from_millis(150);
        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Up, 600.0, 500.0, up)),
            up,
        );

        assert_eq!(core.behavior().controller().state(), AnimationState::Walk);
        let target = core.behavior().target().unwrap();
        assert!((target.x - 0.6).abs() < 0.01);
        assert!((target.y - 0.5).abs() < 0.01);
    }

    #[test]
    fn tap_on_a_sleeping_pet_only_wakes_it() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 200, 200);
        let t0 = Instant::now();
        core.behavior_mut().sleep(t0);

        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Down, 100.0, 100.0, t0)),
            t0,
        );
        let up = t0 + Duration::from_millis(50);
        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Up, 100.0, 100.0, up)),
            up,
        );

        // Awake, but no petting reaction and no heart
        assert_eq!(core.behavior().controller().state(), AnimationState::Idle);
        assert_eq!(core.effects.active_count(), 0);
    }

    #[test]
    fn night_hours_send_the_pet_to_the_nest_and_sleep() {
        let mut config = test_config();
        config.general.hour_override = Some(23);
        let (mut core, _) = test_core(&config, 64, 64);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::StartLoop, t0);
        // Plenty of ticks to walk from the center to the nest
        drive(&mut core, t0, 400, 40);

        assert_eq!(core.behavior().controller().state(), AnimationState::Sleep);
        assert_eq!(core.render_state(), RenderState::Sleep);
        let pos = core.behavior().position();
        assert!((pos.x - core.nest.nest_x()).abs() < NEST_SLEEP_RADIUS);
    }

    #[test]
    fn corner_nest_still_ends_in_sleep() {
        // A nest configured past the walkable band clamps into it, so the
        // bedtime trip still gets within the sleep radius instead of the
        // pet stalling at the band edge all night.
        let mut config = test_config();
        config.general.hour_override = Some(23);
        config.nest.x = 0.95;
        config.nest.y = 0.95;
        let (mut core, _) = test_core(&config, 64, 64);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::StartLoop, t0);
        drive(&mut core, t0, 1000, 40);

        assert_eq!(core.behavior().controller().state(), AnimationState::Sleep);
        assert_eq!(core.render_state(), RenderState::Sleep);
    }

    #[test]
    fn morning_wakes_a_sleeping_pet() {
        let mut config = test_config();
        config.general.hour_override = Some(9);
        let (mut core, _) = test_core(&config, 64, 64);
        let t0 = Instant::now();
        core.behavior_mut().sleep(t0);

        core.handle_event(EngineEvent::StartLoop, t0);
        drive(&mut core, t0, 3, 40);
        assert_ne!(core.behavior().controller().state(), AnimationState::Sleep);
    }

    #[test]
    fn growth_advance_plays_level_up() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 200, 200);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::SetGrowthStage(GrowthStage::Teen), t0);
        assert_eq!(
            core.behavior().controller().state(),
            AnimationState::LevelUp
        );
        assert!(core.effects.active_count() > 0);

        // Reporting the same stage again must not replay it
        let later = t0 + Duration::from_secs(5);
        core.behavior_mut()
            .controller_mut()
            .set_state(AnimationState::Idle, later);
        core.handle_event(EngineEvent::SetGrowthStage(GrowthStage::Teen), later);
        assert_eq!(core.behavior().controller().state(), AnimationState::Idle);
    }

    #[test]
    fn focus_toggles_the_focus_animation() {
        let config = test_config();
        let (mut core, _) = test_core(&config, 200, 200);
        let t0 = Instant::now();

        core.handle_event(EngineEvent::SetFocusing(true), t0);
        assert_eq!(core.behavior().controller().state(), AnimationState::Focus);

        core.handle_event(EngineEvent::SetFocusing(false), t0);
        assert_eq!(core.behavior().controller().state(), AnimationState::Idle);
    }

    #[test]
    fn gesture_listener_sees_classified_gestures() {
        let config = test_config();
        let seen = Arc::new(AtomicU64::new(0));
        let seen2 = Arc::clone(&seen);

        let lifecycle = Arc::new(SurfaceLifecycle::new());
        lifecycle.on_surface_created();
        lifecycle.on_surface_changed(200, 200);
        lifecycle.on_visibility_changed(true);
        let mut core = EngineCore::new(
            &config,
            Box::new(FramebufferSurface::new(200, 200)),
            lifecycle,
            Arc::new(AtomicBool::new(false)),
            Some(Box::new(move |_| {
                seen2.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let t0 = Instant::now();
        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Down, 50.0, 50.0, t0)),
            t0,
        );
        let up = t0 + Duration::from_millis(40);
        core.handle_event(
            EngineEvent::Pointer(PointerEvent::new(PointerPhase::Up, 50.0, 50.0, up)),
            up,
        );
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
