//! End-to-end engine tests over the public handle: platform-style
//! lifecycle callbacks in, presented frames out. These use the real render
//! thread and real time, so assertions are deliberately coarse.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use wallpet::config::Config;
use wallpet::engine::WallpaperEngine;
use wallpet::engine::surface::FramebufferSurface;
use wallpet::engine::touch::{PointerEvent, PointerPhase};

fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.pet.seed = Some(1);
    // Midday: no bedtime trips during the test
    cfg.general.hour_override = Some(13);
    cfg
}

fn counting_surface(width: u32, height: u32) -> (FramebufferSurface, Arc<AtomicU64>) {
    let presented = Arc::new(AtomicU64::new(0));
    let mut fb = FramebufferSurface::new(width, height);
    let counter = Arc::clone(&presented);
    fb.set_present_hook(Box::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    (fb, presented)
}

fn wait_for(presented: &AtomicU64, at_least: u64, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if presented.load(Ordering::SeqCst) >= at_least {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn lifecycle_drives_frames() {
    let (fb, presented) = counting_surface(64, 64);
    let engine = WallpaperEngine::new(&test_config(), Box::new(fb));

    // No frames before the surface is visible
    engine.surface_created();
    engine.surface_changed(64, 64);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(presented.load(Ordering::SeqCst), 0);

    engine.visibility_changed(true);
    assert!(
        wait_for(&presented, 3, Duration::from_secs(2)),
        "no frames presented after becoming visible"
    );

    // Hiding stops the loop
    engine.visibility_changed(false);
    std::thread::sleep(Duration::from_millis(150));
    let frozen = presented.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(presented.load(Ordering::SeqCst), frozen);

    // Visible again: frames resume
    engine.visibility_changed(true);
    assert!(wait_for(&presented, frozen + 2, Duration::from_secs(2)));

    engine.surface_destroyed();
    engine.shutdown();
}

#[test]
fn destroyed_surface_stops_presenting() {
    let (fb, presented) = counting_surface(64, 64);
    let engine = WallpaperEngine::new(&test_config(), Box::new(fb));

    engine.surface_created();
    engine.surface_changed(64, 64);
    engine.visibility_changed(true);
    assert!(wait_for(&presented, 2, Duration::from_secs(2)));

    engine.surface_destroyed();
    std::thread::sleep(Duration::from_millis(150));
    let frozen = presented.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(presented.load(Ordering::SeqCst), frozen);

    engine.shutdown();
}

#[test]
fn gestures_reach_the_listener() {
    let (fb, presented) = counting_surface(128, 128);
    let gestures = Arc::new(AtomicU64::new(0));
    let seen = Arc::clone(&gestures);
    let engine = WallpaperEngine::with_gesture_listener(
        &test_config(),
        Box::new(fb),
        Some(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })),
    );

    engine.surface_created();
    engine.surface_changed(128, 128);
    engine.visibility_changed(true);
    assert!(wait_for(&presented, 1, Duration::from_secs(2)));

    let now = Instant::now();
    engine.pointer_event(PointerEvent::new(PointerPhase::Down, 64.0, 64.0, now));
    engine.pointer_event(PointerEvent::new(
        PointerPhase::Up,
        64.0,
        64.0,
        now + Duration::from_millis(40),
    ));

    assert!(
        wait_for(&gestures, 1, Duration::from_secs(2)),
        "tap never reached the gesture listener"
    );

    engine.surface_destroyed();
    engine.shutdown();
}

#[test]
fn shutdown_joins_cleanly_mid_lifecycle() {
    let (fb, _) = counting_surface(64, 64);
    let engine = WallpaperEngine::new(&test_config(), Box::new(fb));
    engine.surface_created();
    engine.surface_changed(64, 64);
    engine.visibility_changed(true);

    // Posting to a live thread succeeds
    assert!(engine.pointer_event(PointerEvent::new(
        PointerPhase::Down,
        10.0,
        10.0,
        Instant::now(),
    )));

    let lifecycle = Arc::clone(engine.lifecycle());
    engine.shutdown();

    // The shared lifecycle state outlives the thread
    assert!(lifecycle.can_draw());
    lifecycle.on_surface_destroyed();
    assert!(!lifecycle.can_draw());
}
