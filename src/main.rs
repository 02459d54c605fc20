use clap::Parser;
use log::{error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use wallpet::config::Config;
use wallpet::engine::WallpaperEngine;
use wallpet::engine::surface::FramebufferSurface;
use wallpet::engine::touch::{PointerEvent, PointerPhase};
use wallpet::pet::model::PetType;

/// wallpet - an interactive virtual-pet live wallpaper engine
#[derive(Parser, Debug)]
#[command(name = "wallpet", version, about)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "~/.config/wallpet/wallpet.toml")]
    config: String,

    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Render a headless preview for this many seconds, exporting frames
    /// as PNGs
    #[arg(short, long, value_name = "SECONDS")]
    preview: Option<u64>,

    /// List available pets and variations
    #[arg(long)]
    list_pets: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("wallpet v{} starting", env!("CARGO_PKG_VERSION"));

    if cli.list_pets {
        list_pets();
        return;
    }

    let config_path = shellexpand(&cli.config);
    let cfg = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path, e);
            info!("Using default configuration");
            Config::default()
        }
    };

    let seconds = cli.preview.unwrap_or(5);
    run_preview(cfg, seconds);
}

fn list_pets() {
    println!("Available pets:");
    for pet in PetType::ALL {
        println!("  {:<8} variations: {}", pet.name(), pet.variations().join(", "));
    }
}

/// Drive the engine against an in-memory surface for a fixed wall-clock
/// span, exporting every Nth presented frame as a PNG.
fn run_preview(cfg: Config, seconds: u64) {
    let out_dir = cfg.preview.out_dir.clone();
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        error!("Failed to create output directory {out_dir}: {e}");
        std::process::exit(1);
    }

    let (width, height) = (cfg.preview.width, cfg.preview.height);
    let frame_every = cfg.preview.frame_every.max(1);

    let presented = Arc::new(AtomicU64::new(0));
    let exported = Arc::new(AtomicU64::new(0));

    let mut surface = FramebufferSurface::new(width, height);
    {
        let presented = Arc::clone(&presented);
        let exported = Arc::clone(&exported);
        let out_dir = out_dir.clone();
        surface.set_present_hook(Box::new(move |canvas| {
            let n = presented.fetch_add(1, Ordering::SeqCst);
            if n % frame_every != 0 {
                return;
            }
            let path = format!("{out_dir}/frame_{:05}.png", n);
            match canvas.image().save(&path) {
                Ok(()) => {
                    exported.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => error!("Failed to write {path}: {e}"),
            }
        }));
    }

    let engine = WallpaperEngine::new(&cfg, Box::new(surface));
    engine.surface_created();
    engine.surface_changed(width, height);
    engine.visibility_changed(true);

    info!(
        "Preview: {}x{} for {seconds}s, exporting every {frame_every} frame(s) to {out_dir}/",
        width, height
    );

    let deadline = Instant::now() + Duration::from_secs(seconds);
    let mut tapped = false;
    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));

        // One scripted tap partway in so the preview shows a reaction
        if !tapped && deadline - Instant::now() < Duration::from_secs(seconds.saturating_sub(1)) {
            tapped = true;
            let now = Instant::now();
            let (x, y) = (width as f32 / 2.0, height as f32 * 0.7);
            engine.pointer_event(PointerEvent::new(PointerPhase::Down, x, y, now));
            engine.pointer_event(PointerEvent::new(
                PointerPhase::Up,
                x,
                y,
                now + Duration::from_millis(50),
            ));
        }
    }

    engine.visibility_changed(false);
    engine.surface_destroyed();
    engine.shutdown();

    info!(
        "Preview done: {} frames presented, {} exported",
        presented.load(Ordering::SeqCst),
        exported.load(Ordering::SeqCst)
    );
}

/// Expand ~ to home directory in paths
fn shellexpand(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return format!("{}/{}", home, stripped);
    }
    path.to_string()
}
