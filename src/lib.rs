//! # wallpet
//!
//! An interactive virtual-pet live wallpaper engine. A small creature
//! lives on the wallpaper: it wanders, naps, reacts to touch (pet, feed,
//! play, guide), follows a day/night rhythm and grows over time.
//!
//! The engine is platform-agnostic. The host embeds it by implementing
//! [`engine::surface::WallpaperSurface`] over its real surface and wiring
//! lifecycle/input callbacks into [`engine::WallpaperEngine`]; the bundled
//! [`engine::surface::FramebufferSurface`] backs the headless preview mode
//! and the tests.

pub mod config;
pub mod engine;
pub mod pet;
pub mod render;
