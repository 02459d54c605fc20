use crate::pet::model::PetType;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Top-level configuration for wallpet
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub pet: PetConfig,

    #[serde(default)]
    pub nest: NestConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

/// General engine settings
#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Directory holding the sprite sheet PNGs. None = placeholder pets.
    pub asset_dir: Option<String>,

    /// Log a one-line state summary once a second while drawing
    #[serde(default)]
    pub debug_overlay: bool,

    /// Fix the hour of day instead of sampling the wall clock.
    /// Handy for previewing the night scene at noon.
    pub hour_override: Option<u32>,
}

/// Which pet lives on the wallpaper
#[derive(Debug, Deserialize, Clone)]
pub struct PetConfig {
    /// Species (default: "cat")
    #[serde(default = "default_pet_type", rename = "type")]
    pub pet_type: PetType,

    /// Coat variation index (default: 0)
    #[serde(default)]
    pub variation: usize,

    /// Behavior RNG seed. Unset = seeded from entropy; set it to replay
    /// the same autonomous behavior sequence.
    pub seed: Option<u64>,

    /// Pet-specific options (passed through to future sprite packs)
    #[serde(default)]
    pub options: HashMap<String, toml::Value>,
}

/// Where the nest sits, in world coordinates
#[derive(Debug, Deserialize, Clone)]
pub struct NestConfig {
    #[serde(default = "default_nest_x")]
    pub x: f32,

    #[serde(default = "default_nest_y")]
    pub y: f32,
}

/// Headless preview settings
#[derive(Debug, Deserialize, Clone)]
pub struct PreviewConfig {
    /// Simulated screen size (default: 1080x1920)
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Export every Nth presented frame as a PNG (default: 10)
    #[serde(default = "default_frame_every")]
    pub frame_every: u64,

    /// Directory the exported frames land in (default: "frames")
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

// Default value functions
fn default_pet_type() -> PetType {
    PetType::Cat
}
fn default_nest_x() -> f32 {
    0.85
}
fn default_nest_y() -> f32 {
    0.85
}
fn default_width() -> u32 {
    1080
}
fn default_height() -> u32 {
    1920
}
fn default_frame_every() -> u64 {
    10
}
fn default_out_dir() -> String {
    "frames".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            asset_dir: None,
            debug_overlay: false,
            hour_override: None,
        }
    }
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            pet_type: default_pet_type(),
            variation: 0,
            seed: None,
            options: HashMap::new(),
        }
    }
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            x: default_nest_x(),
            y: default_nest_y(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_every: default_frame_every(),
            out_dir: default_out_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
