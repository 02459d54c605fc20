//! Day/night rhythm
//!
//! Pure functions of the hour of day. The pet heads for its nest late in
//! the evening, sleeps through the night and wakes in the morning; the
//! background dims and recolors to match. Everything here is deterministic
//! given the same hour so the rhythm is trivially testable.

use crate::render::canvas::Color;
use chrono::Timelike;

/// Coarse time-of-day bucket used for sky and ground palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// 6:00-11:59
    Morning,
    /// 12:00-17:59
    Afternoon,
    /// 18:00-20:59
    Evening,
    /// 21:00-5:59
    Night,
}

const MORNING_START: u32 = 6;
const AFTERNOON_START: u32 = 12;
const EVENING_START: u32 = 18;
const NIGHT_START: u32 = 21;

/// Current local hour of day, 0..24
pub fn current_hour() -> u32 {
    chrono::Local::now().hour()
}

/// Bucket an hour into its time of day
pub fn time_of_day(hour: u32) -> TimeOfDay {
    match hour {
        h if (MORNING_START..AFTERNOON_START).contains(&h) => TimeOfDay::Morning,
        h if (AFTERNOON_START..EVENING_START).contains(&h) => TimeOfDay::Afternoon,
        h if (EVENING_START..NIGHT_START).contains(&h) => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

/// How sleepy the pet is, 0.0 (wide awake) to 1.0 (should be asleep)
pub fn sleep_pressure(hour: u32) -> f32 {
    match hour {
        23 | 0 | 1 => 0.9,
        21 | 22 => 0.6,
        2..=5 => 1.0,
        6..=8 => 0.3,
        12..=14 => 0.2,
        _ => 0.1,
    }
}

/// Whether the pet should head for its nest (22:00-5:59)
pub fn should_go_to_nest(hour: u32) -> bool {
    hour >= 22 || hour < 6
}

/// Whether the pet should be awake (7:00-21:59). Hour 6 is a grace hour:
/// neither forced awake nor sent to the nest.
pub fn should_be_awake(hour: u32) -> bool {
    (7..=21).contains(&hour)
}

/// Ambient light level, 0.0 (darkest) to 1.0 (full daylight)
pub fn ambient_brightness(hour: u32) -> f32 {
    match hour {
        10..=16 => 1.0,
        7..=9 => 0.8,
        17..=18 => 0.7,
        19..=20 => 0.5,
        21..=22 => 0.3,
        _ => 0.2,
    }
}

/// Sky gradient (top, bottom) for the time of day
pub fn sky_colors(time: TimeOfDay) -> (Color, Color) {
    match time {
        TimeOfDay::Morning => (Color::from_argb(0xFF87CEEB), Color::from_argb(0xFFFFE4B5)),
        TimeOfDay::Afternoon => (Color::from_argb(0xFF4A90D9), Color::from_argb(0xFF87CEEB)),
        TimeOfDay::Evening => (Color::from_argb(0xFFFF6B6B), Color::from_argb(0xFF4A4A6A)),
        TimeOfDay::Night => (Color::from_argb(0xFF1A1A2E), Color::from_argb(0xFF16213E)),
    }
}
