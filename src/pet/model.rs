//! Pet catalog data model
//!
//! Read-only inputs to the engine: which creature is on screen, how grown
//! it is, and its long-term disposition. These are owned and persisted by
//! the companion app; the wallpaper only observes them.

use serde::Deserialize;

/// Species of the on-screen pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Cat,
    Dog,
    Bird,
    Rabbit,
}

impl PetType {
    /// Coat/color variation names, indexed by the variation number
    pub fn variations(self) -> &'static [&'static str] {
        match self {
            Self::Cat => &["black", "calico", "white"],
            Self::Dog => &["brown", "black", "white"],
            Self::Bird => &["yellow", "blue", "white"],
            Self::Rabbit => &["white", "brown", "gray"],
        }
    }

    pub const ALL: [Self; 4] = [Self::Cat, Self::Dog, Self::Bird, Self::Rabbit];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Dog => "dog",
            Self::Bird => "bird",
            Self::Rabbit => "rabbit",
        }
    }
}

/// Growth stage; advances with focus-session XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum GrowthStage {
    #[default]
    Baby,
    Teen,
    Adult,
}

/// XP needed to reach Teen
pub const XP_TO_TEEN: u32 = 100;
/// XP needed to reach Adult
pub const XP_TO_ADULT: u32 = 300;

/// Long-term disposition, drifting slowly with interaction history.
/// Every trait is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Personality {
    pub energy: f32,
    pub calmness: f32,
    pub playfulness: f32,
    pub sociability: f32,
    pub routine: f32,
}

impl Personality {
    /// Build a personality, clamping every trait into [0, 1]
    pub fn new(
        energy: f32,
        calmness: f32,
        playfulness: f32,
        sociability: f32,
        routine: f32,
    ) -> Self {
        Self {
            energy: energy.clamp(0.0, 1.0),
            calmness: calmness.clamp(0.0, 1.0),
            playfulness: playfulness.clamp(0.0, 1.0),
            sociability: sociability.clamp(0.0, 1.0),
            routine: routine.clamp(0.0, 1.0),
        }
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5, 0.5)
    }
}

/// A pet as the companion app persists it
#[derive(Debug, Clone)]
pub struct Pet {
    pub pet_type: PetType,
    pub variation: usize,
    pub name: String,
    pub growth_stage: GrowthStage,
    pub growth_xp: u32,
    pub personality: Personality,
}

impl Pet {
    pub fn new(pet_type: PetType, variation: usize, name: impl Into<String>) -> Self {
        Self {
            pet_type,
            variation: variation.min(pet_type.variations().len().saturating_sub(1)),
            name: name.into(),
            growth_stage: GrowthStage::Baby,
            growth_xp: 0,
            personality: Personality::default(),
        }
    }

    /// Progress toward the next growth stage, 0..=1. The fields come from
    /// the external repository, so stage and XP may disagree; the ratio is
    /// saturated and clamped rather than trusted.
    pub fn growth_progress(&self) -> f32 {
        let progress = match self.growth_stage {
            GrowthStage::Baby => self.growth_xp as f32 / XP_TO_TEEN as f32,
            GrowthStage::Teen => {
                self.growth_xp.saturating_sub(XP_TO_TEEN) as f32
                    / (XP_TO_ADULT - XP_TO_TEEN) as f32
            }
            GrowthStage::Adult => 1.0,
        };
        progress.clamp(0.0, 1.0)
    }

    pub fn can_evolve(&self) -> bool {
        match self.growth_stage {
            GrowthStage::Baby => self.growth_xp >= XP_TO_TEEN,
            GrowthStage::Teen => self.growth_xp >= XP_TO_ADULT,
            GrowthStage::Adult => false,
        }
    }
}
