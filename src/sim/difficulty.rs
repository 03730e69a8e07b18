//! Difficulty tiers and their reward codes
//!
//! A closed set: adding a tier means adding an enum variant and a profile
//! entry, never parsing free-form ids.

use serde::{Deserialize, Serialize};

/// Difficulty tier selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Tuning and reward data for one difficulty tier
#[derive(Debug, Clone, Copy)]
pub struct DifficultyProfile {
    /// Continuous hold time required to stabilize
    pub hold_duration_ms: u32,
    /// Scales idle drift and explosion velocity (>= 1.0)
    pub chaos_multiplier: f32,
    /// Extra explosion kick when a hold is released early
    pub release_boost: f32,
    /// Discount code revealed on completion
    pub reward_code: &'static str,
    /// Discount size in percent
    pub reward_percent: u8,
    /// Display name for the tier
    pub label: &'static str,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Static profile for this tier
    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &DifficultyProfile {
                hold_duration_ms: 3000,
                chaos_multiplier: 1.0,
                release_boost: 1.0,
                reward_code: "REACTOR10",
                reward_percent: 10,
                label: "Cadet",
            },
            Difficulty::Medium => &DifficultyProfile {
                hold_duration_ms: 5000,
                chaos_multiplier: 1.5,
                release_boost: 1.35,
                reward_code: "REACTOR15",
                reward_percent: 15,
                label: "Engineer",
            },
            Difficulty::Hard => &DifficultyProfile {
                hold_duration_ms: 8000,
                chaos_multiplier: 2.2,
                release_boost: 1.8,
                reward_code: "REACTOR25",
                reward_percent: 25,
                label: "Core Breach",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_names() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("impossible"), None);
    }

    #[test]
    fn test_profiles_scale_upward() {
        let easy = Difficulty::Easy.profile();
        let medium = Difficulty::Medium.profile();
        let hard = Difficulty::Hard.profile();

        assert!(easy.hold_duration_ms < medium.hold_duration_ms);
        assert!(medium.hold_duration_ms < hard.hold_duration_ms);
        assert!(easy.chaos_multiplier >= 1.0);
        assert!(easy.chaos_multiplier < medium.chaos_multiplier);
        assert!(medium.chaos_multiplier < hard.chaos_multiplier);
        assert!(easy.release_boost < hard.release_boost);
        assert!(easy.reward_percent < hard.reward_percent);
    }
}
