//! Tunable weights for the attack-target heuristic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Multipliers applied to a candidate's distance when ranking targets.
///
/// Lower scores win. Every factor composes multiplicatively with the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetWeights {
    /// Applied to enemy generals (default: 0.09).
    pub general: f64,
    /// City cost ratio is `city army / (city_divisor * attacker army)` (default: 3.2).
    pub city_divisor: f64,
    /// Lower clamp for the city cost ratio (default: 0.17).
    pub city_min: f64,
    /// Upper clamp for the city cost ratio (default: 20.0).
    pub city_max: f64,
    /// Applied to plain empty ground (default: 4.3).
    pub empty: f64,
    /// Scales `target army / attacker army` for stronger targets (default: 1.5).
    pub stronger: f64,
    /// Applied to swamps (default: 10.0).
    pub swamp: f64,
    /// Extra factor for swamps the local player has held (default: 20.0).
    pub held_swamp: f64,
    /// Targets above `max_army_factor * attacker + max_army_bonus` are skipped (default: 2).
    pub max_army_factor: u32,
    /// See `max_army_factor` (default: 14).
    pub max_army_bonus: u32,
    /// Scores at or above this are never picked (default: 9999.0).
    pub score_ceiling: f64,
}

impl Default for TargetWeights {
    fn default() -> Self {
        Self {
            general: 0.09,
            city_divisor: 3.2,
            city_min: 0.17,
            city_max: 20.0,
            empty: 4.3,
            stronger: 1.5,
            swamp: 10.0,
            held_swamp: 20.0,
            max_army_factor: 2,
            max_army_bonus: 14,
            score_ceiling: 9999.0,
        }
    }
}

impl TargetWeights {
    /// Largest target army worth considering for an attacker of `army`.
    #[must_use]
    pub fn max_target_army(&self, army: u32) -> u32 {
        army.saturating_mul(self.max_army_factor)
            .saturating_add(self.max_army_bonus)
    }

    /// Load weights from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
