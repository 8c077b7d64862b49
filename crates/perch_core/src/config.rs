//! Tunables for placement plus the small amount of user state the host
//! persists between sessions.
//!
//! Both types deserialize from TOML with every field optional; anything not
//! given falls back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

/// Height, in world units, every loaded asset is normalised to.
pub const STANDARD_HEIGHT: f32 = 1.5;
/// Number of candidate positions averaged by the smoothing filter.
pub const HISTORY_LEN: usize = 3;
/// A smoothed move is committed only while `distance(camera, p) / scale`
/// stays below this.
pub const MAX_JUMP_FACTOR: f32 = 20.0;
/// Floor for the shadow light's falloff range.
pub const MIN_SHADOW_DISTANCE: f32 = 0.6;
/// Shadow falloff range before the first distance measurement.
pub const INITIAL_SHADOW_DISTANCE: f32 = 0.2;
pub const SHADOW_LIGHT_INTENSITY: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub standard_height: f32,
    pub history_len: usize,
    pub max_jump_factor: f32,
    pub min_shadow_distance: f32,
    pub initial_shadow_distance: f32,
    pub shadow_light_intensity: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            standard_height: STANDARD_HEIGHT,
            history_len: HISTORY_LEN,
            max_jump_factor: MAX_JUMP_FACTOR,
            min_shadow_distance: MIN_SHADOW_DISTANCE,
            initial_shadow_distance: INITIAL_SHADOW_DISTANCE,
            shadow_light_intensity: SHADOW_LIGHT_INTENSITY,
        }
    }
}

impl PlacementConfig {
    /// Rejects values that would break the entity/filter invariants.
    pub fn validate(&self) -> Result<(), PlacementError> {
        if !(self.standard_height.is_finite() && self.standard_height > 0.0) {
            return Err(PlacementError::InvalidConfig("standard_height must be positive"));
        }
        if self.history_len == 0 {
            return Err(PlacementError::InvalidConfig("history_len must be at least 1"));
        }
        if !(self.max_jump_factor.is_finite() && self.max_jump_factor > 0.0) {
            return Err(PlacementError::InvalidConfig("max_jump_factor must be positive"));
        }
        if !(self.min_shadow_distance.is_finite() && self.min_shadow_distance > 0.0) {
            return Err(PlacementError::InvalidConfig("min_shadow_distance must be positive"));
        }
        Ok(())
    }
}

/// User-facing flags owned by the host and handed to the core at
/// construction.  The core reports changes through
/// `PlacementEvent::SettingsChanged`; writing them back to disk is the
/// host's job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The one-time rotate gesture tip has already been shown.
    pub has_shown_rotate_tip: bool,
}
