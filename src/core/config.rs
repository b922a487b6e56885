//! Configuration for level-of-detail tuning of the frustum cover
//!
//! Options can be built from presets ([`TileLodProfile`]), deserialized from
//! JSON, or assembled by hand and checked with [`TileLodOptions::validate`].

use crate::core::constants::{
    DEFAULT_TILE_LOD_MIN_RADIUS, DEFAULT_TILE_LOD_PITCH_THRESHOLD, DEFAULT_TILE_LOD_SCALE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileLodProfile {
    Balanced,
    LowQuality,
    HighQuality,
    Custom(TileLodOptions),
}

impl TileLodProfile {
    pub fn resolve(&self) -> TileLodOptions {
        match self {
            Self::Balanced => TileLodOptions {
                min_radius: DEFAULT_TILE_LOD_MIN_RADIUS,
                scale: DEFAULT_TILE_LOD_SCALE,
                pitch_threshold: DEFAULT_TILE_LOD_PITCH_THRESHOLD,
            },
            Self::LowQuality => TileLodOptions {
                min_radius: 1.0,
                scale: 2.0,
                pitch_threshold: 45_f64.to_radians(),
            },
            Self::HighQuality => TileLodOptions {
                min_radius: 5.0,
                scale: 0.5,
                pitch_threshold: 70_f64.to_radians(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for TileLodProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Level-of-detail knobs of the frustum cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLodOptions {
    /// Radius, in maximum-zoom tiles, that is always covered at full detail
    pub min_radius: f64,
    /// Distance multiplier; values above 1 drop detail closer to the center
    pub scale: f64,
    /// Camera pitch (radians) above which coarser distant tiles are allowed
    pub pitch_threshold: f64,
}

impl Default for TileLodOptions {
    fn default() -> Self {
        TileLodProfile::Balanced.resolve()
    }
}

impl TileLodOptions {
    /// Parses options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_radius.is_finite() || self.min_radius < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "min_radius must be a finite value >= 1, got {}",
                self.min_radius
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "scale must be a finite value > 0, got {}",
                self.scale
            )));
        }
        if self.pitch_threshold.is_nan() {
            return Err(Error::InvalidParameter(
                "pitch_threshold must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}
