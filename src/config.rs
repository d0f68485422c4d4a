//! Configuration snapshot consumed by the recognition core
//!
//! The JSON file is produced by the external setup wizard. This module only
//! reads it, fills defaults for absent keys and validates the values the
//! recognition loop depends on. The snapshot is immutable once built.

use crate::buff_tracking::BuffCategory;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const MIN_UPDATE_RATE_MS: u64 = 10;
pub const MAX_UPDATE_RATE_MS: u64 = 1000;

/// Directory name that selects user-provided templates instead of bundled ones
pub const CUSTOM_RESOLUTION: &str = "custom";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Update rate {value}ms is outside the allowed range [10, 1000]")]
    UpdateRateOutOfRange { value: u64 },

    #[error("Scale factor must be positive and finite, got {value}")]
    InvalidScale { value: f32 },

    #[error("Capture region must have a non-zero size, got {width}x{height}")]
    EmptyCaptureRegion { width: u32, height: u32 },
}

/// Screen rectangle polled every cycle, in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CaptureRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureRegion {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 795,
            height: 160,
        }
    }
}

impl CaptureRegion {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Top-left screen position where the overlay is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OverlayPosition {
    pub x: i32,
    pub y: i32,
}

/// Which buff categories are recognized and drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackingFlags {
    #[serde(rename = "track_souls")]
    pub souls: bool,
    #[serde(rename = "track_necrosis")]
    pub necrosis: bool,
    #[serde(rename = "track_deathsparks")]
    pub death_sparks: bool,
}

impl Default for TrackingFlags {
    fn default() -> Self {
        Self {
            souls: true,
            necrosis: true,
            death_sparks: true,
        }
    }
}

impl TrackingFlags {
    pub fn none() -> Self {
        Self {
            souls: false,
            necrosis: false,
            death_sparks: false,
        }
    }

    pub fn is_tracked(&self, category: BuffCategory) -> bool {
        match category {
            BuffCategory::Souls => self.souls,
            BuffCategory::Necrosis => self.necrosis,
            BuffCategory::DeathSparks => self.death_sparks,
        }
    }

    /// Tracked categories in stable enumeration order
    pub fn enabled(&self) -> Vec<BuffCategory> {
        BuffCategory::ALL
            .into_iter()
            .filter(|c| self.is_tracked(*c))
            .collect()
    }
}

/// Selects the template set matching the game's resolution and UI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetProfile {
    pub resolution: String,
    #[serde(deserialize_with = "string_or_number")]
    pub windows_scaling: String,
    pub buffbar_size: String,
}

impl Default for AssetProfile {
    fn default() -> Self {
        Self {
            resolution: "reso_3840x2160".to_string(),
            windows_scaling: "150".to_string(),
            buffbar_size: "medium".to_string(),
        }
    }
}

impl AssetProfile {
    pub fn is_custom(&self) -> bool {
        self.resolution == CUSTOM_RESOLUTION
    }
}

// The wizard has written the scaling both as a number and as a dropdown string
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Immutable runtime configuration for the recognition core
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(rename = "main_roi")]
    pub capture_region: CaptureRegion,
    pub scale: f32,
    #[serde(rename = "image_position")]
    pub overlay_position: OverlayPosition,
    #[serde(rename = "update_rate")]
    pub update_rate_ms: u64,
    #[serde(flatten)]
    pub tracking: TrackingFlags,
    #[serde(flatten)]
    pub asset_profile: AssetProfile,
    #[serde(skip)]
    pub asset_root: PathBuf,
    #[serde(skip)]
    pub custom_asset_root: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            capture_region: CaptureRegion::default(),
            scale: 1.0 / 6.5,
            overlay_position: OverlayPosition::default(),
            update_rate_ms: 50,
            tracking: TrackingFlags::default(),
            asset_profile: AssetProfile::default(),
            asset_root: PathBuf::from("assets"),
            custom_asset_root: PathBuf::from("custom_assets"),
        }
    }
}

impl Configuration {
    /// Load the wizard's JSON file. A missing file yields the defaults.
    pub fn load(path: &Path, asset_root: impl Into<PathBuf>) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_json(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            log::info!("⚙️ No config at {:?}, using defaults", path);
            Self::default()
        };

        config.asset_root = asset_root.into();
        config.validate()?;
        Ok(config)
    }

    /// Parse without validation; asset roots keep their defaults
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut config: Configuration = serde_json::from_str(raw)?;
        let defaults = Self::default();
        config.asset_root = defaults.asset_root;
        config.custom_asset_root = defaults.custom_asset_root;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_UPDATE_RATE_MS..=MAX_UPDATE_RATE_MS).contains(&self.update_rate_ms) {
            return Err(ConfigError::UpdateRateOutOfRange {
                value: self.update_rate_ms,
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale { value: self.scale });
        }
        let region = &self.capture_region;
        if region.width == 0 || region.height == 0 {
            return Err(ConfigError::EmptyCaptureRegion {
                width: region.width,
                height: region.height,
            });
        }
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_rate_ms)
    }

    /// Directory holding the recognition templates for the selected profile
    pub fn template_dir(&self) -> PathBuf {
        let profile = &self.asset_profile;
        let base = if profile.is_custom() {
            self.custom_asset_root.clone()
        } else {
            self.asset_root.join(&profile.resolution)
        };
        base.join(&profile.windows_scaling)
            .join(&profile.buffbar_size)
    }

    /// Directory holding the pre-rendered overlay icons
    pub fn icon_dir(&self) -> PathBuf {
        self.asset_root.join("modular_render_assets")
    }

    /// Directory holding alert sounds
    pub fn sound_dir(&self) -> PathBuf {
        self.asset_root.clone()
    }
}
