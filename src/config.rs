//! Probe configuration
//!
//! Loaded from a TOML file, e.g.:
//!
//! ```toml
//! [motion]
//! threshold = 15
//! frame_interval_ms = 100
//!
//! [template]
//! path = "templates/dougu_to_bag.png"
//! threshold = 0.7
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::motion::DEFAULT_THRESHOLD;
use crate::template::DEFAULT_MATCH_THRESHOLD;

/// Top-level probe configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Interframe-difference settings
    #[serde(default)]
    pub motion: MotionConfig,
    /// Optional template-matching check
    #[serde(default)]
    pub template: Option<TemplateConfig>,
}

/// Settings for the interframe-difference loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Minimum per-pixel difference counted as change, 0-255.
    ///
    /// Kept as a plain integer here; the range is validated where the
    /// mask is computed, not silently clamped at load time.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Delay between loop iterations in milliseconds (0 = no pacing)
    #[serde(default = "default_interval")]
    pub frame_interval_ms: u64,
}

/// Settings for the template-matching check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Path to the reference image
    pub path: PathBuf,
    /// Minimum correlation score, 0.0-1.0
    #[serde(default = "default_match_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

fn default_interval() -> u64 {
    100 // 10 FPS, the rate the hand-held probe sampled at
}

fn default_match_threshold() -> f32 {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            frame_interval_ms: default_interval(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&text).map_err(|e| {
            ProbeError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    /// Set the difference threshold
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.motion.threshold = threshold;
        self
    }

    /// Set the inter-frame delay
    pub fn with_interval(mut self, ms: u64) -> Self {
        self.motion.frame_interval_ms = ms;
        self
    }
}
