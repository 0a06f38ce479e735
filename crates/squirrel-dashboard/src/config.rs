//! Dashboard configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) gives the stock
//! dashboard:
//!
//! ```toml
//! scale_mode = "fixed"
//!
//! [opacity.bars]
//! neutral = 0.85
//! highlighted = 0.95
//! dimmed = 0.12
//!
//! [viewport]
//! width = 800.0
//! height = 600.0
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use squirrel_core::Emphasis;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("opacity {field} must be within 0..=1, got {value}")]
    InvalidOpacity { field: String, value: f64 },

    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("unknown scale mode '{0}' (expected fixed or dynamic)")]
    UnknownScaleMode(String),
}

/// Butterfly chart x-scale policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Symmetric domain from the full dataset maximum; stable across filters.
    #[default]
    Fixed,
    /// Domain from the currently plotted counts.
    Dynamic,
}

impl ScaleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Fixed => "fixed",
            ScaleMode::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(ScaleMode::Fixed),
            "dynamic" => Ok(ScaleMode::Dynamic),
            _ => Err(ConfigError::UnknownScaleMode(s.to_string())),
        }
    }
}

/// Opacity per emphasis level for one kind of mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityLevels {
    pub neutral: f64,
    pub highlighted: f64,
    pub dimmed: f64,
}

impl OpacityLevels {
    pub const fn new(neutral: f64, highlighted: f64, dimmed: f64) -> Self {
        Self {
            neutral,
            highlighted,
            dimmed,
        }
    }

    pub fn for_emphasis(&self, emphasis: Emphasis) -> f64 {
        match emphasis {
            Emphasis::Neutral => self.neutral,
            Emphasis::Highlighted => self.highlighted,
            Emphasis::Dimmed => self.dimmed,
        }
    }

    fn validate(&self, mark: &str) -> Result<(), ConfigError> {
        for (level, value) in [
            ("neutral", self.neutral),
            ("highlighted", self.highlighted),
            ("dimmed", self.dimmed),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidOpacity {
                    field: format!("{mark}.{level}"),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityScheme {
    /// Butterfly bars.
    pub bars: OpacityLevels,
    /// Legend swatches of both charts.
    pub legend: OpacityLevels,
    pub lines: OpacityLevels,
    pub dots: OpacityLevels,
    /// Map points; `highlighted` applies to brushed points.
    pub points: OpacityLevels,
}

impl Default for OpacityScheme {
    fn default() -> Self {
        Self {
            bars: OpacityLevels::new(0.85, 0.95, 0.12),
            legend: OpacityLevels::new(1.0, 1.0, 0.12),
            lines: OpacityLevels::new(0.8, 0.9, 0.1),
            dots: OpacityLevels::new(0.7, 0.8, 0.1),
            points: OpacityLevels::new(0.7, 1.0, 0.15),
        }
    }
}

/// Screen size the map projector fits the sightings into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub scale_mode: ScaleMode,
    pub opacity: OpacityScheme,
    pub viewport: Viewport,
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.opacity.bars.validate("bars")?;
        self.opacity.legend.validate("legend")?;
        self.opacity.lines.validate("lines")?;
        self.opacity.dots.validate("dots")?;
        self.opacity.points.validate("points")?;
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(())
    }
}
