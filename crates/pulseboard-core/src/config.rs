//! pulseboard.toml configuration parser.
//!
//! Every section is optional; missing keys take the defaults below.
//!
//! ```toml
//! [display]
//! refresh_hz = 60
//! width = 1280.0
//! height = 720.0
//! pixel_ratio = 1.0
//!
//! [grid]
//! columns = 4
//! gap = 16.0
//! card_height = 110.0
//!
//! [latency]
//! window = 360
//!
//! [overlay]
//! log_interval_ms = 1000
//!
//! [[metrics]]
//! id = "speed"
//! label = "Speed"
//! unit = "km/h"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::MetricCatalog;
use crate::error::{ConfigError, ConfigResult};
use crate::types::MetricDescriptor;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub display: DisplayConfig,
    pub grid: GridConfig,
    pub latency: LatencyConfig,
    pub overlay: OverlayConfig,
    /// Catalog override. Empty means the built-in catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Frame cadence of both the ingest and the render loop.
    pub refresh_hz: u32,
    /// Viewport width in CSS-like logical pixels.
    pub width: f64,
    pub height: f64,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            width: 1280.0,
            height: 720.0,
            pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u32,
    /// Spacing between cards and around the grid edge.
    pub gap: f64,
    pub card_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            gap: 16.0,
            card_height: 110.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LatencyConfig {
    /// Number of latency samples retained for quantiles.
    pub window: usize,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self { window: 360 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// How often the overlay logs the latest debug report.
    pub log_interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            log_interval_ms: 1000,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.display.refresh_hz == 0 || self.display.refresh_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "display.refresh_hz must be in 1..=1000, got {}",
                self.display.refresh_hz
            )));
        }
        let finite_positive = |v: f64| v.is_finite() && v > 0.0;
        if !(finite_positive(self.display.width) && finite_positive(self.display.height)) {
            return Err(ConfigError::Invalid(
                "display.width and display.height must be finite and positive".to_string(),
            ));
        }
        if !finite_positive(self.display.pixel_ratio) {
            return Err(ConfigError::Invalid(
                "display.pixel_ratio must be positive".to_string(),
            ));
        }
        if self.grid.columns == 0 {
            return Err(ConfigError::Invalid("grid.columns must be at least 1".to_string()));
        }
        if !(self.grid.gap.is_finite() && self.grid.gap >= 0.0)
            || !finite_positive(self.grid.card_height)
        {
            return Err(ConfigError::Invalid(
                "grid.gap must be >= 0 and grid.card_height > 0".to_string(),
            ));
        }
        let columns = self.grid.columns as f64;
        let card_width = (self.display.width - self.grid.gap * (columns + 1.0)) / columns;
        if !(card_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{} columns with gap {} leave no room for cards in width {}",
                self.grid.columns, self.grid.gap, self.display.width
            )));
        }
        if self.latency.window == 0 {
            return Err(ConfigError::Invalid("latency.window must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The catalog this config describes.
    pub fn catalog(&self) -> ConfigResult<MetricCatalog> {
        if self.metrics.is_empty() {
            return Ok(MetricCatalog::builtin());
        }
        Ok(MetricCatalog::new(self.metrics.clone())?)
    }
}
