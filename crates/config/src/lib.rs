//! Shared configuration for Inkpad
//!
//! This crate provides the single source of truth for pen widths, velocity
//! filtering, colors and the default pad size, shared by the ink core and
//! the command line tool.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound on rendered pen width
pub const DEFAULT_MIN_WIDTH: f32 = 0.5;

/// Default upper bound on rendered pen width
pub const DEFAULT_MAX_WIDTH: f32 = 2.0;

/// Default weight of the newest velocity sample in the low-pass filter
pub const DEFAULT_VELOCITY_FILTER_WEIGHT: f32 = 0.7;

/// Default pen color (#555555)
pub const DEFAULT_PEN_COLOR: [f32; 4] = [GRAY_55, GRAY_55, GRAY_55, 1.0];

const GRAY_55: f32 = 0x55 as f32 / 255.0;

/// Default background color (fully transparent)
pub const DEFAULT_BACKGROUND_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Default pad width in pixels
pub const DEFAULT_WIDTH: u32 = 400;

/// Default pad height in pixels
pub const DEFAULT_HEIGHT: u32 = 250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("min_width ({min}) must not exceed max_width ({max})")]
    WidthRange { min: f32, max: f32 },
    #[error("Invalid {name}: {value}")]
    InvalidWidth { name: &'static str, value: f32 },
    #[error("velocity_filter_weight must be within [0, 1], got {0}")]
    FilterWeight(f32),
    #[error("Invalid dot size: {0}")]
    InvalidDotSize(f32),
    #[error("Invalid color {input:?}: {reason}")]
    Color { input: String, reason: String },
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the radius of a single-dot stroke is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DotSizeSetting {
    /// Midpoint of the configured width bounds
    #[default]
    Auto,
    /// Fixed radius in pixels
    Fixed(f32),
}

impl DotSizeSetting {
    /// Resolve to a radius for the given width bounds
    pub fn resolve(&self, min_width: f32, max_width: f32) -> f32 {
        match *self {
            Self::Auto => (min_width + max_width) / 2.0,
            Self::Fixed(size) => size,
        }
    }
}

/// Signature pad configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Lower bound on rendered width
    pub min_width: f32,
    /// Upper bound on rendered width (reached at zero velocity)
    pub max_width: f32,
    /// Jitter damping weight in [0, 1]
    pub velocity_filter_weight: f32,
    /// Ink color [r, g, b, a]
    pub pen_color: [f32; 4],
    /// Color applied on clear [r, g, b, a]
    pub background_color: [f32; 4],
    /// Radius used for taps
    pub dot_size: DotSizeSetting,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
            pen_color: DEFAULT_PEN_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
            dot_size: DotSizeSetting::Auto,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl PadConfig {
    /// Create a config with default pen settings and the given surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Midpoint of the width bounds, the width a stroke starts with
    pub fn mid_width(&self) -> f32 {
        (self.min_width + self.max_width) / 2.0
    }

    /// Radius used for single-dot strokes
    pub fn dot_radius(&self) -> f32 {
        self.dot_size.resolve(self.min_width, self.max_width)
    }

    /// Check the config for contract violations.
    ///
    /// Inverted width bounds are rejected rather than clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err(ConfigError::InvalidWidth {
                name: "min_width",
                value: self.min_width,
            });
        }
        if !self.max_width.is_finite() || self.max_width <= 0.0 {
            return Err(ConfigError::InvalidWidth {
                name: "max_width",
                value: self.max_width,
            });
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::WidthRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        if !(0.0..=1.0).contains(&self.velocity_filter_weight) {
            return Err(ConfigError::FilterWeight(self.velocity_filter_weight));
        }
        if let DotSizeSetting::Fixed(size) = self.dot_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(ConfigError::InvalidDotSize(size));
            }
        }
        Ok(())
    }
}

/// Parse a CSS color string ("#555", "rgba(0,0,0,0)", "navy", ...) into [r, g, b, a]
pub fn parse_color(input: &str) -> Result<[f32; 4], ConfigError> {
    let color = csscolorparser::parse(input).map_err(|e| ConfigError::Color {
        input: input.to_string(),
        reason: e.to_string(),
    })?;
    Ok(color.to_array().map(|c| c as f32))
}
