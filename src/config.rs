use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CAPACITY: usize = 2;
pub const DEFAULT_NOISE_THRESHOLD: f32 = 8.0;
pub const DEFAULT_DIRECTIONAL_THRESHOLD: f32 = 2.0;
pub const DEFAULT_TAP_THRESHOLD: f32 = 4.0;
pub const DEFAULT_SWIPE_MIN_POINTS: usize = 4;
pub const DEFAULT_RAYCAST_DISTANCE: f32 = 10.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid gesture config toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid gesture config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Orientation of the host's vertical screen axis.
///
/// Decides whether a positive `dy` reads as `Up` or `Down` for both the
/// directional move events and swipe classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAxis {
    /// `y` grows toward the top of the screen.
    #[default]
    Up,
    /// `y` grows toward the bottom of the screen.
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircleConfig {
    pub min_points: usize,
    pub max_wrong_percent: u32,
    pub max_quadrant_skew: usize,
    pub min_radius_percent: f32,
    pub max_radius_percent: f32,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            min_points: 5,
            max_wrong_percent: 25,
            max_quadrant_skew: 5,
            min_radius_percent: 45.0,
            max_radius_percent: 160.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Number of simultaneously tracked pointers; ids wrap modulo this value.
    pub capacity: usize,
    /// Minimum travel from the last recorded point before a new trajectory
    /// sample is kept.
    pub noise_threshold: f32,
    /// Per-sample delta length above which a directional move event fires.
    pub directional_threshold: f32,
    /// Largest cumulative `|dx| + |dy|` that still classifies as a tap.
    pub tap_threshold: f32,
    pub swipe_min_points: usize,
    pub raycast_distance: f32,
    pub vertical_axis: VerticalAxis,
    pub mouse_emulation: bool,
    /// Run the circle classifier as part of the release pipeline.
    pub circle_on_release: bool,
    pub circle: CircleConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            directional_threshold: DEFAULT_DIRECTIONAL_THRESHOLD,
            tap_threshold: DEFAULT_TAP_THRESHOLD,
            swipe_min_points: DEFAULT_SWIPE_MIN_POINTS,
            raycast_distance: DEFAULT_RAYCAST_DISTANCE,
            vertical_axis: VerticalAxis::Up,
            mouse_emulation: false,
            circle_on_release: false,
            circle: CircleConfig::default(),
        }
    }
}

impl GestureConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GestureConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(invalid("capacity", "must be at least 1"));
        }
        check_threshold("noise_threshold", self.noise_threshold)?;
        check_threshold("directional_threshold", self.directional_threshold)?;
        check_threshold("tap_threshold", self.tap_threshold)?;
        check_threshold("raycast_distance", self.raycast_distance)?;
        if self.swipe_min_points == 0 {
            return Err(invalid("swipe_min_points", "must be at least 1"));
        }

        let circle = &self.circle;
        // Quadrant walking needs two steps to compare.
        if circle.min_points < 3 {
            return Err(invalid("circle.min_points", "must be at least 3"));
        }
        if circle.max_wrong_percent > 100 {
            return Err(invalid("circle.max_wrong_percent", "must be within 0..=100"));
        }
        check_threshold("circle.min_radius_percent", circle.min_radius_percent)?;
        check_threshold("circle.max_radius_percent", circle.max_radius_percent)?;
        if circle.min_radius_percent >= circle.max_radius_percent {
            return Err(invalid(
                "circle.min_radius_percent",
                "must be below circle.max_radius_percent",
            ));
        }
        Ok(())
    }
}

fn check_threshold(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, "must be a finite non-negative number"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GestureConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, GestureConfig::default());
        assert_eq!(config.capacity, 2);
        assert_eq!(config.tap_threshold, 4.0);
        assert!(!config.circle_on_release);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config = GestureConfig::from_toml_str(
            r#"
            capacity = 5
            vertical_axis = "down"

            [circle]
            max_wrong_percent = 30
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.capacity, 5);
        assert_eq!(config.vertical_axis, VerticalAxis::Down);
        assert_eq!(config.circle.max_wrong_percent, 30);
        assert_eq!(config.circle.min_points, 5);
        assert_eq!(config.noise_threshold, DEFAULT_NOISE_THRESHOLD);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GestureConfig::from_toml_str("capacty = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = GestureConfig::from_toml_str("capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "capacity",
                ..
            }
        ));
    }

    #[test]
    fn negative_threshold_is_invalid() {
        let err = GestureConfig::from_toml_str("tap_threshold = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "tap_threshold",
                ..
            }
        ));
    }

    #[test]
    fn inverted_radius_band_is_invalid() {
        let err = GestureConfig::from_toml_str(
            r#"
            [circle]
            min_radius_percent = 120.0
            max_radius_percent = 80.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "circle.min_radius_percent",
                ..
            }
        ));
    }
}
