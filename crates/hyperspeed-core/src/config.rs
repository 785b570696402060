use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec4;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// What a recycled particle's depth is reset to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecycleDepth {
    /// Respawn through the regular creation routine, random depth in `(0, width]`.
    #[default]
    Random,
    /// Respawn on the far plane, `z = width`.
    Far,
}

/// Star field tuning. Accepts both snake_case keys and the camelCase keys
/// used by host option objects; unknown keys land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    #[serde(alias = "particleCount", alias = "starCount", alias = "star_count")]
    pub particle_count: usize,
    /// Depth units subtracted per frame.
    pub speed: f32,
    /// Only used for drawing when `use_star_color` is set. Accepts
    /// `[r, g, b, a]` in `0..=1` or a CSS `rgb()`/`rgba()`/hex string.
    #[serde(alias = "starColor", deserialize_with = "deserialize_color")]
    pub star_color: Vec4,
    /// Multiplier on trail alpha.
    #[serde(alias = "trailLength")]
    pub trail_length: f32,
    /// Projection focal length.
    pub fov: f32,
    #[serde(alias = "recycleDepth")]
    pub recycle_depth: RecycleDepth,
    /// Alpha of the black overlay painted at the start of every frame.
    #[serde(alias = "fadeAlpha")]
    pub fade_alpha: f32,
    #[serde(alias = "useStarColor")]
    pub use_star_color: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 200,
            speed: 2.0,
            star_color: Vec4::new(1.0, 1.0, 1.0, 0.8),
            trail_length: 0.3,
            fov: 300.0,
            recycle_depth: RecycleDepth::Random,
            fade_alpha: 0.1,
            use_star_color: false,
            extra: BTreeMap::new(),
        }
    }
}

impl StarFieldConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&source),
            _ => Self::from_toml_str(&source),
        }
    }

    /// Reject values no frame could be drawn from. Degenerate but finite
    /// settings pass; see [`StarFieldConfig::degenerate_settings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("speed", self.speed)?;
        finite("fov", self.fov)?;
        within("trail_length", self.trail_length, 0.0, 1.0)?;
        within("fade_alpha", self.fade_alpha, 0.0, 1.0)?;
        for (field, value) in [
            ("star_color.r", self.star_color.x),
            ("star_color.g", self.star_color.y),
            ("star_color.b", self.star_color.z),
            ("star_color.a", self.star_color.w),
        ] {
            within(field, value, 0.0, 1.0)?;
        }
        Ok(())
    }

    /// Settings that keep the simulation stable but produce degenerate output.
    pub fn degenerate_settings(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        if self.particle_count == 0 {
            found.push("particle_count is zero, nothing is drawn");
        }
        if self.speed <= 0.0 {
            found.push("speed is not positive, particles never reach the viewer");
        }
        if self.fov == 0.0 {
            found.push("fov is zero, every particle projects onto the center");
        } else if self.fov < 0.0 {
            found.push("fov is negative, the projection is mirrored");
        }
        found
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Channels(Vec4),
    Css(String),
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Vec4, D::Error>
where
    D: Deserializer<'de>,
{
    match ColorInput::deserialize(deserializer)? {
        ColorInput::Channels(channels) => Ok(channels),
        ColorInput::Css(text) => parse_css_color(&text).map_err(serde::de::Error::custom),
    }
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`
/// into channels in `0..=1`. RGB components are 0-255, alpha is 0-1.
pub fn parse_css_color(text: &str) -> Result<Vec4, String> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("invalid hex color {text:?}"));
    }

    let lower = text.to_ascii_lowercase();
    let (args, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, true)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, false)
    } else {
        return Err(format!("unsupported color {text:?}"));
    };
    let args = args
        .strip_suffix(')')
        .ok_or_else(|| format!("unterminated color {text:?}"))?;

    let parts = args
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid color component in {text:?}: {err}"))?;
    match (parts.as_slice(), has_alpha) {
        ([r, g, b], false) => Ok(Vec4::new(r / 255.0, g / 255.0, b / 255.0, 1.0)),
        ([r, g, b, a], true) => Ok(Vec4::new(r / 255.0, g / 255.0, b / 255.0, *a)),
        _ => Err(format!("wrong number of components in {text:?}")),
    }
}

fn parse_hex_color(hex: &str) -> Option<Vec4> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;
    let bytes: Vec<u8> = match digits.len() {
        3 | 4 => digits.iter().map(|d| d * 17).collect(),
        6 | 8 => digits.chunks_exact(2).map(|pair| pair[0] * 16 + pair[1]).collect(),
        _ => return None,
    };
    let channel = |i: usize| bytes.get(i).map_or(1.0, |&b| b as f32 / 255.0);
    Some(Vec4::new(channel(0), channel(1), channel(2), channel(3)))
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let config = StarFieldConfig::default();
        assert_eq!(config.particle_count, 200);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.star_color, Vec4::new(1.0, 1.0, 1.0, 0.8));
        assert_eq!(config.trail_length, 0.3);
        assert_eq!(config.fov, 300.0);
        assert_eq!(config.recycle_depth, RecycleDepth::Random);
        assert_eq!(config.fade_alpha, 0.1);
        assert!(!config.use_star_color);
        assert!(config.validate().is_ok());
        assert!(config.degenerate_settings().is_empty());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = StarFieldConfig::from_toml_str(
            r#"
            particle_count = 50
            speed = 4.5
            recycle_depth = "far"
            star_color = [1.0, 0.5, 0.25, 1.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.speed, 4.5);
        assert_eq!(config.recycle_depth, RecycleDepth::Far);
        assert_eq!(config.star_color, Vec4::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(config.fov, 300.0);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn json_accepts_host_option_names_and_keeps_unknown_keys() {
        let config = StarFieldConfig::from_json_str(
            r#"{ "starCount": 12, "trailLength": 0.5, "fov": 250, "glow": true }"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.trail_length, 0.5);
        assert_eq!(config.fov, 250.0);
        assert_eq!(config.extra.get("glow"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn host_css_star_color_is_normalised() {
        let config = StarFieldConfig::from_json_str(
            r#"{ "starCount": 50, "starColor": "rgba(255, 255, 255, 0.8)" }"#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.star_color, Vec4::new(1.0, 1.0, 1.0, 0.8));

        let config = StarFieldConfig::from_toml_str(r##"star_color = "#ff8000""##).unwrap();
        assert_eq!(config.star_color, Vec4::new(1.0, 128.0 / 255.0, 0.0, 1.0));
    }

    #[test]
    fn css_color_forms() {
        assert_eq!(parse_css_color("rgb(0, 51, 255)"), Ok(Vec4::new(0.0, 0.2, 1.0, 1.0)));
        assert_eq!(parse_css_color(" RGBA(0,0,0,0.5) "), Ok(Vec4::new(0.0, 0.0, 0.0, 0.5)));
        assert_eq!(parse_css_color("#fff"), Ok(Vec4::ONE));
        assert_eq!(parse_css_color("#00000000"), Ok(Vec4::ZERO));
        assert!(parse_css_color("rgba(1, 2, 3)").is_err());
        assert!(parse_css_color("#12345").is_err());
        assert!(parse_css_color("papayawhip").is_err());
    }

    #[test]
    fn malformed_star_color_string_is_a_config_error() {
        let err = StarFieldConfig::from_json_str(r#"{ "starColor": "rgba(255, 255)" }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        // Parsed but out of range alpha is still caught by validation.
        let err = StarFieldConfig::from_json_str(r#"{ "starColor": "rgba(255, 255, 255, 2)" }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "star_color.a",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_trail_length_is_rejected() {
        let err = StarFieldConfig::from_toml_str("trail_length = 1.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "trail_length",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_speed_is_rejected() {
        let config = StarFieldConfig {
            speed: f32::NAN,
            ..StarFieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "speed", .. })
        ));
    }

    #[test]
    fn degenerate_settings_are_reported_not_rejected() {
        let config = StarFieldConfig {
            particle_count: 0,
            speed: -1.0,
            fov: 0.0,
            ..StarFieldConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.degenerate_settings().len(), 3);
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("stars.toml");
        std::fs::write(&toml_path, "speed = 3.0\n").unwrap();
        assert_eq!(StarFieldConfig::load(&toml_path).unwrap().speed, 3.0);

        let json_path = dir.path().join("stars.json");
        std::fs::write(&json_path, r#"{ "speed": 6 }"#).unwrap();
        assert_eq!(StarFieldConfig::load(&json_path).unwrap().speed, 6.0);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            StarFieldConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
