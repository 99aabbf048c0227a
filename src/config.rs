//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/hyprcascade/config.json`.  The top-level schema uses
//! one key per engine so the file can be extended with additional
//! sections later without breaking backward compatibility.
//!
//! # Example
//!
//! ```json
//! {
//!   "cascade": {
//!     "base_x": 300,
//!     "base_y": 100,
//!     "step": 30,
//!     "max_cascade": 10
//!   },
//!   "span": {
//!     "bar_height": 86,
//!     "drift_tolerance": 43
//!   }
//! }
//! ```

use crate::cascade::CascadeConfig;
use crate::span::SpanConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional — a minimal `{}` file is valid and all
/// sections fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cascade placement settings.
    #[serde(default)]
    pub cascade: CascadeConfig,

    /// Span toggle settings.
    #[serde(default)]
    pub span: SpanConfig,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "cascade": {
                "base_x": 200,
                "base_y": 50,
                "step": 40,
                "max_cascade": 8,
                "place_width": 1200,
                "place_height": 800
            },
            "span": {
                "bar_height": 60,
                "restore_offset": 2,
                "drift_tolerance": 30
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cascade.base_x, 200);
        assert_eq!(cfg.cascade.base_y, 50);
        assert_eq!(cfg.cascade.step, 40);
        assert_eq!(cfg.cascade.max_cascade, 8);
        assert_eq!(cfg.cascade.place_width, 1200);
        assert_eq!(cfg.cascade.place_height, 800);
        assert_eq!(cfg.span.bar_height, 60);
        assert_eq!(cfg.span.restore_offset, 2);
        assert_eq!(cfg.span.drift_tolerance, 30);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        let cd = CascadeConfig::default();
        assert_eq!(cfg.cascade.base_x, cd.base_x);
        assert_eq!(cfg.cascade.base_y, cd.base_y);
        assert_eq!(cfg.cascade.step, cd.step);
        assert_eq!(cfg.cascade.max_cascade, cd.max_cascade);
        assert_eq!(cfg.cascade.min_width, cd.min_width);
        assert_eq!(cfg.cascade.min_height, cd.min_height);
        let sd = SpanConfig::default();
        assert_eq!(cfg.span.bar_height, sd.bar_height);
        assert_eq!(cfg.span.restore_offset, sd.restore_offset);
        assert_eq!(cfg.span.drift_tolerance, sd.drift_tolerance);
    }

    #[test]
    fn deserialize_partial_cascade() {
        let json = r#"{ "cascade": { "step": 50 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cascade.step, 50);
        assert_eq!(cfg.cascade.base_x, CascadeConfig::default().base_x);
    }

    #[test]
    fn deserialize_partial_span() {
        let json = r#"{ "span": { "drift_tolerance": 10 } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.span.drift_tolerance, 10);
        assert_eq!(cfg.span.bar_height, SpanConfig::default().bar_height);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "cascade": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }
}
