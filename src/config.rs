//! Configuration for running scenes
//!
//! Defaults can be overridden from a TOML file:
//!
//! ```toml
//! [root]
//! width = 375
//! height = 812
//!
//! [dump]
//! indent = "\t"
//! show_inactive = false
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::graph::DumpStyle;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options for executing a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Size the root of a `solve` is pinned to (width, height)
    pub root_size: (f64, f64),
    /// Formatting of `dump` output
    pub dump: DumpStyle,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            root_size: (320.0, 480.0),
            dump: DumpStyle::default(),
        }
    }
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    root: Option<TomlRoot>,
    dump: Option<DumpStyle>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRoot {
    width: f64,
    height: f64,
}

impl SceneConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string; missing sections keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(root) = parsed.root {
            config.root_size = (root.width, root.height);
        }
        if let Some(dump) = parsed.dump {
            config.dump = dump;
        }
        Ok(config)
    }

    /// Set the size used for the root of a solve
    pub fn with_root_size(mut self, width: f64, height: f64) -> Self {
        self.root_size = (width, height);
        self
    }

    /// Set the dump formatting
    pub fn with_dump_style(mut self, dump: DumpStyle) -> Self {
        self.dump = dump;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert_eq!(config.root_size, (320.0, 480.0));
        assert_eq!(config.dump.indent, "  ");
        assert!(config.dump.show_inactive);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SceneConfig::new().with_root_size(100.0, 200.0);
        assert_eq!(config.root_size, (100.0, 200.0));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SceneConfig::from_toml(
            r#"
            [root]
            width = 375
            height = 812

            [dump]
            show_inactive = false
        "#,
        )
        .unwrap();
        assert_eq!(config.root_size, (375.0, 812.0));
        assert!(!config.dump.show_inactive);
        assert_eq!(config.dump.indent, "  ");
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let result = SceneConfig::from_toml("[root]\nwidth = 1\nheight = 2\ndepth = 3\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let result = SceneConfig::from_file(Path::new("/nonexistent/reanchor.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
