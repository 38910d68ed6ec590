//! Configuration system for tabline.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/tabline/config.toml` and/or `.tabline/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for a console instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub output: OutputConfig,
    pub history: HistoryConfig,
    pub completion: CompletionConfig,
}

/// Scrollback settings for the output log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum number of lines retained in the output log.
    pub capacity: usize,
    /// Number of most recent lines a host shows on screen.
    pub display_lines: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            display_lines: 10,
        }
    }
}

/// Settings for submitted-line history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Oldest entries are dropped beyond this count.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 500 }
    }
}

/// Settings for suggestion listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Column width each alias is padded to in a suggestion line.
    pub suggestion_column_width: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            suggestion_column_width: 40,
        }
    }
}

impl ConsoleConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.capacity == 0 {
            return Err(ConfigError::Invalid {
                message: "output.capacity must be greater than zero".into(),
            });
        }
        if self.output.display_lines > self.output.capacity {
            return Err(ConfigError::Invalid {
                message: format!(
                    "output.display_lines ({}) exceeds output.capacity ({})",
                    self.output.display_lines, self.output.capacity
                ),
            });
        }
        if self.completion.suggestion_column_width == 0 {
            return Err(ConfigError::Invalid {
                message: "completion.suggestion_column_width must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `TABLINE_`)
/// 3. Workspace-local config (`.tabline/config.toml`)
/// 4. User config (`~/.config/tabline/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ConsoleConfig>,
) -> Result<ConsoleConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ConsoleConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "tabline", "tabline") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".tabline").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (TABLINE_OUTPUT__CAPACITY, TABLINE_HISTORY__MAX_ENTRIES, etc.)
    figment = figment.merge(Env::prefixed("TABLINE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: ConsoleConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.output.capacity, 256);
        assert_eq!(config.output.display_lines, 10);
        assert_eq!(config.history.max_entries, 500);
        assert_eq!(config.completion.suggestion_column_width, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ConsoleConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: ConsoleConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config.history.max_entries, 500);
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = ConsoleConfig::default();
        overrides.history.max_entries = 25;
        overrides.completion.suggestion_column_width = 24;

        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.history.max_entries, 25);
        assert_eq!(config.completion.suggestion_column_width, 24);
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let tabline_dir = dir.path().join(".tabline");
        std::fs::create_dir_all(&tabline_dir).unwrap();
        std::fs::write(
            tabline_dir.join("config.toml"),
            r#"
[output]
capacity = 64
display_lines = 8

[history]
max_entries = 12
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.output.capacity, 64);
        assert_eq!(config.output.display_lines, 8);
        assert_eq!(config.history.max_entries, 12);
        assert_eq!(config.completion.suggestion_column_width, 40);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let tabline_dir = dir.path().join(".tabline");
        std::fs::create_dir_all(&tabline_dir).unwrap();
        std::fs::write(
            tabline_dir.join("config.toml"),
            "[output]\ncapacity = 4\ndisplay_lines = 9\n",
        )
        .unwrap();

        let err = load_config(Some(dir.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let tabline_dir = dir.path().join(".tabline");
        std::fs::create_dir_all(&tabline_dir).unwrap();
        std::fs::write(
            tabline_dir.join("config.toml"),
            "[history]\nmax_entries = \"many\"\n",
        )
        .unwrap();

        let err = load_config(Some(dir.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = ConsoleConfig::default();
        config.output.capacity = 0;
        config.output.display_lines = 0;
        assert!(config.validate().is_err());
    }
}
