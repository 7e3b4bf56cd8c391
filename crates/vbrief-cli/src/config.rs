use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

/// Default config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "vbrief.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub format: FormatConfig,
    pub validate: ValidateConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub canonical: bool,
    pub preserve_format: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            canonical: true,
            preserve_format: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateConfig {
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `VBRIEF_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Load the explicit config, else `vbrief.toml` when present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<CliConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(CliConfig::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<CliConfig, CliError> {
    Ok(toml::from_str(content)?)
}
