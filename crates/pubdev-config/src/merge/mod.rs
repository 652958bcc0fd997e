//! Configuration layering, file discovery, and environment overrides

use std::collections::HashMap;
use std::path::PathBuf;
use pubdev_core::error::PubError;
use crate::{ConfigResult, toml::{ConfigFile, Settings}};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PUBDEV_MCP_";

/// CLI override keys understood by `ConfigLayering`
pub const CLI_API_URL: &str = "api-url";
pub const CLI_SITE_URL: &str = "site-url";
pub const CLI_TIMEOUT: &str = "timeout";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Path given with `--config`, if any
    explicit_path: Option<PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// A config.toml file
    File(PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine(String),
}

impl ConfigLoader {
    /// Create a loader. `explicit_path` must exist when given.
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// Default per-user config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pubdev-mcp").join("config.toml"))
    }

    /// Locate and parse the config file, if there is one
    pub async fn load_file(&self) -> ConfigResult<Option<(ConfigFile, PathBuf)>> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Err(PubError::ConfigValidation {
                    field: "config".to_string(),
                    reason: format!("config file {} does not exist", path.display()),
                });
            }
            let file = crate::toml::load_from_file(path).await?;
            return Ok(Some((file, path.clone())));
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => {
                let file = crate::toml::load_from_file(&path).await?;
                Ok(Some((file, path)))
            },
            _ => Ok(None),
        }
    }

    /// Resolve settings from every layer, reporting which layers contributed
    pub async fn load(
        &self,
        cli_overrides: HashMap<String, String>,
    ) -> ConfigResult<(Settings, Vec<ConfigSource>)> {
        let mut sources = vec![ConfigSource::Defaults];

        let file = match self.load_file().await? {
            Some((file, path)) => {
                sources.push(ConfigSource::File(path));
                Some(file)
            },
            None => None,
        };

        let env_overrides = ConfigLayering::collect_env_overrides();
        let mut env_keys: Vec<&String> = env_overrides.keys().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().cloned().map(ConfigSource::Environment));

        let mut cli_keys: Vec<&String> = cli_overrides.keys().collect();
        cli_keys.sort();
        sources.extend(cli_keys.into_iter().cloned().map(ConfigSource::CommandLine));

        let settings = ConfigLayering::merge(file, &env_overrides, &cli_overrides)?;
        Ok((settings, sources))
    }
}

impl ConfigLayering {
    /// Merge defaults, file, environment and CLI layers, then validate
    pub fn merge(
        file: Option<ConfigFile>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<Settings> {
        let mut merged = Settings::default();

        if let Some(file) = file {
            file.apply_to(&mut merged);
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        crate::toml::validate_settings(&mut merged)?;
        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        config: &mut Settings,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "PUBDEV_MCP_API_URL" => config.api_base_url = value.clone(),
                "PUBDEV_MCP_SITE_URL" => config.site_base_url = value.clone(),
                "PUBDEV_MCP_USER_AGENT" => config.user_agent = value.clone(),
                "PUBDEV_MCP_TIMEOUT_SECS" => config.timeout_secs = parse_number(key, value)?,
                "PUBDEV_MCP_README_LIMIT" => config.readme_char_limit = parse_number(key, value)?,
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(
        config: &mut Settings,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                CLI_API_URL => config.api_base_url = value.clone(),
                CLI_SITE_URL => config.site_base_url = value.clone(),
                CLI_TIMEOUT => config.timeout_secs = parse_number("--timeout", value)?,
                _ => {
                    // Unknown CLI override, ignore
                },
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_number<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| PubError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid number: {}", value, e),
    })
}
