//! config.toml parsing and the resolved `Settings` type

use serde::{Deserialize, Serialize};
use pubdev_core::error::PubError;
use crate::ConfigResult;

/// Default pub.dev JSON API root
pub const DEFAULT_API_BASE_URL: &str = "https://pub.dev/api";
/// Default pub.dev website root (HTML pages)
pub const DEFAULT_SITE_BASE_URL: &str = "https://pub.dev";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of README characters kept in documentation output
pub const DEFAULT_README_CHAR_LIMIT: usize = 2000;
/// Default number of packages listed per trending page
pub const DEFAULT_TRENDING_PAGE_SIZE: usize = 10;

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the JSON API, without trailing slash
    pub api_base_url: String,
    /// Root of the website, without trailing slash
    pub site_base_url: String,
    /// User-Agent header sent upstream
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// README characters kept before truncation
    pub readme_char_limit: usize,
    /// Packages shown per trending page
    pub trending_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            readme_char_limit: DEFAULT_README_CHAR_LIMIT,
            trending_page_size: DEFAULT_TRENDING_PAGE_SIZE,
        }
    }
}

/// User agent advertised when none is configured
pub fn default_user_agent() -> String {
    format!("pubdev-mcp/{}", env!("CARGO_PKG_VERSION"))
}

/// On-disk config.toml layout. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Upstream endpoints and HTTP behaviour
    #[serde(default)]
    pub registry: RegistrySection,

    /// Rendering limits
    #[serde(default)]
    pub output: OutputSection,
}

/// `[registry]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_char_limit: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trending_page_size: Option<usize>,
}

impl ConfigFile {
    /// Overlay the values present in this file onto `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(url) = &self.registry.api_url {
            settings.api_base_url = url.clone();
        }
        if let Some(url) = &self.registry.site_url {
            settings.site_base_url = url.clone();
        }
        if let Some(agent) = &self.registry.user_agent {
            settings.user_agent = agent.clone();
        }
        if let Some(timeout) = self.registry.timeout_secs {
            settings.timeout_secs = timeout;
        }
        if let Some(limit) = self.output.readme_char_limit {
            settings.readme_char_limit = limit;
        }
        if let Some(size) = self.output.trending_page_size {
            settings.trending_page_size = size;
        }
    }
}

/// Parse config.toml content. `origin` names the source in error messages.
pub fn parse_config_file(content: &str, origin: &str) -> ConfigResult<ConfigFile> {
    toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_col(content, span.start))
            .unwrap_or((0, 0));
        PubError::ConfigParse {
            path: origin.to_string(),
            message: e.message().to_string(),
            line,
            column,
        }
    })
}

/// Load and parse config.toml from a file path
pub async fn load_from_file(path: &std::path::Path) -> ConfigResult<ConfigFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PubError::io(format!("Failed to read {}", path.display()), e))?;

    parse_config_file(&content, &path.display().to_string())
}

/// Check resolved settings and normalise URLs (trailing slashes removed)
pub fn validate_settings(settings: &mut Settings) -> ConfigResult<()> {
    settings.api_base_url = normalize_base_url("api_base_url", &settings.api_base_url)?;
    settings.site_base_url = normalize_base_url("site_base_url", &settings.site_base_url)?;

    if settings.user_agent.trim().is_empty() {
        return Err(PubError::ConfigValidation {
            field: "user_agent".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    if settings.timeout_secs == 0 {
        return Err(PubError::ConfigValidation {
            field: "timeout_secs".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    if settings.readme_char_limit == 0 {
        return Err(PubError::ConfigValidation {
            field: "readme_char_limit".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    if !(1..=100).contains(&settings.trending_page_size) {
        return Err(PubError::ConfigValidation {
            field: "trending_page_size".to_string(),
            reason: format!("{} is outside 1..=100", settings.trending_page_size),
        });
    }

    Ok(())
}

fn normalize_base_url(field: &str, raw: &str) -> ConfigResult<String> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| PubError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid URL: {}", raw, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PubError::ConfigValidation {
            field: field.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// 1-based line and column of a byte offset
fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}
