//! Tool dispatch and handlers.
//!
//! Six tools, each one or two registry fetches followed by a render. The MCP
//! service and the `call` command both go through `Toolbox`.

use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use pubdev_config::Settings;
use pubdev_core::error::{PubError, PubResult};
use pubdev_registry::RegistryClient;

use crate::render;

/// The tools exposed to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    PackageInfo,
    SearchPackages,
    PackageVersions,
    PackageDocumentation,
    PackageScore,
    TrendingPackages,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::PackageInfo,
        ToolKind::SearchPackages,
        ToolKind::PackageVersions,
        ToolKind::PackageDocumentation,
        ToolKind::PackageScore,
        ToolKind::TrendingPackages,
    ];

    /// Wire name of the tool
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::PackageInfo => "get_package_info",
            ToolKind::SearchPackages => "search_packages",
            ToolKind::PackageVersions => "get_package_versions",
            ToolKind::PackageDocumentation => "get_package_documentation",
            ToolKind::PackageScore => "get_package_score",
            ToolKind::TrendingPackages => "get_trending_packages",
        }
    }

    /// Look a tool up by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PackageNameArgs {
    #[schemars(description = "Package name on pub.dev (e.g. http, provider, bloc)")]
    pub package_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchArgs {
    #[schemars(description = "Search terms")]
    pub query: String,

    #[schemars(description = "Page number (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DocumentationArgs {
    #[schemars(description = "Package name on pub.dev")]
    pub package_name: String,

    #[schemars(description = "Package version (default: latest)")]
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct PageArgs {
    #[schemars(description = "Page number (default: 1)")]
    #[serde(default)]
    pub page: Option<u32>,
}

/// Registry client plus the rendering limits the handlers need
#[derive(Debug, Clone)]
pub struct Toolbox {
    client: RegistryClient,
    readme_char_limit: usize,
    trending_page_size: usize,
}

impl Toolbox {
    /// Build a toolbox from resolved settings
    pub fn from_settings(settings: &Settings) -> PubResult<Self> {
        Ok(Self {
            client: RegistryClient::from_settings(settings)?,
            readme_char_limit: settings.readme_char_limit,
            trending_page_size: settings.trending_page_size,
        })
    }

    /// Run the tool called `name` with JSON `arguments`
    pub async fn dispatch(&self, name: &str, arguments: Value) -> PubResult<String> {
        let kind = ToolKind::from_name(name).ok_or_else(|| PubError::UnknownTool {
            name: name.to_string(),
            suggestion: suggest_similar_tool(name),
        })?;

        info!(tool = kind.name(), "dispatching tool call");
        match kind {
            ToolKind::PackageInfo => {
                let args: PackageNameArgs = parse_args(arguments)?;
                self.package_info(&args.package_name).await
            },
            ToolKind::SearchPackages => {
                let args: SearchArgs = parse_args(arguments)?;
                self.search_packages(&args.query, args.page).await
            },
            ToolKind::PackageVersions => {
                let args: PackageNameArgs = parse_args(arguments)?;
                self.package_versions(&args.package_name).await
            },
            ToolKind::PackageDocumentation => {
                let args: DocumentationArgs = parse_args(arguments)?;
                self.package_documentation(&args.package_name, args.version.as_deref())
                    .await
            },
            ToolKind::PackageScore => {
                let args: PackageNameArgs = parse_args(arguments)?;
                self.package_score(&args.package_name).await
            },
            ToolKind::TrendingPackages => {
                let args: PageArgs = parse_args(arguments)?;
                self.trending_packages(args.page).await
            },
        }
    }

    pub async fn package_info(&self, package_name: &str) -> PubResult<String> {
        let package = self.client.fetch_package(package_name).await?;
        Ok(render::package_info(&package, self.client.site_base_url()))
    }

    pub async fn search_packages(&self, query: &str, page: Option<u32>) -> PubResult<String> {
        let page = normalize_page(page);
        let results = self.client.search(query, page).await?;
        Ok(render::search_results(
            query.trim(),
            page,
            &results,
            self.client.site_base_url(),
        ))
    }

    pub async fn package_versions(&self, package_name: &str) -> PubResult<String> {
        let package = self.client.fetch_package(package_name).await?;
        Ok(render::version_history(&package))
    }

    /// Fetches the HTML page first, then the metadata
    pub async fn package_documentation(
        &self,
        package_name: &str,
        version: Option<&str>,
    ) -> PubResult<String> {
        let version = version.map(str::trim).filter(|v| !v.is_empty());
        let page = self.client.fetch_package_page(package_name, version).await?;
        let package = self.client.fetch_package(package_name).await?;

        Ok(render::documentation(
            &package,
            version,
            page.as_deref(),
            self.readme_char_limit,
            self.client.site_base_url(),
        ))
    }

    pub async fn package_score(&self, package_name: &str) -> PubResult<String> {
        let score = self.client.fetch_score(package_name).await?;
        Ok(render::score(
            package_name.trim(),
            &score,
            self.client.site_base_url(),
        ))
    }

    pub async fn trending_packages(&self, page: Option<u32>) -> PubResult<String> {
        let page = normalize_page(page);
        let results = self.client.search_popular(page).await?;
        Ok(render::trending(
            page,
            &results,
            self.trending_page_size,
            self.client.site_base_url(),
        ))
    }
}

/// Missing or zero pages mean the first page
fn normalize_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

/// An absent argument object is treated as `{}`
fn parse_args<T: DeserializeOwned>(arguments: Value) -> PubResult<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    serde_json::from_value(arguments).map_err(|e| PubError::invalid_argument("arguments", e.to_string()))
}

/// Suggest the closest tool name based on edit distance
pub fn suggest_similar_tool(input: &str) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for kind in ToolKind::ALL {
        let distance = edit_distance(input, kind.name());
        if distance < best_distance && distance <= 3 {
            best_distance = distance;
            best_match = Some(kind.name());
        }
    }

    best_match.map(|s| s.to_string())
}

/// Levenshtein distance over chars, two-row variant
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests;
