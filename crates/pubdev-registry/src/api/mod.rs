//! pub.dev API response types
//!
//! Only the fields the tools render are modelled. Everything except the
//! package name and latest version is optional because mirrors and older
//! API revisions omit fields freely.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /api/packages/{name}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageResponse {
    /// Package name
    pub name: String,
    /// Latest stable version
    pub latest: VersionInfo,
    /// Every published version, oldest first
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// One published version of a package
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionInfo {
    /// Version string
    pub version: String,
    /// Parsed pubspec.yaml
    #[serde(default)]
    pub pubspec: Pubspec,
    /// Download URL of the archive
    pub archive_url: Option<String>,
    /// Publication timestamp
    pub published: Option<DateTime<Utc>>,
}

/// Entry of the `versions` array: pub.dev sends objects, some mirrors bare strings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VersionEntry {
    Plain(String),
    Detailed(VersionInfo),
}

impl VersionEntry {
    /// Version string regardless of the entry shape
    pub fn version(&self) -> &str {
        match self {
            VersionEntry::Plain(version) => version,
            VersionEntry::Detailed(info) => &info.version,
        }
    }
}

/// The subset of pubspec.yaml the tools use
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pubspec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    /// Constraint strings, or maps for sdk/git/path dependencies
    #[serde(default)]
    pub dependencies: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub dev_dependencies: Option<IndexMap<String, Value>>,
    /// Present when the package declares a `flutter:` section
    pub flutter: Option<Value>,
}

impl Pubspec {
    /// Whether the pubspec declares a `flutter` section
    pub fn supports_flutter(&self) -> bool {
        self.flutter.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// `GET /api/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub packages: Vec<SearchHit>,
    /// URL of the next result page, when there is one
    pub next: Option<String>,
    /// Total hit count, when the upstream reports it
    pub count: Option<u64>,
}

/// A single search result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchHit {
    /// Package name
    pub package: String,
    pub latest: Option<VersionInfo>,
    /// Relevance score in 0..=1
    pub score: Option<f64>,
}

impl SearchHit {
    /// Latest version string, if the hit carries one
    pub fn version(&self) -> Option<&str> {
        self.latest.as_ref().map(|latest| latest.version.as_str())
    }

    /// Description from the latest pubspec, if the hit carries one
    pub fn description(&self) -> Option<&str> {
        self.latest
            .as_ref()
            .and_then(|latest| latest.pubspec.description.as_deref())
    }
}

/// `GET /api/packages/{name}/score`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoreResponse {
    #[serde(rename = "grantedPoints")]
    pub granted_points: Option<u32>,
    #[serde(rename = "maxPoints")]
    pub max_points: Option<u32>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<u64>,
    /// Popularity in 0..=1
    #[serde(rename = "popularityScore")]
    pub popularity_score: Option<f64>,
    #[serde(rename = "downloadCount30Days")]
    pub download_count_30_days: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}
