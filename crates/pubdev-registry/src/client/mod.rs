//! HTTP client for the pub.dev API and website
//!
//! Every operation is a single GET. There is no retry and no cache; failures
//! are classified as "not found" or passed through as network/HTTP errors.

use std::time::Duration;
use reqwest::{header, Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use pubdev_config::Settings;
use pubdev_core::error::PubError;
use pubdev_core::utils::validate_package_name;
use crate::api::{PackageResponse, ScoreResponse, SearchResponse};
use crate::RegistryResult;

/// Main HTTP client for pub.dev operations
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// JSON API root, e.g. `https://pub.dev/api`
    api_base_url: String,
    /// Website root, e.g. `https://pub.dev`
    site_base_url: String,
}

impl RegistryClient {
    /// Create a client against the public pub.dev endpoints
    pub fn new() -> RegistryResult<Self> {
        Self::from_settings(&Settings::default())
    }

    /// Create a client from resolved settings
    pub fn from_settings(settings: &Settings) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .gzip(true)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| PubError::network("Failed to create HTTP client".to_string(), e))?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            site_base_url: settings.site_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Website root used for human-facing links
    pub fn site_base_url(&self) -> &str {
        &self.site_base_url
    }

    /// Fetch package metadata (latest version and version list)
    pub async fn fetch_package(&self, package_name: &str) -> RegistryResult<PackageResponse> {
        let name = validate_package_name(package_name)?;
        let url = format!("{}/packages/{}", self.api_base_url, name);
        self.get_json(&url, &[], Some(name)).await
    }

    /// Fetch pub points, likes and popularity for a package
    pub async fn fetch_score(&self, package_name: &str) -> RegistryResult<ScoreResponse> {
        let name = validate_package_name(package_name)?;
        let url = format!("{}/packages/{}/score", self.api_base_url, name);
        self.get_json(&url, &[], Some(name)).await
    }

    /// Full-text package search
    pub async fn search(&self, query: &str, page: u32) -> RegistryResult<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PubError::invalid_argument("query", "must not be empty"));
        }

        let url = format!("{}/search", self.api_base_url);
        let params = [("q", query.to_string()), ("page", page.max(1).to_string())];
        self.get_json(&url, &params, None).await
    }

    /// Packages ordered by popularity
    pub async fn search_popular(&self, page: u32) -> RegistryResult<SearchResponse> {
        let url = format!("{}/search", self.api_base_url);
        let params = [
            ("sort", "popularity".to_string()),
            ("page", page.max(1).to_string()),
        ];
        self.get_json(&url, &params, None).await
    }

    /// Fetch the package's HTML page, optionally for one version.
    ///
    /// Any non-success status yields `Ok(None)`; only transport failures are errors.
    pub async fn fetch_package_page(
        &self,
        package_name: &str,
        version: Option<&str>,
    ) -> RegistryResult<Option<String>> {
        let name = validate_package_name(package_name)?;
        let url = match version {
            Some(version) => format!(
                "{}/packages/{}/versions/{}",
                self.site_base_url,
                name,
                validate_version(version)?
            ),
            None => format!("{}/packages/{}", self.site_base_url, name),
        };

        debug!(url = %url, "GET package page");
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| PubError::network(format!("GET {} failed: {}", url, e), e))?;

        if !response.status().is_success() {
            warn!(url = %url, status = %response.status(), "package page unavailable");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| PubError::network(format!("Failed to read {}: {}", url, e), e))?;
        Ok(Some(body))
    }

    /// GET `url` and decode a JSON body.
    ///
    /// `package` names the package a 404 refers to; without it a 404 is a plain HTTP error.
    async fn get_json<T>(
        &self,
        url: &str,
        query: &[(&str, String)],
        package: Option<&str>,
    ) -> RegistryResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(url = %url, ?query, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| PubError::network(format!("GET {} failed: {}", url, e), e))?;

        match (response.status(), package) {
            (StatusCode::OK, _) => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| PubError::network(format!("Failed to read {}: {}", url, e), e))?;
                serde_json::from_str(&body).map_err(|e| PubError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            },
            (StatusCode::NOT_FOUND, Some(name)) => Err(PubError::PackageNotFound {
                name: name.to_string(),
            }),
            (status, _) => {
                warn!(url = %url, status = %status, "registry request failed");
                Err(PubError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                })
            },
        }
    }
}

/// Versions only ever contain semver characters; reject anything that could alter the path
fn validate_version(version: &str) -> RegistryResult<&str> {
    let version = version.trim();
    let well_formed = !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'));

    if well_formed {
        Ok(version)
    } else {
        Err(PubError::invalid_argument(
            "version",
            format!("'{}' is not a valid version", version),
        ))
    }
}
