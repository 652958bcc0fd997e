//! pub.dev registry client for pubdev-mcp
//!
//! This crate provides the HTTP client that talks to the pub.dev JSON API and
//! website, plus the serde types for the responses it decodes.

pub mod api;
pub mod client;

// Re-export main types
pub use client::RegistryClient;
pub use api::{
    PackageResponse, Pubspec, ScoreResponse, SearchHit, SearchResponse, VersionEntry, VersionInfo,
};

use pubdev_core::error::PubError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, PubError>;
