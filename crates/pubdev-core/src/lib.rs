//! # pubdev-core
//!
//! Core types and utilities shared across all pubdev-mcp crates.
//!
//! This crate provides:
//! - `PubError` enum for unified error handling
//! - Package name validation following the Dart package naming rules
//! - Text helpers used when turning registry responses into documents
//!
//! ## Architecture
//!
//! - `error`: Error types and result aliases
//! - `utils`: Name validation and text shaping

pub mod error;
pub mod utils;

// Re-export commonly used types
pub use error::{PubError, PubResult};
pub use utils::{is_valid_package_name, percent, strip_html, truncate_chars, validate_package_name};
