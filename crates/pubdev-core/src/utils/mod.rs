//! Utility functions and helpers.
//!
//! Common functionality used across multiple pubdev-mcp crates.

pub mod name;
pub mod text;

// Re-export commonly used utilities
pub use name::{is_valid_package_name, validate_package_name};
pub use text::{percent, strip_html, truncate_chars};
