//! Configuration loading for pubdev-mcp
//!
//! Settings come from built-in defaults, an optional `config.toml`,
//! `PUBDEV_MCP_*` environment variables and command-line flags, in
//! increasing order of precedence.

pub mod toml;
pub mod merge;

// Re-export main types
pub use toml::{ConfigFile, OutputSection, RegistrySection, Settings};
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};

use pubdev_core::error::PubError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, PubError>;
