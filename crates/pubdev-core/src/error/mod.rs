//! Error types and result aliases for pubdev-mcp operations.
//!
//! Provides a unified error type that covers every failure a tool call or
//! startup step can hit, with actionable suggestions where one exists.

use thiserror::Error;

/// Unified error type for all pubdev-mcp operations
#[derive(Error, Debug)]
pub enum PubError {
    // Registry errors
    #[error("Package '{name}' not found on pub.dev")]
    PackageNotFound { name: String },

    #[error("Registry returned status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    // Tool errors
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Unknown tool: {name}")]
    UnknownTool {
        name: String,
        suggestion: Option<String>,
    },

    // Config errors
    #[error("Failed to parse {path}: {message} at line {line}, column {column}")]
    ConfigParse {
        path: String,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pubdev-mcp operations
pub type PubResult<T> = Result<T, PubError>;

impl PubError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the upstream reported the package as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, PubError::PackageNotFound { .. })
    }

    /// Whether the caller supplied bad input (as opposed to an upstream failure)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PubError::InvalidArgument { .. } | PubError::UnknownTool { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            PubError::PackageNotFound { .. } => Some(
                "Check the package name spelling or use search_packages to find it".to_string(),
            ),
            PubError::Network { .. } => {
                Some("Check your internet connection and try again".to_string())
            },
            PubError::Http { status, .. } if *status >= 500 => {
                Some("pub.dev is having trouble; try again in a moment".to_string())
            },
            PubError::UnknownTool {
                suggestion: Some(name),
                ..
            } => Some(format!("Did you mean '{}'?", name)),
            PubError::UnknownTool { .. } => {
                Some("Run 'pubdev-mcp tools' to list available tools".to_string())
            },
            PubError::ConfigParse { .. } | PubError::ConfigValidation { .. } => {
                Some("Fix the configuration file or the PUBDEV_MCP_* environment variables".to_string())
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = PubError::PackageNotFound {
            name: "nope".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Package 'nope' not found on pub.dev");

        let err = PubError::Http {
            status: 500,
            url: "https://pub.dev/api/packages/x".to_string(),
        };
        assert!(!err.is_not_found());
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_unknown_tool_suggestion() {
        let err = PubError::UnknownTool {
            name: "get_pakage_info".to_string(),
            suggestion: Some("get_package_info".to_string()),
        };
        assert!(err.is_caller_error());
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Did you mean 'get_package_info'?")
        );
    }

    #[test]
    fn test_network_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = PubError::network("request failed".to_string(), io);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("timed out"));
    }
}
