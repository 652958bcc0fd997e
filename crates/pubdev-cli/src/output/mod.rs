//! Terminal output for the non-server commands.
//!
//! Tool text goes to stdout untouched; diagnostics go to stderr.

pub mod colors;
pub mod errors;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
    errors: errors::ErrorFormatter,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
            errors: errors::ErrorFormatter::new(),
        }
    }

    /// Print tool output or listings to stdout
    pub fn print(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a tool name with its description
    pub fn tool_entry(&self, name: &str, description: &str) {
        println!("{}\n    {}", self.colors.bold(name), description);
    }

    /// Print a formatted error
    pub fn error(&self, error: &pubdev_core::PubError) {
        eprint!("{}", self.errors.format_error(error));
    }

    /// Print an error that did not originate in pubdev-mcp
    pub fn error_message(&self, message: &str) {
        eprintln!("{}", self.errors.format_simple(message));
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
