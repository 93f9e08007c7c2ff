//! Error types for SiteGraph.
//!
//! Library crates use [`SiteGraphError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Metadata composition and entity building are total and never produce these
//! errors; they only surface while loading configuration or a business profile,
//! or when a caller asks for a page type the site does not define.

use std::path::PathBuf;

/// Top-level error type for all SiteGraph operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteGraphError {
    /// Tool configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Business profile parsing or validation error.
    #[error("profile error: {message}")]
    Profile { message: String },

    /// A page type or route that is not part of the site's fixed page set.
    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON/TOML serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteGraphError>;

impl SiteGraphError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a profile error from any displayable message.
    pub fn profile(msg: impl Into<String>) -> Self {
        Self::Profile {
            message: msg.into(),
        }
    }

    /// Create an unknown-page error for a page key or route path.
    pub fn unknown_page(page: impl Into<String>) -> Self {
        Self::UnknownPage(page.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SiteGraphError::config("missing profile path");
        assert_eq!(err.to_string(), "config error: missing profile path");

        let err = SiteGraphError::profile("domain must not contain a path");
        assert!(err.to_string().contains("domain must not contain"));

        let err = SiteGraphError::unknown_page("/blog");
        assert_eq!(err.to_string(), "unknown page: /blog");
    }
}
