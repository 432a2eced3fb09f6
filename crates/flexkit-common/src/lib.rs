//! # FlexKit Common
//!
//! Common error types and logging configuration for the FlexKit layout
//! engine.
//!
//! ## Features
//!
//! - Unified error type with backtrace support
//! - Logging configuration and setup
//! - Result extension traits

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for FlexKit.
///
/// The layout core itself is infallible (invalid numeric input is clamped,
/// degenerate trees produce zero-extent geometry); this type covers the
/// fallible surfaces around it: fixture loading, configuration, and tools.
#[derive(Error, Debug)]
pub enum FlexError {
    /// Layout-related errors (reported by harnesses wrapping the core).
    #[error("Layout error: {message}")]
    Layout {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        backtrace: Option<backtrace::Backtrace>,
    },
}

impl FlexError {
    /// Create a layout error.
    pub fn layout(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
            source: None,
        }
    }

    /// Create a layout error with source.
    pub fn layout_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Layout {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with backtrace.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }

    /// Get the error category for diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            FlexError::Layout { .. } => "layout",
            FlexError::Config { .. } => "config",
            FlexError::Io(_) => "io",
            FlexError::NotFound(_) => "not_found",
            FlexError::InvalidArgument(_) => "invalid_argument",
            FlexError::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for FlexKit operations.
pub type Result<T> = std::result::Result<T, FlexError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| FlexError::Internal {
            message: format!("{}: {}", message.into(), e),
            backtrace: Some(backtrace::Backtrace::new()),
        })
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| FlexError::NotFound(resource.into()))
    }
}
