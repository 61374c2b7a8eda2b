//! Shared error types for the analysis core
//!
//! Lookups that fail to resolve, unknown syntax shapes and malformed try
//! statements are *not* errors here: they degrade to `None` or to local
//! substitutions inside the model. This type covers the things a caller
//! genuinely has to handle (configuration, registry invariants, I/O).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cohesionmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Two classes with the same qualified name were registered in one session
    #[error("Duplicate class in registry: {name}")]
    DuplicateClass { name: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        path: Option<PathBuf>,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a duplicate class error
    pub fn duplicate_class(name: impl Into<String>) -> Self {
        Self::DuplicateClass { name: name.into() }
    }

    /// Create a configuration error, optionally tied to a file
    pub fn configuration(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Configuration {
            message: message.into(),
            path,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
