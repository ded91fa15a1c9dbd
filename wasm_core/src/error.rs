//! Error kinds shared by every tool operation.
//!
//! Each operation fails in one of two ways: the user gave us something we can't
//! work with ([`ToolError::Validation`]), or an external facility let us down
//! ([`ToolError::Operational`]). Neither is fatal; the caller turns both into a
//! status message for the panel that triggered the operation.
//!
//! # Example
//!
//! ```rust
//! use jsonkit_core::error::ToolError;
//!
//! let err = ToolError::validation("Choose HTTP Method!");
//! assert!(err.is_validation());
//! assert_eq!(err.to_string(), "Choose HTTP Method!");
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Input text failed to parse, or a required selection or field is missing.
    #[error("{0}")]
    Validation(String),

    /// Clipboard denied, malformed ciphertext, network failure.
    #[error("{0}")]
    Operational(String),
}

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn operational(message: impl Into<String>) -> Self {
        Self::Operational(message.into())
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Operational(msg) => msg,
        }
    }

    /// Prepends `prefix` to the message, keeping the error kind.
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{prefix}{msg}")),
            Self::Operational(msg) => Self::Operational(format!("{prefix}{msg}")),
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}
