//! Error types for Kestrel asset operations
//!
//! Errors are structured with fields to aid debugging. Each variant carries
//! the platform or store location it concerns alongside the underlying cause.

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for Kestrel operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration supplied to an asset is missing or malformed
    #[error("validation error for {platform}: {message}")]
    Validation {
        /// Platform kind the configuration targets
        platform: String,
        /// Description of what's invalid
        message: String,
        /// The invalid field path (e.g., "nodes.masterIps")
        field: Option<String>,
    },

    /// Operation targeted an asset that is not active or not persisted
    #[error("not found [{platform}]: {message}")]
    NotFound {
        /// Platform kind that was looked up
        platform: String,
        /// Description of what was missing
        message: String,
    },

    /// Reading or writing durable state failed
    #[error("io error at {location}: {message}")]
    Io {
        /// Store location (file path, store name)
        location: String,
        /// Description of what failed
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The document kind being serialized (if known)
        kind: Option<String>,
    },

    /// Platform name that no asset implementation exists for
    #[error("unsupported platform: {platform}")]
    UnsupportedPlatform {
        /// The platform name as requested
        platform: String,
    },
}

impl Error {
    /// Create a validation error with the given message
    ///
    /// For simple validation errors without platform context.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            platform: UNKNOWN_CONTEXT.to_string(),
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error with platform context
    pub fn validation_for(platform: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            platform: platform.into(),
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error with platform context and field path
    pub fn validation_for_field(
        platform: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Validation {
            platform: platform.into(),
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a not-found error for a platform
    pub fn not_found(platform: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::NotFound {
            platform: platform.into(),
            message: msg.into(),
        }
    }

    /// Create an I/O error for a store location
    pub fn io(location: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Io {
            location: location.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error with document kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            platform: platform.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Only I/O failures may succeed on a later attempt. Everything else
    /// needs a configuration or caller fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Validation { .. } => false,
            Error::NotFound { .. } => false,
            Error::Io { .. } => true,
            Error::Serialization { .. } => false,
            Error::UnsupportedPlatform { .. } => false,
        }
    }

    /// Get the platform name if this error is associated with one
    pub fn platform(&self) -> Option<&str> {
        match self {
            Error::Validation { platform, .. } => Some(platform),
            Error::NotFound { platform, .. } => Some(platform),
            Error::UnsupportedPlatform { platform } => Some(platform),
            Error::Io { .. } => None,
            Error::Serialization { .. } => None,
        }
    }

    /// Get the offending field path of a validation error
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// True for [`Error::Validation`]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// True for [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
