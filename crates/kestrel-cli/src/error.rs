//! Error types for the CLI

use std::path::PathBuf;

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Asset(#[from] kestrel_common::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("command failed: {message}")]
    CommandFailed { message: String },
}

impl Error {
    pub fn command_failed(message: impl Into<String>) -> Self {
        Error::CommandFailed {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Asset(e) if e.is_validation() => 2,
            Error::Asset(kestrel_common::Error::UnsupportedPlatform { .. }) => 2,
            Error::ConfigFile { .. } => 2,
            _ => 1,
        }
    }
}
