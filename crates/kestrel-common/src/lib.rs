//! Common types for Kestrel: errors, telemetry and configuration defaults

#![deny(missing_docs)]

pub mod defaults;
pub mod error;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Environment variable overriding the asset directory
pub const ASSET_DIR_ENV: &str = "KESTREL_ASSET_DIR";

/// Directory under the user's home holding Kestrel state
pub const STATE_DIR_NAME: &str = ".kestrel";

/// Subdirectory of the state directory holding persisted assets
pub const ASSET_DIR_NAME: &str = "assets";

/// File extension of persisted asset documents
pub const ASSET_FILE_EXTENSION: &str = "yaml";
