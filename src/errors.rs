//! The error type shared by the whole crate.
//!
//! Only conditions the caller has to act on are errors. A missing translation is a normal
//! result and is represented by the configured missing value instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegimentError {
    #[error("Data file '{}' does not exist", path.display())]
    DataSourceNotFound { path: PathBuf },
    #[error("Regiment with code name '{id}' not found")]
    NotFound { id: String },
    #[error("Regiment has no text attribute '{name}'")]
    UnknownAttribute { name: String },
    #[error("Unknown file encoding '{label}'")]
    UnknownEncoding { label: String },
    #[error("Could not read data file '{}'", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("Could not read config file at {}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        source: io::Error,
    },
    #[error("Could not parse config file at {}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl RegimentError {
    /// True for the errors that mean some requested data does not exist, as opposed to a
    /// programming mistake or an unreadable file.
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, RegimentError::NotFound { .. } | RegimentError::DataSourceNotFound { .. })
    }
}
