// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Scanning and cache lookups never fail a load: resolution, I/O, corrupt
//! entries and probe failures are logged and degrade to a skipped source or a
//! cache miss. `Error` therefore only surfaces from configuration, persistence
//! writes, playlist lookup and superseded loads.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Store Error: {0}")]
    Store(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// The operation was superseded by a newer load. Not a fault.
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` for the expected cancellation signal.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl<T: std::fmt::Debug> From<ciborium::ser::Error<T>> for Error {
    fn from(err: ciborium::ser::Error<T>) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
