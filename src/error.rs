//! Error types for cani.
//!
//! Missing support data is never an error (it classifies as `unknown`);
//! these variants cover the places where the tool genuinely cannot proceed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A data or config file could not be read.
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The caniuse dataset is not valid JSON of the expected shape.
    #[error("Invalid dataset {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file is malformed or contains unknown keys.
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No feature matched the query.
    #[error("No feature matches '{0}'")]
    FeatureNotFound(String),

    /// No browser has the given key.
    #[error("No browser with key '{0}'")]
    BrowserNotFound(String),

    /// The browser has no era with the given name.
    #[error("{browser} has no version '{era}'")]
    EraNotFound { browser: String, era: String },

    /// None of the configured browser keys exist in the dataset.
    #[error("None of the configured browsers exist in the dataset")]
    NoBrowsers,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
