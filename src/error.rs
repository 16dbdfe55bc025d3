//! Error types for the fallible boundaries of the shell.
//!
//! Navigation never fails: a miss falls back to the not-found route. Errors
//! only come from wiring the shell up (resolving elements, loading config)
//! and from the terminal host.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing or hosting the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A required element id is not present in the document.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// Error reading a configuration file.
    #[error("I/O error reading {path}: {error}")]
    ConfigIo {
        /// Path to the file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// Error parsing TOML configuration.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Terminal setup, drawing or event reading failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The watch body layout could not be computed.
    #[error("layout failed: {0}")]
    Layout(taffy::TaffyError),
}

/// Result alias used across the crate.
pub type Result<T, E = ShellError> = std::result::Result<T, E>;
