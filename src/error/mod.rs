//! # Error Module
//!
//! Error types for the photo organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Recoverable vs fatal** - a single bad file is recoverable and never
//!   halts the batch; an unusable destination root or index is fatal

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Cannot create output directory {path}: {source}")]
    OutputSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },
}

/// Errors from the duplicate index
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to open index database at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Index query failed: {0}")]
    QueryFailed(String),

    #[error("Index corruption detected at {path}. Delete this file and try again.")]
    Corrupted { path: PathBuf },
}

/// Errors that occur while moving a file into place
///
/// These are recoverable per file: the orchestrator reports them and
/// continues with the next file.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Source file not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {source_path} to {dest}: {reason}")]
    MoveFailed {
        source_path: PathBuf,
        dest: PathBuf,
        reason: String,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;
