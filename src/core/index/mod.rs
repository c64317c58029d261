//! # Index Module
//!
//! Persistent record of every file the pipeline has already filed.
//!
//! The index answers one load-bearing question - "have we seen this content
//! hash before?" - and stores enough alongside it for future reporting
//! (perceptual hash, capture date, year). Uniqueness of `content_hash` is
//! enforced by the classification engine checking *before* insert, not by a
//! storage-level constraint.
//!
//! ## Backends
//! - `SqliteIndex` - persistent storage using SQLite
//! - `InMemoryIndex` - for testing

mod memory;
mod sqlite;

pub use memory::InMemoryIndex;
pub use sqlite::SqliteIndex;

use crate::error::IndexError;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One successfully filed media item.
///
/// Created exactly once, after a confirmed successful move; never updated or
/// deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Opaque unique identifier, generated at creation
    pub id: String,
    /// Final absolute destination path after filing
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the full content; the dedup key
    pub content_hash: String,
    /// 64-bit dHash; `None` when the file is not a decodable image
    pub perceptual_hash: Option<u64>,
    /// Resolved capture date, when one could be determined
    pub taken: Option<NaiveDateTime>,
    /// Year bucket the file was filed under; `None` for the unknown-year bucket
    pub year: Option<i32>,
}

impl MediaRecord {
    /// Create a record for a freshly filed item.
    ///
    /// `year` is carried separately from `taken` because an out-of-bound
    /// capture year files into the unknown-year bucket with `year = None`
    /// while keeping the (suspect) timestamp for inspection.
    pub fn new(
        path: PathBuf,
        content_hash: String,
        perceptual_hash: Option<u64>,
        taken: Option<NaiveDateTime>,
        year: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path,
            content_hash,
            perceptual_hash,
            taken,
            year,
        }
    }

    /// The capture year, straight from `taken`, before any sanity bounds.
    pub fn taken_year(&self) -> Option<i32> {
        self.taken.map(|t| t.year())
    }
}

/// Trait for duplicate index backends
pub trait DuplicateIndex: Send + Sync {
    /// Insert a newly filed record
    fn insert(&self, record: &MediaRecord) -> Result<(), IndexError>;

    /// Replace an existing record (matched by id)
    ///
    /// Unused by the core pipeline; kept for future curation tooling.
    fn update(&self, record: &MediaRecord) -> Result<(), IndexError>;

    /// Look up a record by exact content hash
    ///
    /// Reflects every insert that completed before this call under the
    /// pipeline's single-writer usage.
    fn find_by_hash(&self, content_hash: &str) -> Result<Option<MediaRecord>, IndexError>;

    /// All records filed under a given year, for reporting
    fn find_by_year(&self, year: i32) -> Result<Vec<MediaRecord>, IndexError>;

    /// Total number of filed records
    fn count(&self) -> Result<usize, IndexError>;
}
