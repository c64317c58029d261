//! # Classify Module
//!
//! Decides where a file belongs. Every file maps to exactly one of four
//! outcomes, and the mapping is a pure function of the file's extension,
//! its content hash, its resolved capture year, and the index state at the
//! time of the check:
//!
//! - `Unsupported` - extension is neither a known image nor video type;
//!   the orchestrator short-circuits before any fingerprinting
//! - `Duplicate` - the content hash is already in the index
//! - `UnknownYear` - no resolved year, or one outside the sane bound
//! - `Dated(year)` - everything else, filed under a 4-digit year folder
//!
//! The sane-year bound catches metadata corruption (epoch-zero or
//! clearly-future dates) and degrades it into the unknown-year bucket
//! rather than rejecting the file.

use crate::core::index::DuplicateIndex;
use crate::error::IndexError;
use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Years strictly before this are treated as metadata corruption.
const MIN_SANE_YEAR: i32 = 1900;

/// Recognized image extensions (lowercase).
const IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "heic", "heif", "webp",
];

/// Recognized video extensions (lowercase).
const VIDEO_EXTENSIONS: [&str; 11] = [
    "mp4", "mov", "avi", "mkv", "mpg", "mpeg", "wmv", "flv", "3gp", "mts", "m2ts",
];

/// Extension-based media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Unsupported,
}

impl MediaKind {
    /// Detect the media kind from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaKind::Unsupported;
        };
        let ext = ext.to_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Unsupported
        }
    }

    /// Whether EXIF parsing applies to this kind
    pub fn is_image(&self) -> bool {
        matches!(self, MediaKind::Image)
    }

    /// Whether this kind participates in fingerprinting and dedup at all
    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaKind::Unsupported)
    }
}

/// Routing outcome for one file. Exhaustive and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Not a recognized media type; no record is created
    Unsupported,
    /// Content hash already filed; no record is created
    Duplicate,
    /// Resolved year absent or outside the sane bound; record gets `year = None`
    UnknownYear,
    /// Filed under the given year folder
    Dated(i32),
}

impl Outcome {
    /// The year the record should carry, if any
    pub fn record_year(&self) -> Option<i32> {
        match self {
            Outcome::Dated(year) => Some(*year),
            _ => None,
        }
    }
}

/// Decides the routing outcome for fingerprinted files
pub struct ClassificationEngine<'a> {
    index: &'a dyn DuplicateIndex,
    current_year: i32,
}

impl<'a> ClassificationEngine<'a> {
    /// Create an engine over the given index, bounded by today's year
    pub fn new(index: &'a dyn DuplicateIndex) -> Self {
        Self::with_current_year(index, Local::now().year())
    }

    /// Create an engine with an explicit "current year" for the sane bound
    pub fn with_current_year(index: &'a dyn DuplicateIndex, current_year: i32) -> Self {
        Self {
            index,
            current_year,
        }
    }

    /// Classify a supported file from its fingerprints and resolved date.
    ///
    /// Unsupported files never reach this point; the orchestrator routes
    /// them before fingerprinting. The duplicate check runs first, so a
    /// duplicate with a corrupt date is still a duplicate.
    pub fn classify(
        &self,
        content_hash: &str,
        taken: Option<NaiveDateTime>,
    ) -> Result<Outcome, IndexError> {
        if self.index.find_by_hash(content_hash)?.is_some() {
            return Ok(Outcome::Duplicate);
        }

        Ok(self.bucket_for_year(taken.map(|t| t.year())))
    }

    /// Pure year bucketing against the sane bound [1900, current + 1].
    fn bucket_for_year(&self, year: Option<i32>) -> Outcome {
        match year {
            Some(y) if y >= MIN_SANE_YEAR && y <= self.current_year + 1 => Outcome::Dated(y),
            _ => Outcome::UnknownYear,
        }
    }
}
