//! # Core Module
//!
//! The presentation-agnostic organizing engine.
//!
//! ## Modules
//! - `fingerprint` - exact (SHA-256) and perceptual (dHash) fingerprints
//! - `date` - best-effort capture date resolution
//! - `classify` - maps a file to exactly one routing outcome
//! - `index` - persistent record of everything already filed
//! - `router` - collision-safe moves into the category layout
//! - `pipeline` - orchestrates the full workflow, one file at a time

pub mod classify;
pub mod date;
pub mod fingerprint;
pub mod index;
pub mod pipeline;
pub mod router;

// Re-export commonly used types
pub use classify::{ClassificationEngine, MediaKind, Outcome};
pub use index::{DuplicateIndex, MediaRecord};
pub use pipeline::{FileOutcome, OrganizeReport, Organizer};
