//! # Photo Organizer
//!
//! Routes an unstructured tree of media files into an organized destination
//! tree, deduplicating by exact content hash along the way.
//!
//! ## Core Philosophy
//! - **Deterministic** - the same inputs always land in the same bucket
//! - **Never lose data** - collisions rename, they never overwrite
//! - **One bad file never stops the batch** - per-file failures are isolated
//!
//! ## Architecture
//! The library is split into a core engine (presentation-agnostic) and a CLI:
//! - `core` - fingerprinting, date resolution, classification, routing
//! - `error` - error types for every subsystem

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
