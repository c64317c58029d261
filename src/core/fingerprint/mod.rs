//! # Fingerprint Module
//!
//! Computes the two fingerprints the pipeline keeps per file:
//! - `content` - exact SHA-256 over the full byte stream, the dedup key
//! - `visual` - 64-bit dHash over pixel gradients, stored for similarity
//!   queries but never consulted by the dedup decision

mod content;
mod visual;

pub use content::content_hash;
pub use visual::{hamming_distance, visual_hash};
