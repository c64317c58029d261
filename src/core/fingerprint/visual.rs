//! Perceptual fingerprint: 64-bit difference hash (dHash).
//!
//! dHash works by:
//! 1. Resizing the image to a 9x8 grayscale grid
//! 2. Comparing each pixel to the one to its right
//! 3. If the left pixel is brighter, set the bit to 1, else 0
//!
//! This captures the relative gradient of brightness changes, which survives
//! recompression and resizing far better than raw pixel values.
//!
//! The bit layout is fixed for cross-implementation compatibility of stored
//! hashes: bit `row * 8 + col` (bit 0 = least significant) is set when
//! `pixel[row, col] > pixel[row, col + 1]` in raster order.

use image::imageops::FilterType;
use std::path::Path;

/// Grid width. One extra column so each row yields 8 gradient comparisons.
const GRID_WIDTH: u32 = 9;
const GRID_HEIGHT: u32 = 8;

/// Compute the 64-bit dHash of an image file.
///
/// Returns `None` when the file cannot be decoded as an image. That is an
/// expected case (videos, documents, corrupt files), not an error.
pub fn visual_hash(path: &Path) -> Option<u64> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "not decodable, skipping visual hash");
            return None;
        }
    };

    let gray = img
        .resize_exact(GRID_WIDTH, GRID_HEIGHT, FilterType::Triangle)
        .to_luma8();

    let mut hash: u64 = 0;
    let mut bit = 0;

    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH - 1 {
            let left = gray.get_pixel(x, y)[0];
            let right = gray.get_pixel(x + 1, y)[0];

            if left > right {
                hash |= 1u64 << bit;
            }
            bit += 1;
        }
    }

    Some(hash)
}

/// Hamming distance between two 64-bit hashes.
///
/// The number of differing bits: 0 means identical structure, and
/// empirically anything up to ~10 is likely the same scene. No threshold is
/// enforced here; callers interpret the distance.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}
