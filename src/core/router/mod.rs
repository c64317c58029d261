//! # Router Module
//!
//! Physical placement of files into the destination layout.
//!
//! ## Layout (persisted convention)
//! - `<output>/_Duplicates/`
//! - `<output>/_Unsupported/`
//! - `<output>/_UnknownYear/`
//! - `<output>/<year>/` - 4-digit decimal year
//!
//! ## Collision safety
//! If a file already exists at the exact destination, the incoming filename
//! gets a short random suffix before its extension and the move is retried
//! at the new path exactly once. The pre-existing file is never touched.

use crate::core::classify::Outcome;
use crate::error::{OrganizerError, RouteError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fixed bucket folder names.
pub const DUPLICATES_DIR: &str = "_Duplicates";
pub const UNSUPPORTED_DIR: &str = "_Unsupported";
pub const UNKNOWN_YEAR_DIR: &str = "_UnknownYear";

/// Length of the random rename suffix.
const SUFFIX_LEN: usize = 6;

/// The destination tree and the moves into it
pub struct FileRouter {
    output_root: PathBuf,
}

impl FileRouter {
    /// Create a router and the fixed layout under `output_root`.
    ///
    /// Failure here is fatal for the run: without a writable destination
    /// root there is nowhere to put anything.
    pub fn create(output_root: &Path) -> Result<Self, OrganizerError> {
        for dir in [
            output_root.to_path_buf(),
            output_root.join(DUPLICATES_DIR),
            output_root.join(UNSUPPORTED_DIR),
            output_root.join(UNKNOWN_YEAR_DIR),
        ] {
            fs::create_dir_all(&dir).map_err(|e| OrganizerError::OutputSetup {
                path: dir.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            output_root: output_root.to_path_buf(),
        })
    }

    /// The destination directory for an outcome
    pub fn dir_for(&self, outcome: Outcome) -> PathBuf {
        match outcome {
            Outcome::Unsupported => self.output_root.join(UNSUPPORTED_DIR),
            Outcome::Duplicate => self.output_root.join(DUPLICATES_DIR),
            Outcome::UnknownYear => self.output_root.join(UNKNOWN_YEAR_DIR),
            Outcome::Dated(year) => self.output_root.join(format!("{:04}", year)),
        }
    }

    /// Move `source` into the bucket for `outcome`, keeping its filename.
    ///
    /// Returns the final destination path, which differs from the obvious
    /// one when a collision forced a rename. Failure is recoverable per
    /// file: the caller reports it and moves on, and no record is created.
    pub fn route(&self, source: &Path, outcome: Outcome) -> Result<PathBuf, RouteError> {
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        self.safe_move(source, &self.dir_for(outcome), &filename)
    }

    /// Collision-safe move of `source` to `dest_dir/filename`.
    fn safe_move(
        &self,
        source: &Path,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, RouteError> {
        if !source.exists() {
            return Err(RouteError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        fs::create_dir_all(dest_dir).map_err(|e| RouteError::CreateDirectory {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let mut dest = dest_dir.join(filename);
        if dest.exists() {
            dest = dest_dir.join(disambiguate(filename));
            tracing::debug!(
                source = %source.display(),
                dest = %dest.display(),
                "destination exists, renaming"
            );
        }

        move_file(source, &dest).map_err(|e| RouteError::MoveFailed {
            source_path: source.to_path_buf(),
            dest: dest.clone(),
            reason: e.to_string(),
        })?;

        Ok(dest)
    }
}

/// Append a short random suffix before the extension.
///
/// Suffix generation is assumed collision-free in practice; no retry loop
/// beyond the one rename.
fn disambiguate(filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let suffix: String = Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string();

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", stem, suffix),
    }
}

/// Rename, falling back to copy+verify+delete across filesystems.
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::rename(source, dest).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, dest)?;

        // Verify destination size matches source before deleting
        let dest_size = fs::metadata(dest)?.len();
        if dest_size != source_size {
            let _ = fs::remove_file(dest);
            return Err(std::io::Error::other(format!(
                "copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            )));
        }

        fs::remove_file(source)
    })
}
