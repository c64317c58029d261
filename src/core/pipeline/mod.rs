//! # Pipeline Module
//!
//! Orchestrates the full workflow: walk the source tree, fingerprint and
//! date each file, classify it against the index, move it into place, and
//! record it.
//!
//! Files are processed one at a time, in whatever order the directory walk
//! yields them - correctness never depends on enumeration order. Every
//! per-file failure is caught at the smallest possible scope and reported
//! as that file's outcome; no single bad file halts the batch. The only
//! fatal conditions are an unusable output root and an unopenable index.
//!
//! Because processing is sequential, the "check index, then insert" pair
//! needs no locking. A parallel implementation would have to serialize
//! that pair per hash to keep at most one record per content hash.

use crate::core::classify::{ClassificationEngine, MediaKind, Outcome};
use crate::core::date::resolve_taken;
use crate::core::fingerprint::{content_hash, visual_hash};
use crate::core::index::{DuplicateIndex, InMemoryIndex, MediaRecord};
use crate::core::router::FileRouter;
use crate::error::OrganizerError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// The reported fate of one source file.
///
/// Exactly one of these is emitted per file processed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Moved into a year folder (or `_UnknownYear`) and recorded
    Filed {
        source: PathBuf,
        dest: PathBuf,
        year: Option<i32>,
    },
    /// Content already indexed; moved to `_Duplicates`, no new record
    Duplicate { source: PathBuf, dest: PathBuf },
    /// Not a recognized media type; moved to `_Unsupported`, no record
    Unsupported { source: PathBuf, dest: PathBuf },
    /// Something went wrong with this file; it was left where it was
    /// (or partially routed) and the batch continued
    Error { source: PathBuf, message: String },
}

impl FileOutcome {
    fn error(source: &Path, message: impl ToString) -> Self {
        FileOutcome::Error {
            source: source.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Summary of one organizing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    /// Files encountered in the source tree
    pub total_files: usize,
    /// Files moved into a year folder or `_UnknownYear` and recorded
    pub filed: usize,
    /// Files routed to `_Duplicates`
    pub duplicates: usize,
    /// Files routed to `_Unsupported`
    pub unsupported: usize,
    /// Per-file error descriptions (non-fatal)
    pub errors: Vec<String>,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

/// Builder for [`Organizer`]
pub struct OrganizerBuilder {
    source: PathBuf,
    output: PathBuf,
    index: Option<Box<dyn DuplicateIndex>>,
}

impl OrganizerBuilder {
    /// Set the duplicate index backend.
    ///
    /// Defaults to an in-memory index, which dedups within the run but
    /// remembers nothing across runs.
    pub fn index(mut self, index: Box<dyn DuplicateIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the organizer
    pub fn build(self) -> Organizer {
        Organizer {
            source: self.source,
            output: self.output,
            index: self.index.unwrap_or_else(|| Box::new(InMemoryIndex::new())),
        }
    }
}

/// The organizing pipeline
pub struct Organizer {
    source: PathBuf,
    output: PathBuf,
    index: Box<dyn DuplicateIndex>,
}

impl Organizer {
    /// Start building an organizer for a source and output root
    pub fn builder(source: PathBuf, output: PathBuf) -> OrganizerBuilder {
        OrganizerBuilder {
            source,
            output,
            index: None,
        }
    }

    /// Run the pipeline, discarding per-file outcomes
    pub fn run(&self) -> Result<OrganizeReport, OrganizerError> {
        self.run_with_observer(|_| {})
    }

    /// Run the pipeline, reporting each file's outcome as it happens
    pub fn run_with_observer<F>(&self, mut observer: F) -> Result<OrganizeReport, OrganizerError>
    where
        F: FnMut(&FileOutcome),
    {
        let start = Instant::now();

        if !self.source.is_dir() {
            return Err(OrganizerError::SourceNotFound {
                path: self.source.clone(),
            });
        }

        // Fatal: no writable destination, no run
        let router = FileRouter::create(&self.output)?;
        let engine = ClassificationEngine::new(self.index.as_ref());

        let mut report = OrganizeReport::default();

        // Snapshot the file list before moving anything, and never descend
        // into the output tree itself: an output root nested inside the
        // source must not be re-walked, and the index database living under
        // it must stay out of the batch
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.source)
            .into_iter()
            .filter_entry(|e| {
                e.path() == self.source.as_path() || !e.path().starts_with(&self.output)
            });
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    report.errors.push(e.to_string());
                }
            }
        }

        tracing::info!(count = files.len(), source = %self.source.display(), "found files");

        for path in files {
            report.total_files += 1;

            let outcome = self.process_file(&engine, &router, &path);
            match &outcome {
                FileOutcome::Filed { dest, .. } => {
                    tracing::info!(source = %path.display(), dest = %dest.display(), "filed");
                    report.filed += 1;
                }
                FileOutcome::Duplicate { .. } => {
                    tracing::info!(source = %path.display(), "duplicate");
                    report.duplicates += 1;
                }
                FileOutcome::Unsupported { .. } => {
                    tracing::info!(source = %path.display(), "unsupported");
                    report.unsupported += 1;
                }
                FileOutcome::Error { message, .. } => {
                    tracing::warn!(source = %path.display(), error = %message, "file failed");
                    report
                        .errors
                        .push(format!("{}: {}", path.display(), message));
                }
            }
            observer(&outcome);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Process one file from kind detection through index insert.
    ///
    /// Everything that can go wrong here becomes this file's outcome; the
    /// caller just keeps iterating.
    fn process_file(
        &self,
        engine: &ClassificationEngine<'_>,
        router: &FileRouter,
        path: &Path,
    ) -> FileOutcome {
        let kind = MediaKind::from_path(path);

        // Short-circuit before fingerprinting: unsupported files never
        // reach the index, so hashing them is wasted work
        if !kind.is_supported() {
            return match router.route(path, Outcome::Unsupported) {
                Ok(dest) => FileOutcome::Unsupported {
                    source: path.to_path_buf(),
                    dest,
                },
                Err(e) => FileOutcome::error(path, e),
            };
        }

        // Transient fingerprint bundle, owned here for this one file
        let content_hash = content_hash(path);
        let perceptual_hash = if kind.is_image() {
            visual_hash(path)
        } else {
            None
        };
        let taken = resolve_taken(path, kind.is_image());

        let outcome = match engine.classify(&content_hash, taken) {
            Ok(outcome) => outcome,
            Err(e) => return FileOutcome::error(path, e),
        };

        let dest = match router.route(path, outcome) {
            Ok(dest) => dest,
            Err(e) => return FileOutcome::error(path, e),
        };

        match outcome {
            Outcome::Duplicate => FileOutcome::Duplicate {
                source: path.to_path_buf(),
                dest,
            },
            Outcome::Unsupported => FileOutcome::Unsupported {
                source: path.to_path_buf(),
                dest,
            },
            Outcome::Dated(_) | Outcome::UnknownYear => {
                // Record creation happens only after the confirmed move
                let record = MediaRecord::new(
                    dest.clone(),
                    content_hash,
                    perceptual_hash,
                    taken,
                    outcome.record_year(),
                );

                match self.index.insert(&record) {
                    Ok(()) => FileOutcome::Filed {
                        source: path.to_path_buf(),
                        dest,
                        year: record.year,
                    },
                    Err(e) => FileOutcome::error(path, e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::{DUPLICATES_DIR, UNKNOWN_YEAR_DIR, UNSUPPORTED_DIR};
    use std::fs;
    use tempfile::TempDir;

    fn organizer(source: &TempDir, output: &TempDir) -> Organizer {
        Organizer::builder(source.path().to_path_buf(), output.path().to_path_buf()).build()
    }

    #[test]
    fn empty_source_yields_empty_report() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let report = organizer(&source, &output).run().unwrap();

        assert_eq!(report.total_files, 0);
        assert_eq!(report.filed, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn missing_source_is_fatal() {
        let output = TempDir::new().unwrap();
        let org = Organizer::builder(
            PathBuf::from("/nonexistent/source"),
            output.path().to_path_buf(),
        )
        .build();

        assert!(matches!(
            org.run(),
            Err(OrganizerError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn text_file_routes_to_unsupported_without_record() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("notes.txt"), b"hello").unwrap();

        let org = organizer(&source, &output);
        let report = org.run().unwrap();

        assert_eq!(report.unsupported, 1);
        assert_eq!(report.filed, 0);
        assert!(output
            .path()
            .join(UNSUPPORTED_DIR)
            .join("notes.txt")
            .exists());
        assert_eq!(org.index.count().unwrap(), 0);
    }

    #[test]
    fn byte_identical_second_file_is_duplicate() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        // Not decodable as images, but extension-supported: dedup only
        // depends on content bytes
        fs::write(source.path().join("a.jpg"), b"same pixels").unwrap();
        fs::write(source.path().join("b.jpg"), b"same pixels").unwrap();

        let org = organizer(&source, &output);
        let report = org.run().unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.filed, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(org.index.count().unwrap(), 1);

        // One copy in _Duplicates, regardless of which was seen first
        let dups: Vec<_> = fs::read_dir(output.path().join(DUPLICATES_DIR))
            .unwrap()
            .collect();
        assert_eq!(dups.len(), 1);
    }

    #[test]
    fn undecodable_image_files_by_mtime_year() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        // No EXIF and not decodable: date falls back to mtime, which is now
        fs::write(source.path().join("photo.jpg"), b"not really a jpeg").unwrap();

        let org = organizer(&source, &output);
        let report = org.run().unwrap();

        assert_eq!(report.filed, 1);
        let current_year = chrono::Datelike::year(&chrono::Local::now());
        assert!(output
            .path()
            .join(format!("{:04}", current_year))
            .join("photo.jpg")
            .exists());

        let record = org
            .index
            .find_by_year(current_year)
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(record.year, Some(current_year));
        assert_eq!(record.perceptual_hash, None);
        assert!(record.taken.is_some());
    }

    #[test]
    fn video_files_by_mtime_without_perceptual_hash() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("clip.mp4"), b"fake video bytes").unwrap();

        let org = organizer(&source, &output);
        let report = org.run().unwrap();

        assert_eq!(report.filed, 1);
        assert_eq!(org.index.count().unwrap(), 1);

        let current_year = chrono::Datelike::year(&chrono::Local::now());
        let record = org
            .index
            .find_by_year(current_year)
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(record.perceptual_hash, None);
    }

    #[test]
    fn nested_directories_are_walked() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let nested = source.path().join("trip").join("day2");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.png"), b"deep file").unwrap();
        fs::write(source.path().join("top.png"), b"top file").unwrap();

        let report = organizer(&source, &output).run().unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.filed, 2);
    }

    #[test]
    fn observer_sees_one_outcome_per_file() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("a.jpg"), b"content a").unwrap();
        fs::write(source.path().join("b.txt"), b"content b").unwrap();

        let mut outcomes = Vec::new();
        let report = organizer(&source, &output)
            .run_with_observer(|o| outcomes.push(format!("{:?}", o)))
            .unwrap();

        assert_eq!(outcomes.len(), report.total_files);
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn files_under_nested_output_are_not_processed() {
        let source = TempDir::new().unwrap();
        let output_path = source.path().join("organized");

        // Already-organized content under the output root stays put
        fs::create_dir_all(output_path.join("2019")).unwrap();
        fs::write(output_path.join("2019").join("done.jpg"), b"already organized").unwrap();
        fs::write(source.path().join("new.jpg"), b"fresh").unwrap();

        let org = Organizer::builder(source.path().to_path_buf(), output_path.clone()).build();
        let report = org.run().unwrap();

        assert_eq!(report.total_files, 1);
        assert_eq!(report.filed, 1);
        assert!(output_path.join("2019").join("done.jpg").exists());
    }

    #[test]
    fn fixed_buckets_exist_even_for_empty_run() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        organizer(&source, &output).run().unwrap();

        assert!(output.path().join(DUPLICATES_DIR).is_dir());
        assert!(output.path().join(UNSUPPORTED_DIR).is_dir());
        assert!(output.path().join(UNKNOWN_YEAR_DIR).is_dir());
    }
}
