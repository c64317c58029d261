//! In-memory index backend for testing.

use super::{DuplicateIndex, MediaRecord};
use crate::error::IndexError;
use std::path::PathBuf;
use std::sync::RwLock;

/// In-memory index backend
///
/// Useful for testing and dry runs where persistence isn't needed.
pub struct InMemoryIndex {
    records: RwLock<Vec<MediaRecord>>,
}

impl InMemoryIndex {
    /// Create a new in-memory index
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateIndex for InMemoryIndex {
    fn insert(&self, record: &MediaRecord) -> Result<(), IndexError> {
        let mut records = self.records.write().map_err(|_| IndexError::Corrupted {
            path: PathBuf::from("memory"),
        })?;

        records.push(record.clone());
        Ok(())
    }

    fn update(&self, record: &MediaRecord) -> Result<(), IndexError> {
        let mut records = self.records.write().map_err(|_| IndexError::Corrupted {
            path: PathBuf::from("memory"),
        })?;

        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = record.clone();
        }
        Ok(())
    }

    fn find_by_hash(&self, content_hash: &str) -> Result<Option<MediaRecord>, IndexError> {
        let records = self.records.read().map_err(|_| IndexError::Corrupted {
            path: PathBuf::from("memory"),
        })?;

        Ok(records.iter().find(|r| r.content_hash == content_hash).cloned())
    }

    fn find_by_year(&self, year: i32) -> Result<Vec<MediaRecord>, IndexError> {
        let records = self.records.read().map_err(|_| IndexError::Corrupted {
            path: PathBuf::from("memory"),
        })?;

        Ok(records.iter().filter(|r| r.year == Some(year)).cloned().collect())
    }

    fn count(&self) -> Result<usize, IndexError> {
        let records = self.records.read().map_err(|_| IndexError::Corrupted {
            path: PathBuf::from("memory"),
        })?;

        Ok(records.len())
    }
}
