//! SQLite index backend for persistent storage.

use super::{DuplicateIndex, MediaRecord};
use crate::error::IndexError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Timestamp layout used for the `taken` column.
const TAKEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite-backed persistent index
///
/// Uses WAL (Write-Ahead Logging) mode for better concurrent access.
/// The pipeline itself is single-writer; the mutex is for `Send + Sync`
/// correctness, not for cross-process coordination.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteIndex {
    /// Open or create an index database at the given path
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| IndexError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| IndexError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS media_files (
                id TEXT PRIMARY KEY,
                path TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                perceptual_hash INTEGER,
                taken TEXT,
                year INTEGER
            )",
            [],
        )
        .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        // Non-unique on purpose: dedup is enforced by check-before-insert,
        // not by the storage layer
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_content_hash ON media_files(content_hash)",
            [],
        )
        .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_year ON media_files(year)",
            [],
        )
        .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, IndexError> {
        self.conn.lock().map_err(|_| IndexError::Corrupted {
            path: self.db_path.clone(),
        })
    }

    /// u64 hashes round-trip through SQLite's signed 64-bit integers
    fn hash_to_stored(hash: Option<u64>) -> Option<i64> {
        hash.map(|h| h as i64)
    }

    fn stored_to_hash(stored: Option<i64>) -> Option<u64> {
        stored.map(|s| s as u64)
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MediaRecord> {
        let taken: Option<String> = row.get(4)?;
        Ok(MediaRecord {
            id: row.get(0)?,
            path: PathBuf::from(row.get::<_, String>(1)?),
            content_hash: row.get(2)?,
            perceptual_hash: Self::stored_to_hash(row.get(3)?),
            taken: taken.and_then(|t| NaiveDateTime::parse_from_str(&t, TAKEN_FORMAT).ok()),
            year: row.get(5)?,
        })
    }
}

impl DuplicateIndex for SqliteIndex {
    fn insert(&self, record: &MediaRecord) -> Result<(), IndexError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO media_files (id, path, content_hash, perceptual_hash, taken, year)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                record.id,
                record.path.to_string_lossy(),
                record.content_hash,
                Self::hash_to_stored(record.perceptual_hash),
                record.taken.map(|t| t.format(TAKEN_FORMAT).to_string()),
                record.year,
            ],
        )
        .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn update(&self, record: &MediaRecord) -> Result<(), IndexError> {
        let conn = self.lock()?;

        conn.execute(
            "UPDATE media_files
             SET path = ?, content_hash = ?, perceptual_hash = ?, taken = ?, year = ?
             WHERE id = ?",
            params![
                record.path.to_string_lossy(),
                record.content_hash,
                Self::hash_to_stored(record.perceptual_hash),
                record.taken.map(|t| t.format(TAKEN_FORMAT).to_string()),
                record.year,
                record.id,
            ],
        )
        .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn find_by_hash(&self, content_hash: &str) -> Result<Option<MediaRecord>, IndexError> {
        let conn = self.lock()?;

        let result = conn.query_row(
            "SELECT id, path, content_hash, perceptual_hash, taken, year
             FROM media_files WHERE content_hash = ? LIMIT 1",
            [content_hash],
            Self::row_to_record,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(IndexError::QueryFailed(e.to_string())),
        }
    }

    fn find_by_year(&self, year: i32) -> Result<Vec<MediaRecord>, IndexError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, path, content_hash, perceptual_hash, taken, year
                 FROM media_files WHERE year = ?",
            )
            .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        let records = stmt
            .query_map([year], Self::row_to_record)
            .map_err(|e| IndexError::QueryFailed(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| IndexError::QueryFailed(e.to_string()))?;

        Ok(records)
    }

    fn count(&self) -> Result<usize, IndexError> {
        let conn = self.lock()?;

        conn.query_row("SELECT COUNT(*) FROM media_files", [], |row| {
            row.get::<_, i64>(0).map(|v| v as usize)
        })
        .map_err(|e| IndexError::QueryFailed(e.to_string()))
    }
}
