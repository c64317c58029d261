//! # Date Module
//!
//! Resolves a best-effort capture timestamp for a media file.
//!
//! ## Resolution order
//! For images, EXIF date tags are tried in reliability order:
//! 1. `DateTimeOriginal` - when the shutter fired
//! 2. `DateTimeDigitized` - when the frame was scanned or digitized
//! 3. `DateTime` - generic file modification tag inside the EXIF block
//!
//! The first tag that is present and parseable wins. Anything missing or
//! malformed means "try the next one", never an error. When the whole chain
//! comes up empty (or the file has no EXIF at all), the filesystem's
//! last-modified time is used. Non-images skip EXIF and go straight to the
//! last-modified time.
//!
//! The result may be wrong relative to the true capture time; downstream
//! classification only needs *some* date to compute a year bucket.

use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF date tags in priority order.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Resolve the capture timestamp for a file.
///
/// Returns `None` only when even the filesystem modification time is
/// unavailable (e.g. the file vanished mid-run). The caller degrades that
/// into the unknown-year bucket rather than failing the file.
pub fn resolve_taken(path: &Path, is_image: bool) -> Option<NaiveDateTime> {
    if is_image {
        if let Some(taken) = exif_taken(path) {
            return Some(taken);
        }
    }
    modified_time(path)
}

/// Walk the EXIF tag priority chain. `None` means fall back to mtime.
fn exif_taken(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(&file);
    let exif_reader = Reader::new().read_from_container(&mut bufreader).ok()?;

    DATE_TAGS.iter().find_map(|&tag| {
        let field = exif_reader.get_field(tag, In::PRIMARY)?;
        let raw = ascii_value(&field.value)?;
        parse_exif_datetime(raw)
    })
}

/// Parse EXIF date text, tolerating the non-standard colon-separated date.
///
/// EXIF writes `"2020:05:21 14:32:11"`; the date portion's colons are
/// normalized to dashes before generic parsing.
fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(['\0', ' ']);
    if trimmed.len() < 10 {
        return None;
    }

    let (date, rest) = trimmed.split_at(10);
    let normalized = format!("{}{}", date.replace(':', "-"), rest);

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S").ok()
}

fn ascii_value(value: &Value) -> Option<&str> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}

fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn parses_exif_colon_format() {
        let taken = parse_exif_datetime("2020:05:21 14:32:11").unwrap();
        assert_eq!(taken.year(), 2020);
        assert_eq!(taken.month(), 5);
        assert_eq!(taken.day(), 21);
        assert_eq!(taken.hour(), 14);
        assert_eq!(taken.second(), 11);
    }

    #[test]
    fn parses_already_dashed_format() {
        let taken = parse_exif_datetime("2020-05-21 14:32:11").unwrap();
        assert_eq!(taken.year(), 2020);
    }

    #[test]
    fn tolerates_trailing_nul() {
        let taken = parse_exif_datetime("2019:12:31 23:59:59\0").unwrap();
        assert_eq!(taken.year(), 2019);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_exif_datetime("not a date").is_none());
        assert!(parse_exif_datetime("").is_none());
        assert!(parse_exif_datetime("0000:00:00 00:00:00").is_none());
    }

    #[test]
    fn image_without_exif_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.jpg");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"no exif here").unwrap();
        drop(f);

        let taken = resolve_taken(&path, true).unwrap();
        let expected = modified_time(&path).unwrap();
        assert_eq!(taken, expected);
    }

    #[test]
    fn non_image_uses_mtime_directly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake video").unwrap();

        let taken = resolve_taken(&path, false).unwrap();
        let expected = modified_time(&path).unwrap();
        assert_eq!(taken, expected);
    }

    #[test]
    fn vanished_file_resolves_to_none() {
        assert!(resolve_taken(Path::new("/nonexistent/a.jpg"), true).is_none());
        assert!(resolve_taken(Path::new("/nonexistent/a.mp4"), false).is_none());
    }
}
