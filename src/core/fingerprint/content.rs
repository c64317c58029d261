//! Exact content fingerprint: streamed SHA-256.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

/// Read buffer size. Bounds peak memory independent of file size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the hex-encoded SHA-256 digest of a file's full contents.
///
/// The file is streamed in fixed-size chunks rather than loaded whole.
///
/// On any read failure (permissions, I/O error, file vanished) this returns
/// a freshly generated random sentinel instead of an error. The sentinel is
/// unique per call, so a hashing failure can never make two unrelated files
/// look identical - at the cost that two unreadable files are never
/// recognized as duplicates of each other, even when byte-identical.
pub fn content_hash(path: &Path) -> String {
    match hash_stream(path) {
        Ok(hex) => hex,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "content hash failed, using sentinel");
            Uuid::new_v4().simple().to_string()
        }
    }
}

fn hash_stream(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    #[test]
    fn identical_contents_produce_identical_hash() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"same bytes");
        let b = write_file(&dir, "b.jpg", b"same bytes");

        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn different_contents_produce_different_hash() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"first");
        let b = write_file(&dir, "b.jpg", b"second");

        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "known.txt", b"abc");

        // Well-known SHA-256 of "abc"
        assert_eq!(
            content_hash(&path),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn unreadable_file_yields_unique_sentinel_per_call() {
        let missing = Path::new("/nonexistent/photo.jpg");

        let first = content_hash(missing);
        let second = content_hash(missing);

        // The sentinel must never alias two failures as duplicates
        assert_ne!(first, second);
    }

    #[test]
    fn empty_file_hashes_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.bin", b"");

        assert_eq!(
            content_hash(&path),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
