//! Streaming BLAKE3 digest of a single file.
//!
//! The file handle is scoped to [`hash_file`] and released on every exit
//! path. The whole content is streamed through an incremental hasher; a
//! partial read is an error, never a digest.

use std::fs::File;
use std::io;
use std::path::Path;

use super::{HashError, HashPair};

/// Fixed-size content digest. Equal content yields equal digests.
pub type Digest = [u8; 32];

/// Compute the content digest of one file.
///
/// Opens the file, streams its entire content through a BLAKE3 hasher and
/// returns the `(digest, path, size)` pair. Open and read failures are
/// reported per file so the surrounding scan can continue.
pub fn hash_file(path: &Path) -> Result<HashPair, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    let mut hasher = blake3::Hasher::new();

    let size = io::copy(&mut file, &mut hasher).map_err(|e| HashError::from_io(path, e))?;
    log::trace!("Hashed {} ({} bytes)", path.display(), size);

    Ok(HashPair {
        digest: *hasher.finalize().as_bytes(),
        path: path.to_path_buf(),
        size,
    })
}

/// Render a digest as 64 lowercase hexadecimal characters.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_identical_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("deep").join("b.txt");
        fs::create_dir(dir.path().join("deep")).unwrap();
        fs::write(&a, b"hello").unwrap();
        fs::write(&b, b"hello").unwrap();

        let pa = hash_file(&a).unwrap();
        let pb = hash_file(&b).unwrap();

        assert_eq!(pa.digest, pb.digest);
        assert_eq!(pa.size, 5);
        assert_eq!(pa.path, a);
        assert_eq!(pb.path, b);
    }

    #[test]
    fn test_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"hello").unwrap();
        fs::write(&b, b"world").unwrap();

        assert_ne!(hash_file(&a).unwrap().digest, hash_file(&b).unwrap().digest);
    }

    #[test]
    fn test_digest_is_stable_across_reads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stable.bin");
        fs::write(&path, vec![0xAB; 1 << 16]).unwrap();

        assert_eq!(
            hash_file(&path).unwrap().digest,
            hash_file(&path).unwrap().digest
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = hash_file(&dir.path().join("gone.txt")).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }

    #[test]
    fn test_digest_to_hex_format() {
        let digest: Digest = [0u8; 32];
        let hex = digest_to_hex(&digest);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == '0'));

        let mut digest: Digest = [0u8; 32];
        digest[31] = 0xFF;
        assert!(digest_to_hex(&digest).ends_with("ff"));
    }
}
