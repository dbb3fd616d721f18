use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::{ContentHasher, Hash};

/// read a working-directory file, mapping a missing file to `PathNotFound`
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    if path.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    fs::read(path).map_err(|e| not_found_or_io(path, e))
}

/// hash a working-directory file without holding it in memory
pub fn hash_file(path: &Path) -> Result<Hash> {
    if path.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is a directory",
            path.display()
        )));
    }
    let mut file = File::open(path).map_err(|e| not_found_or_io(path, e))?;

    let mut hasher = ContentHasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).with_path(path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::NotFound {
        Error::PathNotFound(path.to_path_buf())
    } else {
        Error::Io {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_hash;
    use tempfile::tempdir;

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.txt");
        fs::write(&path, b"Hello, VCS!").unwrap();

        assert_eq!(read_file(&path).unwrap(), b"Hello, VCS!");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_file(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_read_directory_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(read_file(dir.path()), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_hash_file_matches_compute_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &content).unwrap();

        assert_eq!(hash_file(&path).unwrap(), compute_hash(&content));
    }

    #[test]
    fn test_hash_missing_file() {
        let dir = tempdir().unwrap();
        let result = hash_file(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }
}
