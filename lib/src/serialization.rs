//! Serialization of fitted preprocessing parameters.
//!
//! Fitted parameters are plain data (column names, category lists, means and
//! standard deviations) and are persisted with `bincode`. Writes go to a
//! temporary sibling file first and are renamed into place, so a run that
//! fails halfway never clobbers a previously persisted artifact. Sets of
//! artifacts go through [`write_all_atomic`], which stages all of them
//! before renaming any.

use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data, never open handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `bytes` to `path` via a temporary file and rename.
///
/// Parent directories are created as needed.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
    write_all_atomic(&[(path.as_ref(), bytes)])
}

/// Write a set of files, staging every one before any is renamed into place.
///
/// If any file cannot be staged, all temporaries are removed and none of the
/// targets is touched.
pub fn write_all_atomic<P: AsRef<Path>>(files: &[(P, &[u8])]) -> io::Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        let path = path.as_ref();
        let tmp = temp_path(path);
        if let Err(e) = create_parent(path).and_then(|_| fs::write(&tmp, bytes)) {
            fs::remove_file(&tmp).ok();
            for (tmp, _) in &staged {
                fs::remove_file(tmp).ok();
            }
            return Err(e);
        }
        staged.push((tmp, path));
    }

    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp, path) {
            for (tmp, _) in &staged[i..] {
                fs::remove_file(tmp).ok();
            }
            return Err(e);
        }
    }
    Ok(())
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stats {
        columns: Vec<String>,
        mean: Vec<f64>,
    }

    #[test]
    fn test_params_bytes_round_trip() {
        let stats = Stats {
            columns: vec!["LotArea".to_string()],
            mean: vec![10_150.5],
        };
        let bytes = stats.to_bytes().unwrap();
        assert_eq!(Stats::from_bytes(&bytes).unwrap(), stats);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Stats::from_bytes(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = std::env::temp_dir().join("ames_write_atomic_test");
        let path = dir.join("nested").join("params.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_write_all_atomic_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("out").join("train.csv");
        let b = dir.path().join("params.json");

        write_all_atomic(&[(&a, b"a,b\n".as_slice()), (&b, b"{}".as_slice())]).unwrap();

        assert_eq!(fs::read(&a).unwrap(), b"a,b\n");
        assert_eq!(fs::read(&b).unwrap(), b"{}");
        assert!(!temp_path(&a).exists());
        assert!(!temp_path(&b).exists());
    }

    #[test]
    fn test_write_all_atomic_failure_keeps_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("processed.csv");
        fs::write(&kept, b"old").unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let unreachable = blocker.join("params.bin");

        let result = write_all_atomic(&[(&kept, b"new".as_slice()), (&unreachable, b"x".as_slice())]);

        assert!(result.is_err());
        assert_eq!(fs::read(&kept).unwrap(), b"old");
        assert!(!temp_path(&kept).exists());
    }
}
