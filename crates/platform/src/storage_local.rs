//! Local filesystem Storage implementation for host-side work.
//!
//! `LocalStorage` implements [`crate::Storage`] using `std::fs`. Used when
//! the `std` feature is enabled (tests and tooling). All paths are resolved
//! relative to the root provided at construction, which stands in for the
//! SD card mount point.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::storage::{File, Storage, TrackList, TrackPath};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A [`Storage`] implementation backed by `std::fs`.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new storage rooted at `card_root`.
    #[must_use]
    pub fn new(card_root: &str) -> Self {
        Self {
            root: PathBuf::from(card_root),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for LocalStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn list_tracks(&mut self, dir: &str, ext: &str) -> Result<TrackList, Self::Error> {
        let mut tracks = TrackList::new();
        for entry in fs::read_dir(self.resolve(dir)).map_err(LocalStorageError)? {
            let entry = entry.map_err(LocalStorageError)?;
            if !entry.file_type().map_err(LocalStorageError)?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(ext) {
                continue;
            }
            let mut path = TrackPath::new();
            // Relative path: "<dir>/<name>". Oversized paths and overfull
            // directories are skipped, matching the fixed-capacity listing
            // contract of TrackList.
            let fits = path.push_str(dir).is_ok()
                && path.push('/').is_ok()
                && path.push_str(name).is_ok();
            if fits && tracks.push(path).is_err() {
                break;
            }
        }
        Ok(tracks)
    }

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let file = fs::File::open(self.resolve(path)).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile {
            inner: file,
            size: meta.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_storage_lists_only_matching_extension() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("left")).unwrap();
        fs::write(tmp.path().join("left/a.mp3"), b"x").unwrap();
        fs::write(tmp.path().join("left/b.mp3"), b"x").unwrap();
        fs::write(tmp.path().join("left/notes.txt"), b"x").unwrap();
        let mut storage = LocalStorage::new(tmp.path().to_str().unwrap());
        let tracks = storage.list_tracks("left", ".mp3").await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.ends_with(".mp3")));
    }

    #[tokio::test]
    async fn local_storage_empty_dir_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("right")).unwrap();
        let mut storage = LocalStorage::new(tmp.path().to_str().unwrap());
        let tracks = storage.list_tracks("right", ".mp3").await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn local_storage_missing_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalStorage::new(tmp.path().to_str().unwrap());
        assert!(storage.list_tracks("missing", ".mp3").await.is_err());
    }

    #[tokio::test]
    async fn local_storage_read_full_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test.bin"), b"hello world").unwrap();
        let mut storage = LocalStorage::new(tmp.path().to_str().unwrap());
        let mut file = storage.open_file("test.bin").await.unwrap();
        let mut buf = [0u8; 11];
        let n = file.read(&mut buf).await.unwrap();
        assert_eq!(n, 11);
        assert_eq!(&buf, b"hello world");
    }

    #[tokio::test]
    async fn local_storage_size_matches() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("size.bin"), [0u8; 64]).unwrap();
        let mut storage = LocalStorage::new(tmp.path().to_str().unwrap());
        let file = storage.open_file("size.bin").await.unwrap();
        assert_eq!(file.size(), 64);
    }
}
