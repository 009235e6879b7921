//! Storage abstraction for the SD card.
//!
//! Two operations matter to the application: list the playable files in a
//! zone directory, and open one of them for streaming read. Mounting,
//! block I/O, and filesystem details stay inside the implementation.

use heapless::{String, Vec};

use crate::config::{MAX_PATH_LEN, MAX_TRACKS};

/// Path of one file on the card, relative to the mount root.
pub type TrackPath = String<MAX_PATH_LEN>;

/// Listing of eligible files in one zone directory.
///
/// Already filtered by extension; directories over [`MAX_TRACKS`] entries
/// are truncated, not an error.
pub type TrackList = Vec<TrackPath, MAX_TRACKS>;

/// Storage trait for file system access.
pub trait Storage {
    /// Error type.
    ///
    /// A listing error (missing directory, card I/O) is recoverable at the
    /// controller boundary — the zone is treated as temporarily unavailable.
    type Error: core::fmt::Debug;
    /// File type.
    type File: File;

    /// List files in `dir` whose names end with `ext`.
    fn list_tracks(
        &mut self,
        dir: &str,
        ext: &str,
    ) -> impl core::future::Future<Output = Result<TrackList, Self::Error>>;

    /// Open a file for streaming read.
    fn open_file(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;
}

/// File trait for reading files.
pub trait File {
    /// Error type.
    type Error: core::fmt::Debug;

    /// Read from the current position. Returns 0 at end of file.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Get file size.
    fn size(&self) -> u64;
}
