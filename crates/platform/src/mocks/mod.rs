//! Mock implementations for testing.
//!
//! This module provides mock implementations of all platform traits for use
//! in unit and integration tests. Each mock records the calls made against
//! it so tests can assert on hardware-visible behaviour (LED writes, audio
//! starts, armed wake sources) without real hardware.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // test scaffolding — counters cannot realistically overflow

use core::cell::Cell;

use heapless::{Deque, Vec};
use rand_core::{impls, Error as RngError, RngCore};

use crate::audio::AudioPlayer;
use crate::input::ButtonInput;
use crate::led::DimmableLed;
use crate::power::{PinWake, PowerControl, WakeReason};
use crate::storage::{File, Storage, TrackList, TrackPath};

/// Mock LED that records every brightness write.
#[derive(Default)]
pub struct MockLed {
    level: u8,
    writes: std::vec::Vec<u8>,
}

impl MockLed {
    /// Create a new mock LED, off.
    pub fn new() -> Self {
        Self::default()
    }

    /// All brightness values written, in order.
    pub fn writes(&self) -> &[u8] {
        &self.writes
    }

    /// Brightness writes that were not 0 (loudness-driven updates).
    pub fn lit_writes(&self) -> usize {
        self.writes.iter().filter(|&&w| w > 0).count()
    }
}

impl DimmableLed for MockLed {
    fn set_brightness(&mut self, level: u8) {
        self.level = level;
        self.writes.push(level);
    }

    fn brightness(&self) -> u8 {
        self.level
    }
}

/// Error returned by [`MockStorage`] when scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStorageError {
    /// The requested directory does not exist.
    NotFound,
}

/// In-memory file: a byte buffer with a read cursor.
pub struct MockFile {
    data: std::vec::Vec<u8>,
    pos: usize,
}

impl File for MockFile {
    type Error = MockStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.len().saturating_sub(self.pos);
        let n = remaining.min(buf.len());
        if let (Some(dst), Some(src)) = (buf.get_mut(..n), self.data.get(self.pos..self.pos + n)) {
            dst.copy_from_slice(src);
        }
        self.pos += n;
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Mock storage: a map of zone directory → track names.
#[derive(Default)]
pub struct MockStorage {
    dirs: std::vec::Vec<(std::string::String, std::vec::Vec<std::string::String>)>,
}

impl MockStorage {
    /// Create empty storage with no directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory with the given file names (extension included).
    pub fn with_dir(mut self, dir: &str, files: &[&str]) -> Self {
        self.dirs
            .push((dir.into(), files.iter().map(|f| (*f).into()).collect()));
        self
    }
}

impl Storage for MockStorage {
    type Error = MockStorageError;
    type File = MockFile;

    async fn list_tracks(&mut self, dir: &str, ext: &str) -> Result<TrackList, Self::Error> {
        let (_, files) = self
            .dirs
            .iter()
            .find(|(d, _)| d == dir)
            .ok_or(MockStorageError::NotFound)?;
        let mut tracks = TrackList::new();
        for name in files.iter().filter(|f| f.ends_with(ext)) {
            let mut path = TrackPath::new();
            let fits = path.push_str(dir).is_ok()
                && path.push('/').is_ok()
                && path.push_str(name).is_ok();
            if fits && tracks.push(path).is_err() {
                break;
            }
        }
        Ok(tracks)
    }

    async fn open_file(&mut self, _path: &str) -> Result<Self::File, Self::Error> {
        Ok(MockFile {
            data: std::vec![0u8; 16],
            pos: 0,
        })
    }
}

/// Error returned by [`MockAudio`] when scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAudioError {
    /// The stream is not a decodable MP3 file.
    Decode,
    /// `start` was called while a track was still bound.
    AlreadyPlaying,
}

/// Mock audio device with a scripted playing duration and loudness tape.
pub struct MockAudio {
    /// Play duration in polls, armed onto `playing_polls` by each `start`.
    script: usize,
    /// `is_playing` returns true while this is > 0, decrementing per call.
    playing_polls: Cell<usize>,
    /// Loudness returned per poll; the last value repeats.
    loudness_tape: std::vec::Vec<u16>,
    loudness_idx: Cell<usize>,
    /// Fail the next `start` with a decode error.
    fail_start: bool,
    started: std::vec::Vec<TrackPath>,
    stops: usize,
}

impl MockAudio {
    /// Device that plays each started track for `polls` poll cycles.
    pub fn playing_for(polls: usize) -> Self {
        Self {
            script: polls,
            playing_polls: Cell::new(0),
            loudness_tape: std::vec![7],
            loudness_idx: Cell::new(0),
            fail_start: false,
            started: std::vec::Vec::new(),
            stops: 0,
        }
    }

    /// Device whose `start` always fails with a decode error.
    pub fn unplayable() -> Self {
        let mut m = Self::playing_for(0);
        m.fail_start = true;
        m
    }

    /// Replace the loudness tape (one raw value per poll; last repeats).
    pub fn with_loudness(mut self, tape: &[u16]) -> Self {
        self.loudness_tape = tape.to_vec();
        self
    }

    /// Tracks passed to `start`, in order.
    pub fn started(&self) -> &[TrackPath] {
        &self.started
    }

    /// Number of `stop` calls.
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Loudness samples consumed so far.
    pub fn loudness_samples(&self) -> usize {
        self.loudness_idx.get()
    }

    fn arm(&self) {
        self.playing_polls.set(self.script);
    }
}

impl AudioPlayer for MockAudio {
    type Error = MockAudioError;

    async fn start(&mut self, track: &TrackPath) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(MockAudioError::Decode);
        }
        if self.playing_polls.get() > 0 {
            // Invariant: at most one track bound at a time.
            return Err(MockAudioError::AlreadyPlaying);
        }
        self.started.push(track.clone());
        self.arm();
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        self.stops += 1;
        self.playing_polls.set(0);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        let left = self.playing_polls.get();
        if left == 0 {
            return false;
        }
        self.playing_polls.set(left - 1);
        true
    }

    fn loudness(&self) -> u16 {
        let idx = self.loudness_idx.get();
        self.loudness_idx.set(idx + 1);
        self.loudness_tape
            .get(idx)
            .or_else(|| self.loudness_tape.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Mock button fed by a scripted press sequence, one entry per poll.
#[derive(Default)]
pub struct MockButton {
    script: Deque<bool, 32>,
}

impl MockButton {
    /// Button that never reports a press.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Button that reports the given per-poll press results, then false.
    pub fn script(presses: &[bool]) -> Self {
        let mut script = Deque::new();
        for &p in presses {
            let _ = script.push_back(p);
        }
        Self { script }
    }
}

impl ButtonInput for MockButton {
    fn was_pressed(&mut self) -> bool {
        self.script.pop_front().unwrap_or(false)
    }
}

/// Mock power manager with an injectable wake reason.
pub struct MockPower {
    wake: WakeReason,
    armed: Option<Vec<PinWake, 4>>,
    sleeps: usize,
}

impl MockPower {
    /// Power manager reporting the given wake reason.
    pub fn woken_by(wake: WakeReason) -> Self {
        Self {
            wake,
            armed: None,
            sleeps: 0,
        }
    }

    /// Wake sources armed by the last `deep_sleep` call, if any.
    pub fn armed(&self) -> Option<&[PinWake]> {
        self.armed.as_deref()
    }

    /// Number of `deep_sleep` calls.
    pub fn sleeps(&self) -> usize {
        self.sleeps
    }
}

impl PowerControl for MockPower {
    type Error = core::convert::Infallible;

    fn wake_reason(&mut self) -> WakeReason {
        self.wake
    }

    async fn deep_sleep(&mut self, sources: &[PinWake]) -> Result<(), Self::Error> {
        let mut armed = Vec::new();
        for &s in sources {
            let _ = armed.push(s);
        }
        self.armed = Some(armed);
        self.sleeps += 1;
        Ok(())
    }
}

/// Deterministic xorshift32 PRNG for track-selection tests.
///
/// Not cryptographic — hardware uses the TRNG; tests need repeatability.
pub struct TestRng(u32);

impl TestRng {
    /// Create a PRNG from a non-zero seed.
    pub const fn seeded(seed: u32) -> Self {
        Self(if seed == 0 { 0xDEAD_BEEF } else { seed })
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}
