//! Audio playback abstraction.
//!
//! The device decodes MP3 and drives the speaker; the application only
//! starts, stops, and samples it. At most one track may be bound at a time
//! — `start` while a previous track is still playing is an implementation
//! error, and implementations are entitled to reject it.

use crate::storage::TrackPath;

/// MP3 playback device.
pub trait AudioPlayer {
    /// Error type.
    ///
    /// A `start` failure means the file could not be opened or is not a
    /// decodable MP3 stream — recoverable, the controller treats the track
    /// as unplayable.
    type Error: core::fmt::Debug;

    /// Open `track` and begin playing it.
    fn start(
        &mut self,
        track: &TrackPath,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop playback. Stopping an idle device is a no-op.
    fn stop(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Whether a track is currently playing.
    fn is_playing(&self) -> bool;

    /// Raw loudness of the most recently decoded frame.
    ///
    /// An RMS-like metric in the device's native range; 0 when nothing is
    /// playing. The LED mapping amplifies and clamps it — see
    /// `playback::loudness`.
    fn loudness(&self) -> u16;
}
