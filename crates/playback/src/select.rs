//! Track selection policy.
//!
//! Given a zone's already-filtered track listing, pick one uniformly at
//! random. Pure selection over a snapshot — the listing is not re-read and
//! nothing is mutated.

use platform::storage::TrackPath;
use rand_core::RngCore;

/// Errors from track selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// The zone's filtered listing is empty.
    ///
    /// Recoverable: the controller logs it and treats the zone as
    /// temporarily unavailable.
    NoTracks,
}

/// Select one track uniformly at random from `tracks`.
///
/// # Errors
///
/// Returns [`SelectError::NoTracks`] when the listing is empty.
pub fn select_track<'a>(
    tracks: &'a [TrackPath],
    rng: &mut impl RngCore,
) -> Result<&'a TrackPath, SelectError> {
    // checked_rem doubles as the emptiness check: rem by 0 is None.
    let idx = (rng.next_u32() as usize)
        .checked_rem(tracks.len())
        .ok_or(SelectError::NoTracks)?;
    tracks.get(idx).ok_or(SelectError::NoTracks)
}
