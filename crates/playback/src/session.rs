//! Playback session state machine.
//!
//! `PlaybackSession` owns one playback attempt: one track, from start to
//! completion or interruption, with the LED tracking loudness the whole
//! way. It is a pure, `no_std`, allocation-free state machine driven by
//! explicit ticks — it performs **no** I/O and never sleeps. The real-time
//! driver (the firmware controller) samples the hardware, calls
//! [`advance`], and applies the returned side effects; a test harness does
//! the same with synthetic inputs and no clock.
//!
//! [`advance`]: PlaybackSession::advance

use platform::storage::TrackPath;

use crate::loudness::brightness_for;

/// State of the current playback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No track bound.
    Idle,
    /// Track bound, start requested on the device, outcome not yet known.
    Starting,
    /// Track playing; each tick maps loudness onto the LED.
    Playing,
    /// Stop requested on the device; awaiting the final tick.
    Stopping,
    /// Session over. The LED has been commanded off on every path here.
    Ended(EndReason),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The device played the track to completion.
    Completed,
    /// A button press cut the track off.
    Interrupted,
    /// The device refused the stream (not a decodable file).
    Unplayable,
}

/// Hardware readings fed into one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Device still reports a bound, playing track.
    pub still_playing: bool,
    /// Raw loudness of the most recently decoded frame.
    pub loudness: u16,
    /// A debounced press was observed on either button this tick.
    pub interrupt: bool,
}

/// Side effects the driver must apply after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutput {
    /// LED brightness to write, if any.
    pub led: Option<u8>,
    /// Request `stop()` on the audio device.
    pub stop_audio: bool,
}

impl TickOutput {
    const NONE: Self = Self {
        led: None,
        stop_audio: false,
    };

    const LED_OFF: Self = Self {
        led: Some(0),
        stop_audio: false,
    };
}

/// Errors returned by session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `begin` requires the `Idle` state — one track at a time.
    NotIdle,
    /// `mark_started` / `mark_unplayable` require the `Starting` state.
    NotStarting,
}

/// Pure state machine for one playback attempt.
///
/// All fields are private; state is mutated only through the method API.
/// No allocations, no I/O, no hardware dependencies.
pub struct PlaybackSession {
    state: SessionState,
    track: Option<TrackPath>,
    last_loudness: u16,
    ticks: u32,
}

impl PlaybackSession {
    /// Create a session in the `Idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
            track: None,
            last_loudness: 0,
            ticks: 0,
        }
    }

    /// Bind `track` and move to `Starting`.
    ///
    /// The caller is expected to request `start` on the audio device next,
    /// then report the outcome via [`mark_started`] or [`mark_unplayable`].
    ///
    /// # Errors
    ///
    /// Returns `Err(SessionError::NotIdle)` if a track is already bound —
    /// at most one track may be active at any instant.
    ///
    /// [`mark_started`]: PlaybackSession::mark_started
    /// [`mark_unplayable`]: PlaybackSession::mark_unplayable
    pub fn begin(&mut self, track: TrackPath) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::NotIdle);
        }
        self.track = Some(track);
        self.state = SessionState::Starting;
        Ok(())
    }

    /// The device accepted the stream: `Starting → Playing`.
    ///
    /// # Errors
    ///
    /// Returns `Err(SessionError::NotStarting)` outside of `Starting`.
    pub fn mark_started(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Starting {
            return Err(SessionError::NotStarting);
        }
        self.state = SessionState::Playing;
        Ok(())
    }

    /// The device refused the stream: `Starting → Ended(Unplayable)`.
    ///
    /// Returns the side effects to apply — the LED is commanded off, per
    /// the release-on-exit contract, even though playback never began.
    ///
    /// # Errors
    ///
    /// Returns `Err(SessionError::NotStarting)` outside of `Starting`.
    pub fn mark_unplayable(&mut self) -> Result<TickOutput, SessionError> {
        if self.state != SessionState::Starting {
            return Err(SessionError::NotStarting);
        }
        self.state = SessionState::Ended(EndReason::Unplayable);
        Ok(TickOutput::LED_OFF)
    }

    /// Advance one tick.
    ///
    /// Transition table:
    ///
    /// | State      | Condition           | Next                  | Effects              |
    /// |------------|---------------------|-----------------------|----------------------|
    /// | `Playing`  | interrupt           | `Stopping`            | stop audio, LED 0    |
    /// | `Playing`  | not still playing   | `Ended(Completed)`    | LED 0                |
    /// | `Playing`  | otherwise           | `Playing`             | LED = f(loudness)    |
    /// | `Stopping` | —                   | `Ended(Interrupted)`  | LED 0                |
    /// | `Ended`    | —                   | `Ended`               | LED 0 (idempotent)   |
    /// | other      | —                   | unchanged             | none                 |
    ///
    /// The `Stopping` arm ignores `input` entirely: once a stop has been
    /// requested, no further loudness sample reaches the LED.
    pub fn advance(&mut self, input: TickInput) -> TickOutput {
        self.ticks = self.ticks.saturating_add(1);
        match self.state {
            SessionState::Idle | SessionState::Starting => TickOutput::NONE,
            SessionState::Playing => {
                if input.interrupt {
                    self.state = SessionState::Stopping;
                    TickOutput {
                        led: Some(0),
                        stop_audio: true,
                    }
                } else if input.still_playing {
                    self.last_loudness = input.loudness;
                    TickOutput {
                        led: Some(brightness_for(input.loudness)),
                        stop_audio: false,
                    }
                } else {
                    self.state = SessionState::Ended(EndReason::Completed);
                    TickOutput::LED_OFF
                }
            }
            SessionState::Stopping => {
                self.state = SessionState::Ended(EndReason::Interrupted);
                TickOutput::LED_OFF
            }
            SessionState::Ended(_) => TickOutput::LED_OFF,
        }
    }

    /// Whether the session still needs ticking.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            SessionState::Starting | SessionState::Playing | SessionState::Stopping
        )
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Why the session ended, once it has.
    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        match self.state {
            SessionState::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    /// The bound track, if any.
    #[must_use]
    pub fn track(&self) -> Option<&TrackPath> {
        self.track.as_ref()
    }

    /// Loudness sample from the most recent playing tick.
    #[must_use]
    pub fn last_loudness(&self) -> u16 {
        self.last_loudness
    }

    /// Ticks consumed so far, across all states.
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}
