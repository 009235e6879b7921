//! Paw button input abstraction.
//!
//! Each paw hides one momentary switch, active low with a pull-up. A press
//! reaches the application only as a debounced boolean edge — raw levels
//! never cross this boundary, so contact bounce cannot double-trigger the
//! controller.

use embassy_time::{Duration, Instant};

/// A debounced momentary button.
pub trait ButtonInput {
    /// Whether the button has been pressed since the last poll.
    ///
    /// Implementations enforce the debounce window internally: two `true`
    /// results are always separated by at least
    /// [`crate::config::DEBOUNCE_MS`] milliseconds.
    fn was_pressed(&mut self) -> bool;
}

/// Pure debounce state machine.
///
/// Decoupled from real time: callers pass `now` explicitly, so the same
/// code runs against the hardware clock and against synthetic instants in
/// tests. A press fires on a pressed level only when at least `window` has
/// elapsed since the previous fire.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_fire: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given minimum spacing between presses.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fire: None,
        }
    }

    /// Evaluate one poll at time `now` with the given raw pressed level.
    ///
    /// Returns `true` when a debounced press fires.
    pub fn poll(&mut self, now: Instant, pressed: bool) -> bool {
        if !pressed {
            return false;
        }
        let fire = match self.last_fire {
            None => true,
            Some(prev) => now
                .checked_duration_since(prev)
                .is_some_and(|elapsed| elapsed >= self.window),
        };
        if fire {
            self.last_fire = Some(now);
        }
        fire
    }
}
