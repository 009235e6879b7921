//! Fault classification and the LED blink codes that report them.
//!
//! The toy has no display and no serial header on the production PCB, so
//! unrecoverable faults are reported by blinking the chest LED a fixed
//! number of times before resetting. Two classes are distinguishable by
//! eye: boot-time hardware failures and failures inside the main cycle.

use platform::config::{INIT_FAULT_BLINKS, RUNTIME_FAULT_BLINKS};
use thiserror_no_std::Error;

/// An unrecoverable fault. Recoverable conditions (empty zone, a track
/// that will not decode) never surface here — the cycle logs them and
/// goes back to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// SD card would not mount or the FAT volume is unreadable at boot.
    #[error("storage initialisation failed")]
    StorageInit,
    /// Audio path would not come up at boot.
    #[error("audio initialisation failed")]
    AudioInit,
    /// Deep sleep entry failed; the power state is unknown.
    #[error("deep sleep entry failed")]
    Sleep,
}

impl Fault {
    /// Number of LED blinks used to signal this fault class.
    #[must_use]
    pub const fn blinks(self) -> u8 {
        match self {
            Self::StorageInit | Self::AudioInit => INIT_FAULT_BLINKS,
            Self::Sleep => RUNTIME_FAULT_BLINKS,
        }
    }
}
