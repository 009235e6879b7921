//! Application configuration and tunable constants.
//!
//! Central configuration values used across the firmware. All timing,
//! brightness, and layout decisions reference these constants rather than
//! hardcoding values at the call site.

/// The application name, used in log banners.
pub const APP_NAME: &str = "Mr Bear";

/// Application version (synchronized with Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Poll interval of the playback loop in milliseconds.
///
/// Each tick samples loudness, writes the LED, and checks both buttons.
/// This is also the worst-case latency from a paw press to the clip
/// being cut off.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Minimum spacing between two reported presses of the same button.
///
/// Two raw edges closer together than this are one physical press with
/// contact bounce.
pub const DEBOUNCE_MS: u64 = 200;

/// Multiplier applied to raw decoder loudness before clamping to 0–255.
///
/// Raw per-frame RMS values from the MP3 decoder are small; without
/// amplification the LED barely glows. Tunable — the toy shipped with ×2,
/// earlier prototypes used ×3.
pub const LOUDNESS_GAIN: u16 = 2;

/// Extension of eligible track files, matched case-sensitively.
pub const TRACK_EXTENSION: &str = ".mp3";

/// Maximum tracks listed per zone directory. Extra files are ignored.
pub const MAX_TRACKS: usize = 32;

/// Maximum length of a track path in bytes.
pub const MAX_PATH_LEN: usize = 64;

/// Blink count signalled on a hardware initialisation failure at boot.
pub const INIT_FAULT_BLINKS: u8 = 5;

/// Blink count signalled on an unclassified failure in the main loop.
///
/// Distinct from [`INIT_FAULT_BLINKS`] so the two fault classes can be
/// told apart without a debug probe attached.
pub const RUNTIME_FAULT_BLINKS: u8 = 3;

/// On/off half-period of a fault blink in milliseconds.
pub const BLINK_INTERVAL_MS: u64 = 250;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_patterns_are_distinct() {
        // The two fault classes must be distinguishable by eye.
        assert_ne!(INIT_FAULT_BLINKS, RUNTIME_FAULT_BLINKS);
    }

    #[test]
    fn test_debounce_exceeds_poll_interval() {
        // A single press must never fire on two consecutive poll ticks.
        assert!(DEBOUNCE_MS > POLL_INTERVAL_MS);
    }
}
