//! Loudness-to-brightness mapping.
//!
//! The decoder reports a small RMS-like loudness per frame; the LED wants
//! 0–255. The mapping is a fixed amplification followed by a clamp — a
//! pure function, with the multiplier as the one tunable.

use platform::config::LOUDNESS_GAIN;

/// Map a raw loudness sample to an LED brightness level.
///
/// `brightness = clamp(raw × gain, 0, 255)`. Monotonic in `raw`; never
/// exceeds 255, never underflows (inputs are unsigned).
#[must_use]
pub fn brightness_for(raw: u16) -> u8 {
    let amplified = u32::from(raw).saturating_mul(u32::from(LOUDNESS_GAIN));
    #[allow(clippy::cast_possible_truncation)] // clamped to 255 on the line above the cast
    {
        amplified.min(255) as u8
    }
}

/// Root-mean-square level of one decoded PCM frame.
///
/// Samples are left-justified 32-bit; the result is scaled down to the
/// 0–~90 raw range the brightness mapping expects, comparable to what the
/// toy's original decoder reported per frame.
#[must_use]
pub fn rms_level(samples: &[i32]) -> u16 {
    if samples.is_empty() {
        return 0;
    }
    let mut acc: u64 = 0;
    for &s in samples {
        // Drop to 16-bit magnitude before squaring so the accumulator
        // cannot overflow even for maximal frames.
        let s16 = i64::from(s) >> 16;
        #[allow(clippy::cast_sign_loss)] // squared value is non-negative
        let sq = (s16.saturating_mul(s16)) as u64;
        acc = acc.saturating_add(sq);
    }
    let mean = acc.checked_div(samples.len() as u64).unwrap_or(0);
    let rms = isqrt(mean);
    // 16-bit RMS down to the raw loudness range (~0..=128).
    #[allow(clippy::cast_possible_truncation)] // bounded by the shift
    {
        (rms >> 8) as u16
    }
}

/// Integer square root (Newton's method), enough for 64-bit inputs.
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = x.checked_add(1).unwrap_or(u64::MAX).wrapping_div(2);
    while y < x {
        x = y;
        y = x.saturating_add(n.wrapping_div(x)).wrapping_div(2);
    }
    x
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#[allow(clippy::arithmetic_side_effects)] // literal test fixtures
mod tests {
    use super::*;

    #[test]
    fn test_brightness_zero_for_silence() {
        assert_eq!(brightness_for(0), 0);
    }

    #[test]
    fn test_brightness_applies_gain() {
        assert_eq!(brightness_for(10), (10 * LOUDNESS_GAIN).min(255) as u8);
    }

    #[test]
    fn test_brightness_clamps_to_255() {
        assert_eq!(brightness_for(u16::MAX), 255);
        assert_eq!(brightness_for(200), 255); // 200 × 2 = 400 → clamp
    }

    #[test]
    fn test_brightness_monotonic() {
        let mut prev = 0u8;
        for raw in 0..1024u16 {
            let b = brightness_for(raw);
            assert!(b >= prev, "brightness must be monotonic in raw loudness");
            prev = b;
        }
    }

    #[test]
    fn test_rms_of_silence_is_zero() {
        assert_eq!(rms_level(&[0i32; 128]), 0);
    }

    #[test]
    fn test_rms_of_empty_frame_is_zero() {
        assert_eq!(rms_level(&[]), 0);
    }

    #[test]
    fn test_rms_scales_with_amplitude() {
        let quiet = [i32::MAX / 64; 128];
        let loud = [i32::MAX / 4; 128];
        assert!(rms_level(&loud) > rms_level(&quiet));
    }

    #[test]
    fn test_isqrt_exact_squares() {
        for n in [0u64, 1, 4, 9, 16, 144, 1 << 32] {
            let r = isqrt(n);
            assert_eq!(r * r, n);
        }
    }
}
