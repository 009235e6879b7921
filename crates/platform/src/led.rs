//! Chest LED abstraction.
//!
//! The LED is driven by PWM and addressed in the 0–255 brightness range;
//! the hardware driver converts to its native duty-cycle resolution.
//! Out-of-range input does not exist at this boundary (`u8`), and hardware
//! drivers clamp internally rather than failing — an LED write must never
//! be able to abort a playback loop.

/// A PWM-dimmable LED.
///
/// Writes are infallible by contract: turning the LED off must be safe on
/// every exit path of the playback loop, including error paths.
pub trait DimmableLed {
    /// Set brightness, 0 (off) to 255 (full).
    fn set_brightness(&mut self, level: u8);

    /// Current brightness, 0–255.
    fn brightness(&self) -> u8;

    /// Turn the LED fully on.
    fn on(&mut self) {
        self.set_brightness(255);
    }

    /// Turn the LED off.
    fn off(&mut self) {
        self.set_brightness(0);
    }

    /// Whether the LED is currently emitting light.
    fn is_lit(&self) -> bool {
        self.brightness() > 0
    }
}
