//! GPIO paw buttons.
//!
//! | Signal    | MCU pin | Notes                                        |
//! |-----------|---------|----------------------------------------------|
//! | Left paw  | PA0     | Active-low, internal pull-up, WKUP1 in sleep |
//! | Right paw | PA2     | Active-low, internal pull-up, WKUP2 in sleep |
//!
//! The same physical pins double as Standby wake sources (see
//! [`crate::hw::power`]); while the firmware is awake they are plain
//! polled inputs behind the shared [`Debouncer`].

use embassy_stm32::gpio::{AnyPin, Input};
use embassy_time::{Duration, Instant};
use platform::config::DEBOUNCE_MS;
use platform::{ButtonInput, Debouncer};

/// One debounced paw button on a GPIO input.
pub struct PawButton<'d> {
    pin: Input<'d, AnyPin>,
    debouncer: Debouncer,
}

impl<'d> PawButton<'d> {
    /// Wrap a configured input pin. The pin must already have its
    /// pull-up enabled; this type only reads levels.
    pub fn new(pin: Input<'d, AnyPin>) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(Duration::from_millis(DEBOUNCE_MS)),
        }
    }
}

impl ButtonInput for PawButton<'_> {
    fn was_pressed(&mut self) -> bool {
        // Active-low: a pressed paw pulls the pin to ground.
        self.debouncer.poll(Instant::now(), self.pin.is_low())
    }
}
