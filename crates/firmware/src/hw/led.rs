//! PWM-driven chest LED.
//!
//! The LED sits on a timer output so brightness is a duty cycle, not a
//! binary level. Timer frequency is 1 kHz — far above flicker fusion,
//! low enough that the 0–255 brightness range maps onto distinct duty
//! steps at any plausible timer clock.

use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_stm32::timer::{CaptureCompare16bitInstance, Channel};
use platform::DimmableLed;

/// Chest LED on one PWM channel.
pub struct PwmLed<'d, T: CaptureCompare16bitInstance> {
    pwm: SimplePwm<'d, T>,
    channel: Channel,
    level: u8,
}

impl<'d, T: CaptureCompare16bitInstance> PwmLed<'d, T> {
    /// Take ownership of a configured PWM and drive the LED on `channel`.
    ///
    /// Starts dark: the duty is zeroed before the channel is enabled so
    /// the LED cannot flash at whatever duty the timer reset to.
    pub fn new(mut pwm: SimplePwm<'d, T>, channel: Channel) -> Self {
        pwm.set_duty(channel, 0);
        pwm.enable(channel);
        Self {
            pwm,
            channel,
            level: 0,
        }
    }

    fn duty_for(&self, level: u8) -> u16 {
        // Timer duty is 16-bit; widen for the multiply, the quotient is ≤ max.
        let max = u32::from(self.pwm.get_max_duty());
        #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
        {
            ((max * u32::from(level)) / 255) as u16
        }
    }
}

impl<T: CaptureCompare16bitInstance> DimmableLed for PwmLed<'_, T> {
    fn set_brightness(&mut self, level: u8) {
        let duty = self.duty_for(level);
        self.pwm.set_duty(self.channel, duty);
        self.level = level;
    }

    fn brightness(&self) -> u8 {
        self.level
    }
}
