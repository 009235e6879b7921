//! Power management abstraction.
//!
//! The toy spends most of its life in deep sleep. Waking restarts program
//! execution from the top; the only state that survives is the hardware's
//! record of *why* it woke, surfaced here as [`WakeReason`].

use crate::zone::Zone;

/// Why the program is running right now.
///
/// Derived once per boot, before anything else happens. Drives initial
/// track selection: a button wake plays a clip from that button's zone, a
/// cold boot (battery inserted, reset) goes straight back to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    /// Power applied or reset — no wake pin fired.
    ColdBoot,
    /// Woken by the left paw button.
    LeftButton,
    /// Woken by the right paw button.
    RightButton,
}

impl WakeReason {
    /// The zone whose button caused this wake, if any.
    pub fn zone(self) -> Option<Zone> {
        match self {
            Self::ColdBoot => None,
            Self::LeftButton => Some(Zone::Left),
            Self::RightButton => Some(Zone::Right),
        }
    }
}

/// A wake pin identifier, one per paw button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakePin {
    /// Left paw button pin.
    Left,
    /// Right paw button pin.
    Right,
}

/// One armed wake source: a pin that ends deep sleep when pulled low.
///
/// Buttons are active-low, so both sources wake on a low level with the
/// internal pull-up enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinWake {
    /// Which pin to arm.
    pub pin: WakePin,
    /// Enable the internal pull-up while sleeping.
    pub pull_up: bool,
}

impl PinWake {
    /// Wake source for a zone's button: wake-on-low, pull-up enabled.
    #[must_use]
    pub const fn for_zone(zone: Zone) -> Self {
        Self {
            pin: match zone {
                Zone::Left => WakePin::Left,
                Zone::Right => WakePin::Right,
            },
            pull_up: true,
        }
    }
}

/// Deep sleep entry and wake-reason readout.
pub trait PowerControl {
    /// Error type.
    type Error: core::fmt::Debug;

    /// Why this boot happened. Stable for the lifetime of the process.
    fn wake_reason(&mut self) -> WakeReason;

    /// Arm `sources` and enter deep sleep.
    ///
    /// On hardware this never returns `Ok` — the MCU powers down and
    /// restarts from reset when a source fires. Mock implementations
    /// return so host tests can assert on the armed sources.
    fn deep_sleep(
        &mut self,
        sources: &[PinWake],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
