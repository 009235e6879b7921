//! Standby-mode power control.
//!
//! The toy uses STM32 Standby, the deepest sleep the part offers: the
//! core domain powers off entirely and a wake event restarts execution
//! from the reset vector. That matches the controller's model exactly —
//! there is no "resume", only a fresh boot carrying a wake flag.
//!
//! Wake pin mapping (STM32H743, PWR_WKUPEPR indices):
//!
//! | Paw   | GPIO | WKUP line | Flag index |
//! |-------|------|-----------|------------|
//! | Left  | PA0  | WKUP1     | 0          |
//! | Right | PA2  | WKUP2     | 1          |
//!
//! Reference: STM32H7 RM0433 Rev 9, §7.7 (PWR registers), §7.5.7
//! (Standby entry/exit).

use embassy_stm32::pac;
use platform::power::{PinWake, PowerControl, WakePin, WakeReason};

/// WKUPEPR pull configuration field values (RM0433 §7.7.6).
const WKUP_PULL_NONE: u8 = 0b00;
const WKUP_PULL_UP: u8 = 0b01;

fn wkup_index(pin: WakePin) -> usize {
    match pin {
        WakePin::Left => 0,  // WKUP1 = PA0
        WakePin::Right => 1, // WKUP2 = PA2
    }
}

/// Standby-mode power driver.
///
/// Construct exactly once, early in boot: [`StandbyPower::new`] reads
/// and clears the PWR wake flags, and a second construction would see
/// them already cleared and report a cold boot.
pub struct StandbyPower {
    wake: WakeReason,
}

impl StandbyPower {
    /// Read the wake cause from the PWR flags, then clear them.
    pub fn new() -> Self {
        let pwr = pac::PWR;
        let was_standby = pwr.cpucr().read().sbf();
        let flags = pwr.wkupfr().read();

        let wake = if !was_standby {
            WakeReason::ColdBoot
        } else if flags.wkupf(wkup_index(WakePin::Left)) {
            WakeReason::LeftButton
        } else if flags.wkupf(wkup_index(WakePin::Right)) {
            WakeReason::RightButton
        } else {
            // Standby exit without a paw flag: RTC or NRST. Treat as cold.
            WakeReason::ColdBoot
        };

        pwr.cpucr().modify(|w| w.set_cssf(true));
        clear_wake_flags();

        Self { wake }
    }
}

impl Default for StandbyPower {
    fn default() -> Self {
        Self::new()
    }
}

fn clear_wake_flags() {
    // WKUPC is a single 6-bit clear mask covering WKUP1..WKUP6.
    pac::PWR.wkupcr().modify(|w| w.set_wkupc(0x3f));
}

impl PowerControl for StandbyPower {
    type Error = core::convert::Infallible;

    fn wake_reason(&mut self) -> WakeReason {
        self.wake
    }

    async fn deep_sleep(&mut self, sources: &[PinWake]) -> Result<(), Self::Error> {
        let pwr = pac::PWR;

        for source in sources {
            let idx = wkup_index(source.pin);
            pwr.wkupepr().modify(|w| {
                w.set_wkupen(idx, true);
                // Active-low buttons: wake on the falling edge.
                w.set_wkupp(idx, true);
                w.set_wkuppupd(
                    idx,
                    if source.pull_up {
                        WKUP_PULL_UP
                    } else {
                        WKUP_PULL_NONE
                    },
                );
            });
        }

        // Stale flags would end Standby immediately.
        clear_wake_flags();

        // Standby = deepsleep with power-down requested for all domains.
        pwr.cpucr().modify(|w| {
            w.set_pdds_d1(true);
            w.set_pdds_d2(true);
            w.set_pdds_d3(true);
        });

        // SAFETY: single-core part, and execution ends at the WFI below —
        // no other owner of the cortex-m peripherals can observe this.
        let mut core = unsafe { cortex_m::Peripherals::steal() };
        core.SCB.set_sleepdeep();

        loop {
            // A pending-but-masked interrupt can fall through WFI; loop
            // until the WKUP event actually powers us down.
            cortex_m::asm::wfi();
        }
    }
}
