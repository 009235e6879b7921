//! HIL boot sequence tests.
//!
//! Validates that the STM32H743ZI boot sequence completes without hardfault:
//! PWR flag readout → SDMMC init → FAT mount → Embassy executor start.
//!
//! # Running
//! ```
//! cargo test --features hardware --target thumbv7em-none-eabihf
//! ```
//!
//! # Requirements
//! - probe-rs installed and board connected via SWD
//! - STM32H743ZI target powered, SD card with left/ and right/ inserted

// These are placeholder tests — actual HIL execution requires probe-rs runner.
// The test bodies document WHAT to check; the assertions use defmt when hardware feature is enabled.

/// Verifies the boot sequence memory map is correctly configured.
/// Hardware check: no HardFault within 1 second of reset.
#[cfg(test)]
mod hil_boot_tests {
    #[test]
    fn memory_map_constants_are_correct() {
        // Validate addresses that will be used during HIL boot
        assert_eq!(0x2400_0000u32, 0x2400_0000); // AXI SRAM base (SAI DMA buffer)
        assert_eq!(0x2000_0000u32, 0x2000_0000); // DTCM base
        assert_eq!(0x0800_0000u32, 0x0800_0000); // Flash base
    }

    #[test]
    fn hil_test_framework_placeholder() {
        // This test passes on host. On hardware, replace with:
        //   defmt::assert!(boot_completed_flag.load(Ordering::Acquire));
        // using a global AtomicBool set once main() reaches the wake dispatch.
        //
        // TODO(HIL): When probe-rs + defmt-test are configured, add real hardware assertions.
        let _ = "HIL test placeholder";
    }
}
