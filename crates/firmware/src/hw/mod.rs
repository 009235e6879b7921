//! STM32H743 drivers behind the platform traits — hardware target only.
//!
//! Each submodule implements one platform trait against the real
//! peripherals: PWM chest LED, GPIO paw buttons, SDMMC + FAT storage,
//! SAI audio with the nanomp3 decoder, and Standby-mode power control.

pub mod audio;
pub mod buttons;
pub mod led;
pub mod power;
pub mod storage;
