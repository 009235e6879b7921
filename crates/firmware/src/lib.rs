//! Mr Bear Firmware
//!
//! Firmware for a plush toy that plays one MP3 clip per paw press: left
//! paw, a clip from `left/`; right paw, a clip from `right/`; chest LED
//! pulsing with the clip's loudness; Standby power-down in between.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs, app — wake-to-sleep controller)
//!         ↓
//! Core Layer (playback crate — pure state machines)
//!         ↓
//! Platform HAL (platform crate — trait abstractions)
//!         ↓
//! Hardware Drivers (hw module — Embassy, STM32)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the STM32H743 target (embassy, PAC)
//! - `std` - Enable standard library (host testing)
//!
//! # Hardware target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

#[macro_use]
mod fmt;

pub mod app;
pub mod boot;
pub mod error;

#[cfg(feature = "hardware")]
pub mod hw;

// Re-export key types
pub use app::{blink, App, CycleOutcome};
pub use error::Fault;
