//! Hardware Abstraction Layer for the Mr Bear toy.
//!
//! This crate provides trait-based abstractions for every hardware component
//! the toy touches, enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate — wake-to-sleep controller)
//!         ↓
//! Core Layer (playback — pure state machines)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`DimmableLed`] - Loudness-driven chest LED
//! - [`Storage`] - SD card track listing and streaming reads
//! - [`AudioPlayer`] - MP3 start / stop / loudness sampling
//! - [`ButtonInput`] - Debounced paw buttons
//! - [`PowerControl`] - Deep sleep entry and wake-reason readout
//!
//! # Features
//!
//! - `std`: Enable standard library support (host tests, tooling)
//! - `hardware`: Physical hardware implementations
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod config;
pub mod input;
pub mod led;
pub mod mocks;
pub mod power;
pub mod storage;
pub mod zone;

#[cfg(feature = "std")]
pub mod storage_local;

// Re-export main high-level traits
pub use audio::AudioPlayer;
pub use input::{ButtonInput, Debouncer};
pub use led::DimmableLed;
pub use power::{PinWake, PowerControl, WakeReason};
pub use storage::{File, Storage, TrackList, TrackPath};
pub use zone::Zone;
