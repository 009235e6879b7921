//! Wake-to-sleep controller.
//!
//! The toy's whole life is one cycle: wake up, find out which paw was
//! pressed, play one random clip from that paw's directory while pulsing
//! the chest LED with the clip's loudness, then go back to standby with
//! both paws armed as wake sources. Standby is a full power-down — the
//! next press restarts the firmware from reset, so the cycle never loops.
//!
//! [`App`] is generic over the platform traits and contains no hardware
//! code; `main.rs` instantiates it with the real drivers and the
//! integration tests with mocks.

use embassy_time::{Duration, Timer};
use platform::config::{BLINK_INTERVAL_MS, POLL_INTERVAL_MS, TRACK_EXTENSION};
use platform::{AudioPlayer, ButtonInput, DimmableLed, PinWake, PowerControl, Storage, Zone};
use playback::select::{select_track, SelectError};
use playback::session::{EndReason, PlaybackSession, SessionState, TickInput, TickOutput};
use rand_core::RngCore;

use crate::error::Fault;

/// How one wake cycle went, for logging and tests. On hardware the value
/// is never observed: `deep_sleep` powers the core down first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Cold boot or unknown wake source; straight back to sleep.
    NoWakeZone,
    /// The zone had nothing playable (empty, unlisted, or refused).
    NothingToPlay,
    /// A clip ran; how it ended.
    Played(EndReason),
}

/// The application controller, generic over every hardware seam.
pub struct App<L, S, A, B, P, R> {
    led: L,
    storage: S,
    audio: A,
    left: B,
    right: B,
    power: P,
    rng: R,
}

impl<L, S, A, B, P, R> App<L, S, A, B, P, R>
where
    L: DimmableLed,
    S: Storage,
    A: AudioPlayer,
    B: ButtonInput,
    P: PowerControl,
    R: RngCore,
{
    /// Assemble the controller from its drivers.
    #[allow(clippy::too_many_arguments)]
    pub fn new(led: L, storage: S, audio: A, left: B, right: B, power: P, rng: R) -> Self {
        Self {
            led,
            storage,
            audio,
            left,
            right,
            power,
            rng,
        }
    }

    /// Run one wake cycle: play (or decline to), then enter deep sleep.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::Sleep`] if standby entry fails. Everything that
    /// can go wrong during playback is recoverable and folds into the
    /// returned [`CycleOutcome`] instead.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, Fault> {
        let wake = self.power.wake_reason();
        let outcome = match wake.zone() {
            Some(zone) => {
                info!("woken by {} paw", zone.name());
                self.play_zone(zone).await
            }
            None => {
                info!("cold boot, nothing to play");
                CycleOutcome::NoWakeZone
            }
        };
        self.sleep().await?;
        Ok(outcome)
    }

    /// Pick and play one random clip from `zone`'s directory.
    async fn play_zone(&mut self, zone: Zone) -> CycleOutcome {
        let tracks = match self.storage.list_tracks(zone.dir(), TRACK_EXTENSION).await {
            Ok(tracks) => tracks,
            Err(_) => {
                warn!("listing {=str}/ failed", zone.dir());
                return CycleOutcome::NothingToPlay;
            }
        };
        let track = match select_track(&tracks, &mut self.rng) {
            Ok(track) => track.clone(),
            Err(SelectError::NoTracks) => {
                warn!("no tracks under {=str}/", zone.dir());
                return CycleOutcome::NothingToPlay;
            }
        };

        info!("playing {=str}", track.as_str());
        let mut session = PlaybackSession::new();
        if session.begin(track.clone()).is_err() {
            return CycleOutcome::NothingToPlay;
        }
        match self.audio.start(&track).await {
            Ok(()) => {
                if session.mark_started().is_err() {
                    return CycleOutcome::NothingToPlay;
                }
            }
            Err(_) => {
                warn!("decoder refused {=str}", track.as_str());
                if let Ok(out) = session.mark_unplayable() {
                    self.apply(out).await;
                }
                return CycleOutcome::NothingToPlay;
            }
        }

        while session.is_active() {
            Timer::after(Duration::from_millis(POLL_INTERVAL_MS)).await;
            // Poll both buttons unconditionally so each debouncer sees
            // every edge, then combine.
            let left = self.left.was_pressed();
            let right = self.right.was_pressed();
            // Once a stop has been requested the LED no longer tracks the
            // device, so loudness is not sampled past the Playing state.
            let loudness = if session.state() == SessionState::Playing {
                self.audio.loudness()
            } else {
                0
            };
            let out = session.advance(TickInput {
                still_playing: self.audio.is_playing(),
                loudness,
                interrupt: left || right,
            });
            self.apply(out).await;
        }

        match session.end_reason() {
            Some(reason) => CycleOutcome::Played(reason),
            None => CycleOutcome::NothingToPlay,
        }
    }

    /// Apply one tick's side effects to the hardware.
    async fn apply(&mut self, out: TickOutput) {
        if out.stop_audio && self.audio.stop().await.is_err() {
            warn!("audio stop failed; sleeping anyway");
        }
        if let Some(level) = out.led {
            self.led.set_brightness(level);
        }
    }

    /// Arm both paws as wake sources and power down.
    async fn sleep(&mut self) -> Result<(), Fault> {
        self.led.off();
        let sources = [PinWake::for_zone(Zone::Left), PinWake::for_zone(Zone::Right)];
        info!("entering standby, both paws armed");
        self.power
            .deep_sleep(&sources)
            .await
            .map_err(|_| Fault::Sleep)
    }

    /// The LED driver, for test inspection.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Mutable LED access, for fault blinking after a failed cycle.
    pub fn led_mut(&mut self) -> &mut L {
        &mut self.led
    }

    /// The audio driver, for test inspection.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// The power driver, for test inspection.
    pub fn power(&self) -> &P {
        &self.power
    }
}

/// Blink the chest LED `count` times at the fault cadence.
///
/// Used to signal [`Fault`] classes to someone holding the toy; the LED
/// is left off afterwards.
pub async fn blink(led: &mut impl DimmableLed, count: u8) {
    for _ in 0..count {
        led.on();
        Timer::after(Duration::from_millis(BLINK_INTERVAL_MS)).await;
        led.off();
        Timer::after(Duration::from_millis(BLINK_INTERVAL_MS)).await;
    }
}
