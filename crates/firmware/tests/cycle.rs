//! End-to-end wake cycles against mock hardware.
//!
//! Each test boots the controller the way a wake does on the real toy:
//! a scripted wake reason, a scripted SD card, a scripted audio device,
//! then asserts on what the hardware saw — LED writes, audio starts and
//! stops, armed wake sources.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::indexing_slicing)]

use firmware::{App, CycleOutcome};
use platform::mocks::{MockAudio, MockButton, MockLed, MockPower, MockStorage, TestRng};
use platform::power::WakeReason;
use platform::{DimmableLed, PinWake, Zone};
use playback::session::EndReason;

fn card_with_both_zones() -> MockStorage {
    MockStorage::new()
        .with_dir("left", &["a.mp3", "b.mp3", "notes.txt"])
        .with_dir("right", &["growl.mp3"])
}

#[tokio::test]
async fn test_left_press_plays_clip_to_completion() {
    let mut app = App::new(
        MockLed::new(),
        card_with_both_zones(),
        MockAudio::playing_for(3).with_loudness(&[12, 40, 33]),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::LeftButton),
        TestRng::seeded(5),
    );

    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Played(EndReason::Completed));

    // Exactly one clip from the left zone.
    let started = app.audio().started();
    assert_eq!(started.len(), 1);
    assert!(started[0].as_str().starts_with("left/"));
    assert!(started[0].as_str().ends_with(".mp3"));

    // Three loudness-driven updates (gain 2: 12 → 24, 40 → 80, 33 → 66),
    // then dark once the clip ends.
    let led = app.led();
    assert_eq!(led.lit_writes(), 3);
    assert!(led.writes().contains(&24));
    assert!(led.writes().contains(&80));
    assert!(led.writes().contains(&66));
    assert_eq!(led.brightness(), 0);
}

#[tokio::test]
async fn test_press_during_playback_cuts_clip_off() {
    let mut app = App::new(
        MockLed::new(),
        card_with_both_zones(),
        MockAudio::playing_for(50).with_loudness(&[30]),
        MockButton::idle(),
        // Second poll: the right paw interrupts.
        MockButton::script(&[false, true]),
        MockPower::woken_by(WakeReason::LeftButton),
        TestRng::seeded(5),
    );

    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Played(EndReason::Interrupted));

    // Audio was told to stop, once, and the LED ended dark.
    assert_eq!(app.audio().stops(), 1);
    assert_eq!(app.led().brightness(), 0);

    // Loudness was sampled on the two playing ticks only — never on the
    // tick after the stop request.
    assert_eq!(app.audio().loudness_samples(), 2);
}

#[tokio::test]
async fn test_undecodable_clip_is_recoverable() {
    let mut app = App::new(
        MockLed::new(),
        card_with_both_zones(),
        MockAudio::unplayable(),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::RightButton),
        TestRng::seeded(9),
    );

    // Not a fault: the cycle completes and the toy goes back to sleep.
    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NothingToPlay);
    assert!(app.audio().started().is_empty());
    assert_eq!(app.led().brightness(), 0);
    assert_eq!(app.power().sleeps(), 1);
}

#[tokio::test]
async fn test_cold_boot_goes_straight_to_sleep() {
    let mut app = App::new(
        MockLed::new(),
        card_with_both_zones(),
        MockAudio::playing_for(3),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::ColdBoot),
        TestRng::seeded(1),
    );

    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NoWakeZone);
    assert!(app.audio().started().is_empty());
    assert_eq!(app.power().sleeps(), 1);
}

#[tokio::test]
async fn test_empty_zone_is_recoverable() {
    let mut app = App::new(
        MockLed::new(),
        MockStorage::new().with_dir("left", &[]).with_dir("right", &[]),
        MockAudio::playing_for(3),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::LeftButton),
        TestRng::seeded(1),
    );

    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NothingToPlay);
    assert!(app.audio().started().is_empty());
    assert_eq!(app.power().sleeps(), 1);
}

#[tokio::test]
async fn test_missing_zone_directory_is_recoverable() {
    let mut app = App::new(
        MockLed::new(),
        MockStorage::new(), // no directories at all
        MockAudio::playing_for(3),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::RightButton),
        TestRng::seeded(1),
    );

    let outcome = app.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NothingToPlay);
    assert_eq!(app.power().sleeps(), 1);
}

#[tokio::test]
async fn test_sleep_arms_both_paws() {
    let mut app = App::new(
        MockLed::new(),
        card_with_both_zones(),
        MockAudio::playing_for(1),
        MockButton::idle(),
        MockButton::idle(),
        MockPower::woken_by(WakeReason::LeftButton),
        TestRng::seeded(2),
    );

    app.run_cycle().await.unwrap();

    // Every path into sleep must arm BOTH wake pins — the toy would
    // otherwise be deaf in one paw until the next battery pull.
    let armed = app.power().armed().expect("deep_sleep was never called");
    assert!(armed.contains(&PinWake::for_zone(Zone::Left)));
    assert!(armed.contains(&PinWake::for_zone(Zone::Right)));
}

#[tokio::test]
async fn test_non_track_files_never_selected() {
    // Only .mp3 files are eligible; notes.txt must never start.
    for seed in 1..20u32 {
        let mut app = App::new(
            MockLed::new(),
            card_with_both_zones(),
            MockAudio::playing_for(1),
            MockButton::idle(),
            MockButton::idle(),
            MockPower::woken_by(WakeReason::LeftButton),
            TestRng::seeded(seed),
        );
        app.run_cycle().await.unwrap();
        for track in app.audio().started() {
            assert!(track.as_str().ends_with(".mp3"));
        }
    }
}
