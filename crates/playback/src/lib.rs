//! Playback logic — MP3 decoding, track selection, loudness-driven LED levels
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]

pub mod decoder;
pub mod loudness;
pub mod mp3_decoder;
pub mod select;
pub mod session;

// Tests come first — implementations below will make them pass
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    /// Session state machine tests
    mod session_tests {
        use crate::session::{
            EndReason, PlaybackSession, SessionError, SessionState, TickInput, TickOutput,
        };
        use platform::storage::TrackPath;

        fn track(path: &str) -> TrackPath {
            TrackPath::try_from(path).unwrap()
        }

        fn playing_tick(loudness: u16) -> TickInput {
            TickInput {
                still_playing: true,
                loudness,
                interrupt: false,
            }
        }

        /// Drive a fresh session into `Playing`.
        fn playing_session() -> PlaybackSession {
            let mut session = PlaybackSession::new();
            session.begin(track("left/a.mp3")).unwrap();
            session.mark_started().unwrap();
            session
        }

        #[test]
        fn test_session_starts_idle() {
            let session = PlaybackSession::new();
            assert_eq!(session.state(), SessionState::Idle);
            assert!(!session.is_active());
            assert!(session.track().is_none());
        }

        #[test]
        fn test_begin_binds_track_and_starts() {
            let mut session = PlaybackSession::new();
            session.begin(track("left/a.mp3")).unwrap();
            assert_eq!(session.state(), SessionState::Starting);
            assert_eq!(session.track().unwrap().as_str(), "left/a.mp3");
        }

        #[test]
        fn test_begin_while_active_is_rejected() {
            // At most one track bound at any instant.
            let mut session = playing_session();
            assert_eq!(
                session.begin(track("right/b.mp3")),
                Err(SessionError::NotIdle)
            );
        }

        #[test]
        fn test_mark_started_requires_starting() {
            let mut session = PlaybackSession::new();
            assert_eq!(session.mark_started(), Err(SessionError::NotStarting));
        }

        #[test]
        fn test_playing_tick_maps_loudness_to_led() {
            let mut session = playing_session();
            let out = session.advance(playing_tick(10));
            // gain is 2: raw 10 → brightness 20
            assert_eq!(
                out,
                TickOutput {
                    led: Some(20),
                    stop_audio: false
                }
            );
            assert_eq!(session.last_loudness(), 10);
        }

        #[test]
        fn test_completion_ends_with_led_off() {
            let mut session = playing_session();
            session.advance(playing_tick(5));
            session.advance(playing_tick(9));
            let out = session.advance(TickInput {
                still_playing: false,
                loudness: 0,
                interrupt: false,
            });
            assert_eq!(out.led, Some(0));
            assert!(!out.stop_audio);
            assert_eq!(session.end_reason(), Some(EndReason::Completed));
            assert!(!session.is_active());
        }

        #[test]
        fn test_interrupt_stops_audio_then_ends() {
            let mut session = playing_session();
            session.advance(playing_tick(5));
            let out = session.advance(TickInput {
                still_playing: true,
                loudness: 40,
                interrupt: true,
            });
            assert_eq!(out.led, Some(0));
            assert!(out.stop_audio);
            assert_eq!(session.state(), SessionState::Stopping);
            // The stopping tick ignores any late loudness sample.
            let out = session.advance(playing_tick(99));
            assert_eq!(out.led, Some(0));
            assert!(!out.stop_audio);
            assert_eq!(session.end_reason(), Some(EndReason::Interrupted));
        }

        #[test]
        fn test_interrupt_wins_over_completion() {
            // Press and end-of-track on the same tick: the press decides.
            let mut session = playing_session();
            let out = session.advance(TickInput {
                still_playing: false,
                loudness: 0,
                interrupt: true,
            });
            assert!(out.stop_audio);
            assert_eq!(session.state(), SessionState::Stopping);
        }

        #[test]
        fn test_unplayable_track_releases_led() {
            let mut session = PlaybackSession::new();
            session.begin(track("left/broken.mp3")).unwrap();
            let out = session.mark_unplayable().unwrap();
            assert_eq!(out.led, Some(0));
            assert_eq!(session.end_reason(), Some(EndReason::Unplayable));
        }

        #[test]
        fn test_ended_ticks_are_idempotent() {
            let mut session = playing_session();
            session.advance(TickInput {
                still_playing: false,
                loudness: 0,
                interrupt: false,
            });
            // Further ticks keep commanding the LED off and change nothing.
            for _ in 0..3 {
                let out = session.advance(playing_tick(77));
                assert_eq!(out.led, Some(0));
                assert!(!out.stop_audio);
                assert_eq!(session.end_reason(), Some(EndReason::Completed));
            }
        }

        #[test]
        fn test_every_exit_path_commands_led_off() {
            // Completed
            let mut a = playing_session();
            assert_eq!(
                a.advance(TickInput {
                    still_playing: false,
                    loudness: 0,
                    interrupt: false
                })
                .led,
                Some(0)
            );
            // Interrupted
            let mut b = playing_session();
            b.advance(TickInput {
                still_playing: true,
                loudness: 0,
                interrupt: true,
            });
            assert_eq!(b.advance(playing_tick(0)).led, Some(0));
            // Unplayable
            let mut c = PlaybackSession::new();
            c.begin(track("x/y.mp3")).unwrap();
            assert_eq!(c.mark_unplayable().unwrap().led, Some(0));
        }

        #[test]
        fn test_idle_and_starting_ticks_do_nothing() {
            let mut session = PlaybackSession::new();
            let out = session.advance(playing_tick(50));
            assert_eq!(out.led, None);
            assert!(!out.stop_audio);
            session.begin(track("left/a.mp3")).unwrap();
            let out = session.advance(playing_tick(50));
            assert_eq!(out.led, None);
        }
    }

    /// Decoder abstraction tests
    mod decoder_tests {
        use crate::decoder::{DecodeError, FrameDecoder, PcmFrame};
        use crate::mp3_decoder::NanoMp3Decoder;

        #[test]
        fn test_zeroed_frame_is_empty() {
            let frame = PcmFrame::zeroed();
            assert_eq!(frame.len, 0);
            assert_eq!(frame.sample_rate, 0);
            assert!(frame.valid().is_empty());
        }

        #[test]
        fn test_valid_slice_tracks_len_and_channels() {
            let mut frame = PcmFrame::zeroed();
            frame.len = 576;
            frame.channels = 2;
            assert_eq!(frame.valid().len(), 1152);
        }

        #[test]
        fn test_valid_slice_never_exceeds_storage() {
            let mut frame = PcmFrame::zeroed();
            frame.len = usize::MAX;
            frame.channels = 2;
            assert_eq!(frame.valid().len(), frame.samples.len());
        }

        #[test]
        fn test_fresh_decoder_reports_no_stream_params() {
            let decoder = NanoMp3Decoder::new();
            assert_eq!(decoder.sample_rate(), 0);
            assert_eq!(decoder.channels(), 0);
        }

        #[test]
        fn test_decode_empty_input_is_end_of_stream() {
            let mut decoder = NanoMp3Decoder::new();
            let mut output = PcmFrame::zeroed();
            assert_eq!(
                decoder.decode_frame(&[], &mut output),
                Err(DecodeError::EndOfStream)
            );
        }

        #[test]
        fn test_decode_garbage_yields_no_samples() {
            // Depending on the `mp3` feature the decoder either refuses
            // outright or reports the bytes as skipped; it must never
            // claim audible samples from garbage.
            let mut decoder = NanoMp3Decoder::new();
            let mut output = PcmFrame::zeroed();
            let garbage = [0u8; 100];
            match decoder.decode_frame(&garbage, &mut output) {
                Ok(_) => assert_eq!(output.len, 0),
                Err(e) => assert!(matches!(
                    e,
                    DecodeError::EndOfStream
                        | DecodeError::InvalidData
                        | DecodeError::UnsupportedFormat
                )),
            }
        }
    }
}
