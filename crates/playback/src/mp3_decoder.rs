//! nanomp3-based MP3 frame decoder.
//!
//! nanomp3 is a pure-Rust, `no_std` c2rust translation of minimp3 with
//! ARM soundness fixes. The dependency and the real decode path are
//! gated behind the `mp3` feature so the crate's pure modules compile
//! and test on hosts without pulling the codec in.

use crate::decoder::{DecodeError, FrameDecoder, PcmFrame};

/// MP3 frame decoder backed by nanomp3.
///
/// nanomp3 has no internal buffering; the caller feeds it a window of
/// file bytes on each call and advances by the consumed count.
pub struct NanoMp3Decoder {
    sample_rate: u32,
    channels: u8,
    #[cfg(feature = "mp3")]
    inner: nanomp3::Decoder,
    #[cfg(not(feature = "mp3"))]
    _phantom: (),
}

impl NanoMp3Decoder {
    /// Create a new MP3 decoder.
    ///
    /// `sample_rate` and `channels` are 0 until the first successful
    /// frame decode, then track the frame headers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample_rate: 0,
            channels: 0,
            #[cfg(feature = "mp3")]
            inner: nanomp3::Decoder::new(),
            #[cfg(not(feature = "mp3"))]
            _phantom: (),
        }
    }
}

impl Default for NanoMp3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder for NanoMp3Decoder {
    type Error = DecodeError;

    /// Decode one MP3 frame from `input` into `output`.
    ///
    /// nanomp3 returns `(bytes_consumed, Some(FrameInfo))` on success
    /// and `(bytes_consumed, None)` when no frame was found (leading
    /// garbage, or true end of stream). Decoded f32 samples in
    /// [-1.0, 1.0] are scaled to left-justified i32.
    fn decode_frame(&mut self, input: &[u8], output: &mut PcmFrame) -> Result<usize, Self::Error> {
        if input.is_empty() {
            return Err(DecodeError::EndOfStream);
        }

        #[cfg(feature = "mp3")]
        {
            // MAX_SAMPLES_PER_FRAME = 1152 × 2 = 2304; same bound as
            // PcmFrame::samples, so the copy below cannot truncate.
            let mut pcm_buf = [0.0f32; nanomp3::MAX_SAMPLES_PER_FRAME];

            let (consumed, info_opt) = self.inner.decode(input, &mut pcm_buf);
            let Some(info) = info_opt else {
                // nanomp3 consumes leading garbage (ID3 tags, sync
                // search) without producing a frame. Report the skip as
                // progress with `output.len == 0`; a consumed count of
                // zero means the window truly holds nothing decodable.
                if consumed > 0 {
                    output.len = 0;
                    return Ok(consumed);
                }
                return Err(DecodeError::EndOfStream);
            };

            self.sample_rate = info.sample_rate;
            #[allow(clippy::cast_possible_truncation)] // channel count is 1 or 2
            {
                self.channels = info.channels.num() as u8;
            }

            let n = info.samples_produced.min(output.samples.len());
            if let (Some(dst), Some(src)) = (output.samples.get_mut(..n), pcm_buf.get(..n)) {
                for (d, &s) in dst.iter_mut().zip(src.iter()) {
                    #[allow(clippy::cast_possible_truncation)] // clamped to the i32 range
                    {
                        *d = (s.clamp(-1.0, 1.0) * i32::MAX as f32) as i32;
                    }
                }
            }
            let ch = usize::from(self.channels.max(1));
            output.len = n.wrapping_div(ch);
            output.sample_rate = self.sample_rate;
            output.channels = self.channels;
            Ok(consumed)
        }

        #[cfg(not(feature = "mp3"))]
        {
            let _ = output;
            Err(DecodeError::UnsupportedFormat)
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u8 {
        self.channels
    }
}
