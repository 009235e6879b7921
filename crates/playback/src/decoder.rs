//! Decoder abstractions — PCM frame type and the frame-decoder trait.
//!
//! The toy plays one format only, MP3, but the audio task talks to the
//! decoder through a trait so host tests can substitute a scripted one.
//! Everything here is `no_std` with fixed-size stack buffers: decoded
//! frames feed the SAI DMA buffers directly and must never touch a heap.

/// One decoded PCM frame.
///
/// MP3 produces at most 1 152 samples per channel, so 2 304 total for
/// stereo. The array is always fully allocated; `len` counts the valid
/// prefix in samples per channel. Samples are left-justified 32-bit
/// signed integers.
#[derive(Clone)]
pub struct PcmFrame {
    /// Raw sample storage, left-justified 32-bit signed integers.
    pub samples: [i32; 2304],
    /// Valid samples per channel.
    pub len: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo).
    pub channels: u8,
}

impl PcmFrame {
    /// A zeroed frame, suitable as a decode output buffer.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            samples: [0i32; 2304],
            len: 0,
            sample_rate: 0,
            channels: 0,
        }
    }

    /// The valid interleaved samples (all channels).
    #[must_use]
    pub fn valid(&self) -> &[i32] {
        let n = self
            .len
            .saturating_mul(usize::from(self.channels.max(1)))
            .min(self.samples.len());
        self.samples.get(..n).unwrap_or(&[])
    }
}

/// Errors a [`FrameDecoder`] may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The bitstream contains no decodable frame.
    InvalidData,
    /// The input is exhausted; no more frames follow.
    EndOfStream,
    /// The decoder was built without MP3 support.
    UnsupportedFormat,
}

/// Stateful, frame-by-frame audio decoder.
///
/// Each call to [`decode_frame`] consumes some bytes from `input`,
/// writes one decoded frame to `output`, and returns the number of
/// input bytes consumed. Implementations must not allocate.
///
/// [`decode_frame`]: FrameDecoder::decode_frame
pub trait FrameDecoder {
    /// Error type produced by this decoder.
    type Error: core::fmt::Debug;

    /// Decode one frame from `input` into `output`.
    ///
    /// `Ok(n)` with `output.len == 0` means `n` bytes of non-audio data
    /// (tags, padding) were skipped without producing samples; the
    /// caller drops them and tries again.
    ///
    /// # Errors
    ///
    /// Returns `Err(Self::Error)` on bitstream errors or when the
    /// input is exhausted.
    fn decode_frame(&mut self, input: &[u8], output: &mut PcmFrame) -> Result<usize, Self::Error>;

    /// Sample rate of the stream being decoded, 0 before the first frame.
    fn sample_rate(&self) -> u32;

    /// Channel count of the stream, 0 before the first frame.
    fn channels(&self) -> u8;
}
