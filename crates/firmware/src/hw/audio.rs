//! SAI audio output with the nanomp3 decode pipeline.
//!
//! The decode/stream loop runs in its own Embassy task; the controller
//! talks to it through [`SaiAudio`], a thin handle over a static command
//! channel plus two atomics. One task, one handle:
//!
//! ```text
//! App (run_cycle)                audio_task
//!   start(track) ──COMMANDS──▶   open file, decode first frame
//!          ◀──START_RESULT──     Ok / Err(decode refused)
//!   is_playing()/loudness()      stream frames to SAI, update atomics
//!   stop() ──────COMMANDS──▶     break stream loop, drain SAI
//! ```
//!
//! ## SAI1 pin assignments (STM32H743, mono class-D codec)
//!   - PE2 → SAI1_MCLK_A
//!   - PE4 → SAI1_FS_A
//!   - PE5 → SAI1_SCK_A
//!   - PE6 → SAI1_SD_A

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embassy_stm32::peripherals::{DMA1_CH0, SAI1, SDMMC1};
use embassy_stm32::sai::Sai;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use platform::audio::AudioPlayer;
use platform::storage::{File as _, Storage as _, TrackPath};
use playback::decoder::{FrameDecoder as _, PcmFrame};
use playback::loudness::rms_level;
use playback::mp3_decoder::NanoMp3Decoder;

use crate::hw::storage::{SdFile, SdStorage, SdVolume, SdmmcBlockDevice};

/// Block device over the toy's one SD slot.
pub type BearBlockDevice = SdmmcBlockDevice<'static, SDMMC1>;
/// The mounted FAT volume shared by the controller and the audio task.
pub type BearVolume = SdVolume<BearBlockDevice>;
/// Storage handle type used throughout the firmware.
pub type BearStorage = SdStorage<BearBlockDevice>;
/// SAI writer moving 32-bit words to the codec over DMA1 channel 0.
pub type BearSai = Sai<'static, SAI1, DMA1_CH0, u32>;

/// Bytes of compressed input buffered ahead of the decoder.
const INPUT_BUF_BYTES: usize = 4096;

/// Errors surfaced to the controller by [`SaiAudio::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// The track file would not open.
    Open,
    /// The file opened but no MP3 frame decoded from its head.
    Decode,
}

enum AudioCommand {
    Start(TrackPath),
    Stop,
}

static COMMANDS: Channel<CriticalSectionRawMutex, AudioCommand, 2> = Channel::new();
static START_RESULT: Signal<CriticalSectionRawMutex, Result<(), AudioError>> = Signal::new();
static PLAYING: AtomicBool = AtomicBool::new(false);
static LOUDNESS: AtomicU16 = AtomicU16::new(0);

/// Controller-side handle. Stateless: all state lives in the statics
/// shared with [`audio_task`].
pub struct SaiAudio;

impl AudioPlayer for SaiAudio {
    type Error = AudioError;

    async fn start(&mut self, track: &TrackPath) -> Result<(), Self::Error> {
        START_RESULT.reset();
        COMMANDS.send(AudioCommand::Start(track.clone())).await;
        START_RESULT.wait().await
    }

    async fn stop(&mut self) -> Result<(), Self::Error> {
        COMMANDS.send(AudioCommand::Stop).await;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        PLAYING.load(Ordering::Acquire)
    }

    fn loudness(&self) -> u16 {
        LOUDNESS.load(Ordering::Relaxed)
    }
}

/// The decode/stream task. Spawn once from `main` after the volume is
/// mounted and the SAI is configured.
#[embassy_executor::task]
pub async fn audio_task(vol: &'static BearVolume, mut sai: BearSai) {
    let mut storage = SdStorage::new(vol);
    loop {
        match COMMANDS.receive().await {
            // A Stop with nothing playing: the clip ended on its own
            // in the same poll window. Nothing to do.
            AudioCommand::Stop => {}
            AudioCommand::Start(path) => {
                play_clip(&mut storage, &mut sai, &path).await;
                LOUDNESS.store(0, Ordering::Relaxed);
                PLAYING.store(false, Ordering::Release);
            }
        }
    }
}

async fn play_clip(storage: &mut BearStorage, sai: &mut BearSai, path: &TrackPath) {
    let Ok(mut file) = storage.open_file(path.as_str()).await else {
        START_RESULT.signal(Err(AudioError::Open));
        return;
    };

    let mut decoder = NanoMp3Decoder::new();
    let mut frame = PcmFrame::zeroed();
    let mut input = InputBuffer::new();

    // The first frame decides whether the clip is playable at all; the
    // controller is blocked on START_RESULT until we know.
    if next_frame(&mut input, &mut file, &mut decoder, &mut frame).await {
        PLAYING.store(true, Ordering::Release);
        START_RESULT.signal(Ok(()));
    } else {
        START_RESULT.signal(Err(AudioError::Decode));
        return;
    }

    loop {
        LOUDNESS.store(rms_level(frame.valid()), Ordering::Relaxed);
        render(sai, &frame).await;
        if matches!(COMMANDS.try_receive(), Ok(AudioCommand::Stop)) {
            debug!("stop requested mid-clip");
            break;
        }
        if !next_frame(&mut input, &mut file, &mut decoder, &mut frame).await {
            // End of stream, or bitstream damage: either way the clip
            // is over. Damage is recoverable by policy.
            break;
        }
    }
}

/// Decode the next audible frame, refilling `input` from the file as
/// needed. Returns `false` when the stream is exhausted.
async fn next_frame(
    input: &mut InputBuffer,
    file: &mut SdFile<BearBlockDevice>,
    decoder: &mut NanoMp3Decoder,
    frame: &mut PcmFrame,
) -> bool {
    loop {
        let fresh = input.fill(file).await;
        if input.is_empty() {
            return false;
        }
        match decoder.decode_frame(input.data(), frame) {
            Ok(consumed) => {
                input.consume(consumed);
                if frame.len > 0 {
                    return true;
                }
                // consumed > 0 with no samples: leading garbage (ID3
                // tag) skipped; go around.
                if consumed == 0 && fresh == 0 {
                    return false;
                }
            }
            Err(_) => {
                // No frame in the window and nothing more to read.
                if fresh == 0 {
                    return false;
                }
            }
        }
    }
}

/// Push one decoded frame out the SAI as raw 32-bit words.
async fn render(sai: &mut BearSai, frame: &PcmFrame) {
    #[allow(clippy::large_stack_arrays)] // sized to one MP3 frame, matches PcmFrame
    let mut out = [0u32; 2304];
    let samples = frame.valid();
    if let Some(dst) = out.get_mut(..samples.len()) {
        for (word, &sample) in dst.iter_mut().zip(samples) {
            #[allow(clippy::cast_sign_loss)] // the bus carries the bit pattern
            {
                *word = sample as u32;
            }
        }
    }
    if let Some(chunk) = out.get(..samples.len()) {
        if sai.write(chunk).await.is_err() {
            warn!("SAI write error; frame dropped");
        }
    }
}

/// Sliding window of compressed bytes ahead of the decoder.
struct InputBuffer {
    buf: [u8; INPUT_BUF_BYTES],
    len: usize,
}

impl InputBuffer {
    const fn new() -> Self {
        Self {
            buf: [0u8; INPUT_BUF_BYTES],
            len: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn data(&self) -> &[u8] {
        self.buf.get(..self.len).unwrap_or(&[])
    }

    /// Top up from `file`. Returns bytes added (0 at end of file).
    async fn fill(&mut self, file: &mut SdFile<BearBlockDevice>) -> usize {
        let Some(tail) = self.buf.get_mut(self.len..) else {
            return 0;
        };
        if tail.is_empty() {
            return 0;
        }
        match file.read(tail).await {
            Ok(n) => {
                self.len = self.len.saturating_add(n).min(INPUT_BUF_BYTES);
                n
            }
            Err(_) => 0,
        }
    }

    /// Drop `n` consumed bytes from the front.
    fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.buf.copy_within(n..self.len, 0);
        self.len = self.len.saturating_sub(n);
    }
}
