//! SD card storage: SDMMC1 block device + embedded-sdmmc FAT layer.
//!
//! Layering:
//!
//! ```text
//! platform::Storage / platform::File   (SdStorage, SdFile)
//!         ↓
//! embedded-sdmmc VolumeManager         (SdVolume — shared FAT state)
//!         ↓
//! embedded_sdmmc::BlockDevice          (SdmmcBlockDevice adapter)
//!         ↓
//! embassy-stm32 SDMMC1 peripheral
//! ```
//!
//! `SdVolume` is the single owner of the `VolumeManager`; the storage
//! handle and every open file reach it through a `blocking_mutex` +
//! `RefCell`, which is free under `NoopRawMutex` on the single-threaded
//! executor. `embedded-sdmmc` 0.8 raw handles (`RawFile`, `RawDirectory`)
//! are plain indices, so files can outlive the call that opened them.

use core::cell::RefCell;
use core::fmt::Write as _;

use embassy_stm32::sdmmc::{DataBlock, Instance, Sdmmc};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_sdmmc::{
    Block, BlockCount, BlockDevice, BlockIdx, Error as FatError, FilenameError, Mode, RawDirectory,
    RawFile, TimeSource, Timestamp, VolumeIdx, VolumeManager,
};
use platform::storage::{File, Storage, TrackList, TrackPath};

/// The toy has no clock; every FAT timestamp is the epoch.
pub struct NullTimeSource;

impl TimeSource for NullTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Sync [`BlockDevice`] adapter over the async SDMMC driver.
///
/// `embedded-sdmmc` 0.8 is synchronous; block transfers at SD speeds are
/// short, so each call runs its single-block future to completion with
/// `embassy_futures::block_on`.
pub struct SdmmcBlockDevice<'d, T: Instance> {
    card: RefCell<Sdmmc<'d, T>>,
}

impl<'d, T: Instance> SdmmcBlockDevice<'d, T> {
    /// Wrap an initialised SDMMC peripheral (after `init_card`).
    pub fn new(card: Sdmmc<'d, T>) -> Self {
        Self {
            card: RefCell::new(card),
        }
    }
}

// Block indices are bounded by the card capacity, far below u32::MAX.
#[allow(clippy::arithmetic_side_effects)]
impl<T: Instance> BlockDevice for SdmmcBlockDevice<'_, T> {
    type Error = embassy_stm32::sdmmc::Error;

    fn read(
        &self,
        blocks: &mut [Block],
        start_block_idx: BlockIdx,
        _reason: &str,
    ) -> Result<(), Self::Error> {
        let mut card = self.card.borrow_mut();
        let mut data = DataBlock([0u8; 512]);
        for (offset, block) in blocks.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)] // offset < blocks.len() << u32::MAX
            let idx = start_block_idx.0 + offset as u32;
            embassy_futures::block_on(card.read_block(idx, &mut data))?;
            block.contents.copy_from_slice(&data.0);
        }
        Ok(())
    }

    fn write(&self, blocks: &[Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
        let mut card = self.card.borrow_mut();
        let mut data = DataBlock([0u8; 512]);
        for (offset, block) in blocks.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let idx = start_block_idx.0 + offset as u32;
            data.0.copy_from_slice(&block.contents);
            embassy_futures::block_on(card.write_block(idx, &data))?;
        }
        Ok(())
    }

    fn num_blocks(&self) -> Result<BlockCount, Self::Error> {
        let card = self.card.borrow();
        let info = card.card()?;
        #[allow(clippy::cast_possible_truncation)] // SDHC capacity / 512 fits u32
        Ok(BlockCount((info.csd.card_size() / 512) as u32))
    }
}

struct FatState<D: BlockDevice> {
    mgr: VolumeManager<D, NullTimeSource>,
    root: RawDirectory,
}

/// Shared FAT volume. One static instance owns the `VolumeManager`;
/// [`SdStorage`] and every [`SdFile`] borrow it.
pub struct SdVolume<D: BlockDevice> {
    state: Mutex<NoopRawMutex, RefCell<FatState<D>>>,
}

impl<D: BlockDevice> SdVolume<D> {
    /// Mount the first FAT volume on `device` and open its root.
    ///
    /// # Errors
    ///
    /// Fails when the card has no readable FAT volume — an init-class
    /// fault at boot.
    pub fn mount(device: D) -> Result<Self, FatError<D::Error>> {
        let mut mgr = VolumeManager::new(device, NullTimeSource);
        let volume = mgr.open_raw_volume(VolumeIdx(0))?;
        let root = mgr.open_root_dir(volume)?;
        Ok(Self {
            state: Mutex::new(RefCell::new(FatState { mgr, root })),
        })
    }

    fn with<R>(&self, f: impl FnOnce(&mut FatState<D>) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// FAT short names are stored uppercase; `.mp3` must still match `.MP3`.
fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    let Some(start) = name.len().checked_sub(suffix.len()) else {
        return false;
    };
    name.get(start..)
        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// [`Storage`] over a mounted [`SdVolume`].
pub struct SdStorage<D: BlockDevice + 'static> {
    vol: &'static SdVolume<D>,
}

impl<D: BlockDevice + 'static> SdStorage<D> {
    /// Storage handle over the shared volume.
    pub fn new(vol: &'static SdVolume<D>) -> Self {
        Self { vol }
    }
}

impl<D: BlockDevice + 'static> Storage for SdStorage<D> {
    type Error = FatError<D::Error>;
    type File = SdFile<D>;

    async fn list_tracks(&mut self, dir: &str, ext: &str) -> Result<TrackList, Self::Error> {
        let vol = self.vol;
        vol.with(|fat| {
            let zone = fat.mgr.open_dir(fat.root, dir)?;
            let mut tracks = TrackList::new();
            let iterated = fat.mgr.iterate_dir(zone, |entry| {
                if entry.attributes.is_directory() {
                    return;
                }
                // 8.3 short name: at most 12 characters.
                let mut name = heapless::String::<12>::new();
                if write!(name, "{}", entry.name).is_err() {
                    return;
                }
                if !ends_with_ignore_case(&name, ext) {
                    return;
                }
                let mut path = TrackPath::new();
                let fits = path.push_str(dir).is_ok()
                    && path.push('/').is_ok()
                    && path.push_str(&name).is_ok();
                if fits {
                    // A full list silently drops the extras.
                    let _ = tracks.push(path);
                }
            });
            let _ = fat.mgr.close_dir(zone);
            iterated?;
            Ok(tracks)
        })
    }

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let (dir_name, file_name) = path
            .split_once('/')
            .ok_or(FatError::FilenameError(FilenameError::InvalidCharacter))?;
        let vol = self.vol;
        let file = vol.with(|fat| {
            let zone = fat.mgr.open_dir(fat.root, dir_name)?;
            let opened = fat.mgr.open_file_in_dir(zone, file_name, Mode::ReadOnly);
            let _ = fat.mgr.close_dir(zone);
            opened
        })?;
        Ok(SdFile { vol, file })
    }
}

/// An open file on the shared volume. Closed on drop.
pub struct SdFile<D: BlockDevice + 'static> {
    vol: &'static SdVolume<D>,
    file: RawFile,
}

impl<D: BlockDevice + 'static> File for SdFile<D> {
    type Error = FatError<D::Error>;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.vol.with(|fat| fat.mgr.read(self.file, buf))
    }

    fn size(&self) -> u64 {
        self.vol
            .with(|fat| fat.mgr.file_length(self.file))
            .map_or(0, u64::from)
    }
}

impl<D: BlockDevice + 'static> Drop for SdFile<D> {
    fn drop(&mut self) {
        let _ = self.vol.with(|fat| fat.mgr.close_file(self.file));
    }
}
