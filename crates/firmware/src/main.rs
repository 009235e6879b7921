//! Mr Bear Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743. One boot is one cycle:
//! read the wake cause, play (or decline to), enter Standby. The next
//! paw press lands back here via the reset vector.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, OutputType, Pull};
use embassy_stm32::rng::{self, Rng};
use embassy_stm32::sai::{self, Sai};
use embassy_stm32::sdmmc::{self, Sdmmc};
use embassy_stm32::time::{khz, mhz};
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::timer::Channel;
use embassy_stm32::{bind_interrupts, peripherals};
use platform::config::{APP_NAME, APP_VERSION};
use platform::DimmableLed;
use static_cell::StaticCell;

use firmware::hw::audio::{audio_task, BearVolume, SaiAudio};
use firmware::hw::buttons::PawButton;
use firmware::hw::led::PwmLed;
use firmware::hw::power::StandbyPower;
use firmware::hw::storage::{SdStorage, SdVolume, SdmmcBlockDevice};
use firmware::{blink, App, Fault};

use defmt_rtt as _;
use panic_probe as _;

bind_interrupts!(struct Irqs {
    SDMMC1 => sdmmc::InterruptHandler<peripherals::SDMMC1>;
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

static VOLUME: StaticCell<BearVolume> = StaticCell::new();

// SAI DMA ring buffer. Must live in AXI SRAM: DTCM is not reachable by
// DMA1 and a buffer there corrupts silently.
#[link_section = ".axisram"]
static mut SAI_DMA_BUF: [u32; 1024] = [0; 1024];

/// Blink the fault code, then reset. Never returns at runtime.
async fn fatal(led: &mut impl DimmableLed, fault: Fault) {
    defmt::error!("fatal fault: {}", fault);
    blink(led, fault.blinks()).await;
    cortex_m::peripheral::SCB::sys_reset();
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("{=str} firmware v{=str}", APP_NAME, APP_VERSION);

    // Step 1: clocks. Never init with Default::default() — HSI48 must be
    // up or SDMMC1 hangs silently (see firmware::boot).
    let p = embassy_stm32::init(firmware::boot::build_embassy_config());

    // Step 2: wake cause, before anything can disturb the PWR flags.
    let power = StandbyPower::new();

    // Step 3: chest LED, first peripheral up so faults can blink.
    let led_pin = PwmPin::new_ch1(p.PA6, OutputType::PushPull);
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(led_pin),
        None,
        None,
        None,
        khz(1),
        Default::default(),
    );
    let mut led = PwmLed::new(pwm, Channel::Ch1);

    // Step 4: SD card. SDMMC1 on PC8-PC12/PD2, 4-bit bus.
    let mut sd = Sdmmc::new_4bit(
        p.SDMMC1,
        Irqs,
        p.PC12, // CLK
        p.PD2,  // CMD
        p.PC8,  // D0
        p.PC9,  // D1
        p.PC10, // D2
        p.PC11, // D3
        Default::default(),
    );
    if let Err(e) = sd.init_card(mhz(25)).await {
        defmt::error!("SD init failed: {}", e);
        fatal(&mut led, Fault::StorageInit).await;
        return;
    }
    defmt::info!("SD card up");

    let vol: &'static BearVolume = match SdVolume::mount(SdmmcBlockDevice::new(sd)) {
        Ok(vol) => VOLUME.init(vol),
        Err(_) => {
            defmt::error!("no FAT volume on card");
            fatal(&mut led, Fault::StorageInit).await;
            return;
        }
    };
    let storage = SdStorage::new(vol);

    // Step 5: audio. SAI1 block A, pins per firmware::hw::audio docs.
    let (sai_a, _sai_b) = sai::split_subblocks(p.SAI1);
    // SAFETY: taken exactly once, here, before any task runs.
    let sai_buf = unsafe { &mut *core::ptr::addr_of_mut!(SAI_DMA_BUF) };
    let sai_tx = Sai::new_asynchronous_with_mclk(
        sai_a,
        p.PE5, // SCK
        p.PE6, // SD
        p.PE4, // FS
        p.PE2, // MCLK
        p.DMA1_CH0,
        sai_buf,
        sai::Config::default(),
    );
    spawner.must_spawn(audio_task(vol, sai_tx));
    defmt::info!("audio task spawned");

    // Step 6: paw buttons, active-low with pull-ups.
    let left = PawButton::new(Input::new(p.PA0, Pull::Up).degrade());
    let right = PawButton::new(Input::new(p.PA2, Pull::Up).degrade());

    // Step 7: TRNG seeds track selection.
    let rng = Rng::new(p.RNG, Irqs);

    // Step 8: run the one cycle this boot exists for.
    let mut app = App::new(led, storage, SaiAudio, left, right, power, rng);
    if let Err(fault) = app.run_cycle().await {
        fatal(app.led_mut(), fault).await;
        return;
    }

    // deep_sleep powered us down on success; reaching this line means
    // Standby entry fell through. Reset to a known state.
    defmt::error!("standby fell through; resetting");
    cortex_m::peripheral::SCB::sys_reset();
}
