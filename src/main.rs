//! Chamber controller firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter      SerialConsole      LogEventSink        │
//! │  (Sensor + Actuator)  (Console)          (EventSink)         │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            AppService (pure logic)                   │    │
//! │  │  Modes · Regulator · Commands · Status               │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  Watchdog · MonotonicClock                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, OutputPin, Pin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::uart::UartDriver;
use esp_idf_hal::units::Hertz;

use chamberctl::adapters::console::SerialConsole;
use chamberctl::adapters::hardware::{HardwareAdapter, RelayLines};
use chamberctl::adapters::log_sink::LogEventSink;
use chamberctl::adapters::time::MonotonicClock;
use chamberctl::app::service::AppService;
use chamberctl::config::SystemConfig;
use chamberctl::drivers::watchdog::Watchdog;
use chamberctl::error::Error;
use chamberctl::pins;
use chamberctl::sensors::ChamberProbe;
use chamberctl::sensors::max31865::Max31865;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  chamberctl v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::load(option_env!("CHAMBERCTL_CONFIG_JSON")).unwrap_or_else(|e| {
        warn!("Config override rejected ({}), using defaults", Error::from(e));
        SystemConfig::default()
    });
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 3. Peripherals ────────────────────────────────────────
    let p = Peripherals::take()?;
    let gpio = p.pins;

    let relays = RelayLines::new(
        output(gpio.gpio2.downgrade_output(), pins::MASTER_POWER_GPIO)?,
        output(gpio.gpio3.downgrade_output(), pins::COMPRESSOR_GPIO)?,
        output(gpio.gpio4.downgrade_output(), pins::COLD_BYPASS_GPIO)?,
        output(gpio.gpio5.downgrade_output(), pins::HEATER_GPIO)?,
        output(gpio.gpio6.downgrade_output(), pins::FANS_GPIO)?,
    );

    let spi = SpiDriver::new(
        p.spi2,
        gpio.gpio13,
        gpio.gpio11,
        Some(gpio.gpio12),
        &SpiDriverConfig::new(),
    )?;
    let spi_config = esp_idf_hal::spi::config::Config::new()
        .baudrate(Hertz(pins::RTD_SPI_FREQ_HZ))
        .data_mode(embedded_hal::spi::MODE_1);
    let rtd_bus = SpiDeviceDriver::new(spi, Some(gpio.gpio10), &spi_config)?;

    let mut rtd = Max31865::new(
        rtd_bus,
        Delay::new_default(),
        config.rtd_nominal_ohms,
        config.rtd_reference_ohms,
    );
    if let Err(e) = rtd.init(config.rtd_wires) {
        // Keep running: the fault shows on every status line.
        warn!("RTD init failed: {}", Error::from(e));
    }

    // UART0 stays the ESP-IDF log console; operators get UART1.
    anyhow::ensure!(
        gpio.gpio17.pin() as i32 == pins::UART_TX_GPIO
            && gpio.gpio18.pin() as i32 == pins::UART_RX_GPIO,
        "console UART pins disagree with pin map"
    );
    let uart_config = esp_idf_hal::uart::config::Config::new().baudrate(Hertz(pins::UART_BAUD));
    let uart = UartDriver::new(
        p.uart1,
        gpio.gpio17,
        gpio.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;

    // ── 4. Adapters + service ─────────────────────────────────
    let mut hw = HardwareAdapter::new(ChamberProbe::new(rtd), relays);
    let mut console = SerialConsole::new(uart);
    let mut log_sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    let mut app = AppService::new(config.clone());
    app.start(&mut hw, &mut log_sink);

    info!(
        "System ready. Loop every {} ms, watchdog {} ms.",
        config.control_loop_interval_ms,
        watchdog.timeout_ms()
    );

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        watchdog.feed();
        app.run_cycle(clock.uptime_ms(), &mut hw, &mut console, &mut log_sink);
        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}

/// Claim `pin` as a push-pull output, checking it against the pin map.
fn output(
    pin: AnyOutputPin,
    expected_gpio: i32,
) -> Result<PinDriver<'static, AnyOutputPin, esp_idf_hal::gpio::Output>> {
    anyhow::ensure!(
        pin.pin() as i32 == expected_gpio,
        "relay wired to GPIO{} but pin map says GPIO{}",
        pin.pin(),
        expected_gpio
    );
    Ok(PinDriver::output(pin)?)
}
