//! GPIO / peripheral pin assignments for the chamber controller board.
//!
//! Single source of truth: `main` checks every claimed pin against this module
//! rather than hard-coding pin numbers.  Relay outputs are numbered in
//! harness order: master, compressor, bypass, heater, fans.

// ---------------------------------------------------------------------------
// Relay outputs (active HIGH, opto-isolated relay board)
// ---------------------------------------------------------------------------

/// Master power contactor coil.
pub const MASTER_POWER_GPIO: i32 = 2;
/// Compressor contactor.
pub const COMPRESSOR_GPIO: i32 = 3;
/// Cold-bypass solenoid valve.  HIGH = bypass open (cooling paused).
pub const COLD_BYPASS_GPIO: i32 = 4;
/// Heater SSR.
pub const HEATER_GPIO: i32 = 5;
/// Chamber + radiator circulation fans.
pub const FANS_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// MAX31865 RTD front-end (SPI2)
// ---------------------------------------------------------------------------

/// Chip select, driven by the SPI device driver.
pub const RTD_CS_GPIO: i32 = 10;
/// MOSI (SDI on the MAX31865).
pub const RTD_SDI_GPIO: i32 = 11;
/// MISO (SDO on the MAX31865).
pub const RTD_SDO_GPIO: i32 = 12;
pub const RTD_SCLK_GPIO: i32 = 13;

/// SPI clock for the MAX31865 (max 5 MHz; mode 1 or 3).
pub const RTD_SPI_FREQ_HZ: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Operator console (UART1)
// ---------------------------------------------------------------------------
//
// UART0 on GPIO43/44 stays the ESP-IDF console that `log` output goes to.
// The operator link carries only status lines and commands.

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
pub const UART_BAUD: u32 = 9_600;

/// TX/RX of UART0, the ESP-IDF log console.
pub const IDF_CONSOLE_GPIOS: [i32; 2] = [43, 44];

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIMED: [i32; 11] = [
        MASTER_POWER_GPIO,
        COMPRESSOR_GPIO,
        COLD_BYPASS_GPIO,
        HEATER_GPIO,
        FANS_GPIO,
        RTD_CS_GPIO,
        RTD_SDI_GPIO,
        RTD_SDO_GPIO,
        RTD_SCLK_GPIO,
        UART_TX_GPIO,
        UART_RX_GPIO,
    ];

    #[test]
    fn operator_console_is_not_the_log_console() {
        for gpio in IDF_CONSOLE_GPIOS {
            assert_ne!(UART_TX_GPIO, gpio);
            assert_ne!(UART_RX_GPIO, gpio);
        }
    }

    #[test]
    fn no_pin_is_claimed_twice() {
        for (i, a) in CLAIMED.iter().enumerate() {
            assert!(!CLAIMED[i + 1..].contains(a), "GPIO{} claimed twice", a);
            assert!(!IDF_CONSOLE_GPIOS.contains(a), "GPIO{} is the log console", a);
        }
    }
}
