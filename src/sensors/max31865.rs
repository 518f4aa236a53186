//! MAX31865 RTD-to-digital converter (PT100, 430 Ω reference).
//!
//! Generic over any `embedded_hal` 1.0 [`SpiDevice`] (SPI mode 1 or 3,
//! chip select handled by the device) and a blocking [`DelayNs`].
//!
//! One conversion:
//!
//! ```text
//! clear fault ─▶ bias on ─▶ 10 ms ─▶ 1-shot ─▶ 65 ms ─▶ read RTD ─▶ bias off
//! ```
//!
//! The 15-bit RTD code is the ratio `R_rtd / R_ref` scaled by 2^15.
//! Temperature follows the Callendar–Van Dusen equation, with a fitted
//! polynomial below 0 °C where the quadratic form loses accuracy.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::config::RtdWires;
use crate::error::SensorError;

// ── Registers ─────────────────────────────────────────────────

const REG_CONFIG: u8 = 0x00;
const REG_RTD_MSB: u8 = 0x01;
const REG_FAULT_STATUS: u8 = 0x07;
const WRITE_FLAG: u8 = 0x80;

// ── Configuration bits ────────────────────────────────────────

const CFG_BIAS: u8 = 0x80;
const CFG_AUTO: u8 = 0x40;
const CFG_1SHOT: u8 = 0x20;
const CFG_3WIRE: u8 = 0x10;
/// Fault-detection cycle bits; must be zero when clearing.
const CFG_FAULT_CYCLE: u8 = 0x0C;
const CFG_FAULT_CLEAR: u8 = 0x02;

const BIAS_SETTLE_MS: u32 = 10;
const CONVERSION_MS: u32 = 65;

// ── Callendar–Van Dusen (IEC 60751) ───────────────────────────

const RTD_A: f32 = 3.9083e-3;
const RTD_B: f32 = -5.775e-7;

/// Full-scale RTD code (15 bits).
const RTD_FULL_SCALE: f32 = 32768.0;

// ── Fault decoding ────────────────────────────────────────────

/// One bit of the fault status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtdFault {
    HighThreshold = 0x80,
    LowThreshold = 0x40,
    RefInLow = 0x20,
    RefInHigh = 0x10,
    RtdInLow = 0x08,
    OverUnderVoltage = 0x04,
}

impl RtdFault {
    pub const ALL: [RtdFault; 6] = [
        Self::HighThreshold,
        Self::LowThreshold,
        Self::RefInLow,
        Self::RefInHigh,
        Self::RtdInLow,
        Self::OverUnderVoltage,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Self::HighThreshold => "RTD high threshold",
            Self::LowThreshold => "RTD low threshold",
            Self::RefInLow => "REFIN- > 0.85 x bias",
            Self::RefInHigh => "REFIN- < 0.85 x bias, FORCE- open",
            Self::RtdInLow => "RTDIN- < 0.85 x bias, FORCE- open",
            Self::OverUnderVoltage => "over/under voltage",
        }
    }

    /// Every fault set in a raw status byte.
    pub fn decode(status: u8) -> impl Iterator<Item = RtdFault> {
        Self::ALL
            .into_iter()
            .filter(move |f| status & (*f as u8) != 0)
    }
}

// ── Driver ────────────────────────────────────────────────────

/// Blocking MAX31865 driver.
pub struct Max31865<SPI, D> {
    spi: SPI,
    delay: D,
    nominal_ohms: f32,
    reference_ohms: f32,
}

impl<SPI, D> Max31865<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    pub fn new(spi: SPI, delay: D, nominal_ohms: f32, reference_ohms: f32) -> Self {
        Self {
            spi,
            delay,
            nominal_ohms,
            reference_ohms,
        }
    }

    /// Configure wiring, turn off bias and auto-conversion, clear faults.
    pub fn init(&mut self, wires: RtdWires) -> Result<(), SensorError> {
        let mut cfg = self.read_reg(REG_CONFIG)?;
        match wires {
            RtdWires::Three => cfg |= CFG_3WIRE,
            RtdWires::Two | RtdWires::Four => cfg &= !CFG_3WIRE,
        }
        cfg &= !(CFG_BIAS | CFG_AUTO | CFG_1SHOT);
        self.write_reg(REG_CONFIG, cfg)?;
        self.clear_fault()
    }

    /// Raw fault status register.  0 = healthy.
    pub fn read_fault(&mut self) -> Result<u8, SensorError> {
        self.read_reg(REG_FAULT_STATUS)
    }

    pub fn clear_fault(&mut self) -> Result<(), SensorError> {
        let mut cfg = self.read_reg(REG_CONFIG)?;
        cfg &= !(CFG_1SHOT | CFG_FAULT_CYCLE);
        cfg |= CFG_FAULT_CLEAR;
        self.write_reg(REG_CONFIG, cfg)
    }

    /// Run one biased single-shot conversion and return the 15-bit code.
    ///
    /// Bias is switched off again on every path once it was switched on,
    /// including a failed conversion; the conversion error is reported
    /// first.
    pub fn read_rtd(&mut self) -> Result<u16, SensorError> {
        self.clear_fault()?;
        self.set_bias(true)?;

        let code = self.biased_conversion();
        let bias_off = self.set_bias(false);
        let code = code?;
        bias_off?;
        Ok(code)
    }

    fn biased_conversion(&mut self) -> Result<u16, SensorError> {
        self.delay.delay_ms(BIAS_SETTLE_MS);

        let cfg = self.read_reg(REG_CONFIG)? | CFG_1SHOT;
        self.write_reg(REG_CONFIG, cfg)?;
        self.delay.delay_ms(CONVERSION_MS);

        let mut buf = [0u8; 2];
        self.read_regs(REG_RTD_MSB, &mut buf)?;

        // LSB bit 0 is the fault flag.
        Ok(u16::from_be_bytes(buf) >> 1)
    }

    /// One conversion, converted to °C.
    pub fn temperature(&mut self) -> Result<f32, SensorError> {
        let code = self.read_rtd()?;
        let celsius = code_to_celsius(code, self.nominal_ohms, self.reference_ohms);
        if celsius.is_finite() {
            Ok(celsius)
        } else {
            Err(SensorError::OutOfRange)
        }
    }

    fn set_bias(&mut self, on: bool) -> Result<(), SensorError> {
        let mut cfg = self.read_reg(REG_CONFIG)?;
        if on {
            cfg |= CFG_BIAS;
        } else {
            cfg &= !CFG_BIAS;
        }
        self.write_reg(REG_CONFIG, cfg)
    }

    // ── Bus access ────────────────────────────────────────────

    fn read_reg(&mut self, addr: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.read_regs(addr, &mut buf)?;
        Ok(buf[0])
    }

    fn read_regs(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.spi
            .transaction(&mut [Operation::Write(&[addr & !WRITE_FLAG]), Operation::Read(buf)])
            .map_err(|_| SensorError::BusFailed)
    }

    fn write_reg(&mut self, addr: u8, value: u8) -> Result<(), SensorError> {
        self.spi
            .write(&[addr | WRITE_FLAG, value])
            .map_err(|_| SensorError::BusFailed)
    }
}

/// Convert a 15-bit RTD code to °C.
pub fn code_to_celsius(code: u16, nominal_ohms: f32, reference_ohms: f32) -> f32 {
    let rt = f32::from(code) / RTD_FULL_SCALE * reference_ohms;
    resistance_to_celsius(rt, nominal_ohms)
}

/// Callendar–Van Dusen inversion for `rt` ohms on a probe of
/// `nominal_ohms` at 0 °C.
pub fn resistance_to_celsius(rt: f32, nominal_ohms: f32) -> f32 {
    let z1 = -RTD_A;
    let z2 = RTD_A * RTD_A - 4.0 * RTD_B;
    let z3 = (4.0 * RTD_B) / nominal_ohms;
    let z4 = 2.0 * RTD_B;

    let temp = ((z2 + z3 * rt).sqrt() + z1) / z4;
    if temp >= 0.0 {
        return temp;
    }

    // Below 0 °C: polynomial fit on the resistance normalised to a PT100.
    let r = rt / nominal_ohms * 100.0;
    let mut rpoly = r;
    let mut temp = -242.02;
    temp += 2.2228 * rpoly;
    rpoly *= r;
    temp += 2.5859e-3 * rpoly;
    rpoly *= r;
    temp -= 4.8260e-6 * rpoly;
    rpoly *= r;
    temp -= 2.8183e-8 * rpoly;
    rpoly *= r;
    temp += 1.5243e-10 * rpoly;
    temp
}
