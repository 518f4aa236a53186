//! Sensor subsystem — the RTD front-end and the [`ChamberProbe`] wrapper.
//!
//! The probe turns one MAX31865 conversion into a [`SensorReading`] each
//! cycle.  Read failures never reach the control loop as errors: the
//! previous good temperature is kept and a fault code is reported instead.
//! Chip fault bits are logged by the event sink when the code changes; the
//! probe itself only logs a read error when it differs from the last one.

pub mod max31865;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use log::{info, warn};

use crate::error::SensorError;
use crate::fsm::context::SensorReading;
use max31865::Max31865;

/// Fault code reported when no valid temperature could be read (bus
/// failure or non-finite conversion).  Bit 0 is never set by the chip's
/// fault status register.
pub const FAULT_NO_READING: u8 = 0x01;

/// Chamber temperature probe: one PT100 on a MAX31865.
pub struct ChamberProbe<SPI, D> {
    rtd: Max31865<SPI, D>,
    last_good: SensorReading,
    /// Outcome of the previous read: `None` if it succeeded.
    last_error: Option<SensorError>,
}

impl<SPI, D> ChamberProbe<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    pub fn new(rtd: Max31865<SPI, D>) -> Self {
        Self {
            rtd,
            last_good: SensorReading::default(),
            last_error: None,
        }
    }

    /// Fault status first (it describes the previous conversion), then
    /// one fresh conversion.
    pub fn read(&mut self) -> SensorReading {
        match self.try_read() {
            Ok(reading) => {
                if self.error_changed(None) {
                    info!("RTD reading again");
                }
                self.last_good = reading;
                reading
            }
            Err(e) => {
                if self.error_changed(Some(e)) {
                    warn!("RTD read failed: {}", e);
                }
                SensorReading {
                    process_variable: self.last_good.process_variable,
                    fault_flags: FAULT_NO_READING,
                }
            }
        }
    }

    /// Record this read's outcome; `true` if it differs from the last one.
    fn error_changed(&mut self, outcome: Option<SensorError>) -> bool {
        let changed = self.last_error != outcome;
        self.last_error = outcome;
        changed
    }

    fn try_read(&mut self) -> Result<SensorReading, SensorError> {
        let fault_flags = self.rtd.read_fault()?;
        let process_variable = self.rtd.temperature()?;
        Ok(SensorReading {
            process_variable,
            fault_flags,
        })
    }
}
