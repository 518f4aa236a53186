//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`ChamberProbe`] and the five relay lines, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only module
//! in the system that touches actual hardware.  Everything is generic
//! over `embedded_hal` traits, so the same adapter runs against mocks on
//! the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::actuators::Actuator;
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::RelayOutput;
use crate::fsm::context::SensorReading;
use crate::sensors::ChamberProbe;

/// One relay per actuator.
pub struct RelayLines<P> {
    pub master_power: RelayOutput<P>,
    pub compressor: RelayOutput<P>,
    pub cold_bypass: RelayOutput<P>,
    pub heater: RelayOutput<P>,
    pub fans: RelayOutput<P>,
}

impl<P: OutputPin> RelayLines<P> {
    /// Wrap the five pins; every relay starts de-energised.
    pub fn new(master_power: P, compressor: P, cold_bypass: P, heater: P, fans: P) -> Self {
        Self {
            master_power: RelayOutput::new(master_power, Actuator::MasterPower.name()),
            compressor: RelayOutput::new(compressor, Actuator::Compressor.name()),
            cold_bypass: RelayOutput::new(cold_bypass, Actuator::ColdBypass.name()),
            heater: RelayOutput::new(heater, Actuator::Heater.name()),
            fans: RelayOutput::new(fans, Actuator::Fans.name()),
        }
    }

    pub fn line(&mut self, actuator: Actuator) -> &mut RelayOutput<P> {
        match actuator {
            Actuator::MasterPower => &mut self.master_power,
            Actuator::Compressor => &mut self.compressor,
            Actuator::ColdBypass => &mut self.cold_bypass,
            Actuator::Heater => &mut self.heater,
            Actuator::Fans => &mut self.fans,
        }
    }
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<SPI, D, P> {
    probe: ChamberProbe<SPI, D>,
    relays: RelayLines<P>,
}

impl<SPI, D, P> HardwareAdapter<SPI, D, P>
where
    SPI: SpiDevice,
    D: DelayNs,
    P: OutputPin,
{
    pub fn new(probe: ChamberProbe<SPI, D>, relays: RelayLines<P>) -> Self {
        Self { probe, relays }
    }

    pub fn relays(&self) -> &RelayLines<P> {
        &self.relays
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<SPI, D, P> SensorPort for HardwareAdapter<SPI, D, P>
where
    SPI: SpiDevice,
    D: DelayNs,
    P: OutputPin,
{
    fn read_temperature(&mut self) -> SensorReading {
        self.probe.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<SPI, D, P> ActuatorPort for HardwareAdapter<SPI, D, P>
where
    SPI: SpiDevice,
    D: DelayNs,
    P: OutputPin,
{
    fn write(&mut self, actuator: Actuator, on: bool) {
        self.relays.line(actuator).set(on);
    }
}
