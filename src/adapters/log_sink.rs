//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF logger in production).  The operator
//! console never sees these lines.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::FAULT_NO_READING;
use crate::sensors::max31865::RtdFault;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | initial_mode={}", mode.name());
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {} -> {}", from.name(), to.name());
            }
            AppEvent::ActuatorCommanded { actuator, on } => {
                info!(
                    "CMD | {} {}",
                    actuator.name(),
                    if *on { "on" } else { "off" }
                );
            }
            AppEvent::ParameterChanged { parameter, value } => {
                info!("CMD | {} = {:.2}", parameter.name(), value);
            }
            AppEvent::CommandIgnored(reason) => {
                warn!("CMD | ignored: {}", reason);
            }
            AppEvent::SensorFault { code: 0 } => {
                info!("SENSOR | fault cleared");
            }
            AppEvent::SensorFault {
                code: FAULT_NO_READING,
            } => {
                warn!("SENSOR | fault=0x{:02X} no valid reading", FAULT_NO_READING);
            }
            AppEvent::SensorFault { code } => {
                warn!("SENSOR | fault=0x{:02X}", code);
                for fault in RtdFault::decode(*code) {
                    warn!("SENSOR |   {}", fault.description());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::Actuator;
    use crate::app::commands::Parameter;
    use crate::error::CommandError;
    use crate::fsm::ChamberMode;

    #[test]
    fn renders_every_event_kind() {
        let mut sink = LogEventSink::new();
        for event in [
            AppEvent::Started(ChamberMode::Standby),
            AppEvent::ModeChanged {
                from: ChamberMode::Standby,
                to: ChamberMode::Cooling,
            },
            AppEvent::ActuatorCommanded {
                actuator: Actuator::Fans,
                on: false,
            },
            AppEvent::ParameterChanged {
                parameter: Parameter::Setpoint,
                value: f32::NAN,
            },
            AppEvent::CommandIgnored(CommandError::Unknown),
            AppEvent::SensorFault { code: 0x84 },
            AppEvent::SensorFault {
                code: FAULT_NO_READING,
            },
            AppEvent::SensorFault { code: 0 },
        ] {
            sink.emit(&event);
        }
    }
}
