//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They go to the log, never
//! to the operator console.

use crate::actuators::Actuator;
use crate::error::CommandError;
use crate::fsm::ChamberMode;

use super::commands::Parameter;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the boot mode).
    Started(ChamberMode),

    /// A mode command ran; `from == to` on re-entry.
    ModeChanged { from: ChamberMode, to: ChamberMode },

    /// A single actuator was switched by operator command.
    ActuatorCommanded { actuator: Actuator, on: bool },

    /// An operator changed a control parameter.
    ParameterChanged { parameter: Parameter, value: f32 },

    /// A received line was ignored.
    CommandIgnored(CommandError),

    /// The RTD fault code changed (0 = healthy again).
    SensorFault { code: u8 },
}
