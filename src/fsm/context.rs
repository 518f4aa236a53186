//! Shared mutable context threaded through every mode handler.
//!
//! `ChamberContext` is the single owned struct the mode table reads from
//! and writes to: the latest sensor reading, the operator parameters, the
//! actuator bank and the regulator state.  It replaces the free-floating
//! globals of a classic Arduino sketch; nothing else keeps a copy of any
//! of this state.

use crate::actuators::ActuatorBank;
use crate::config::SystemConfig;
use crate::control::ControlParameters;
use crate::control::regulator::TemperatureRegulator;

// ---------------------------------------------------------------------------
// Sensor reading (written once per cycle by the service)
// ---------------------------------------------------------------------------

/// One RTD sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    /// Chamber temperature (°C).
    pub process_variable: f32,
    /// Raw fault status from the RTD front-end; informational only.
    pub fault_flags: u8,
}

// ---------------------------------------------------------------------------
// ChamberContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler function.
pub struct ChamberContext {
    // -- Timing --
    /// Monotonic time of the current cycle (ms since boot).
    pub now_ms: u64,

    // -- Sensor data --
    /// Most recent reading.  Updated before each regulator run.
    pub reading: SensorReading,

    // -- Operator parameters --
    pub params: ControlParameters,

    // -- Outputs --
    pub actuators: ActuatorBank,

    // -- Algorithm state --
    pub regulator: TemperatureRegulator,
}

impl ChamberContext {
    /// Boot state: parameters from `config`, every actuator off.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            now_ms: 0,
            reading: SensorReading::default(),
            params: ControlParameters {
                setpoint: config.setpoint_c,
                kp: config.kp,
                ki: config.ki,
                kd: config.kd,
            },
            actuators: ActuatorBank::new(),
            regulator: TemperatureRegulator::new(config),
        }
    }
}
