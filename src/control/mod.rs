//! Temperature regulation: PID, relay window and the per-mode algorithms.

pub mod pid;
pub mod regulator;
pub mod relay;

use pid::Gains;

/// Operator-adjustable control parameters.
///
/// Written directly by command handlers, read by the regulator on its next
/// run.  Values are never range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParameters {
    /// Target chamber temperature (°C).
    pub setpoint: f32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl ControlParameters {
    pub fn gains(&self) -> Gains {
        Gains {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
        }
    }
}
