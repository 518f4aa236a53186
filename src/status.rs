//! Status reporter — projects controller state onto the operator status line.
//!
//! ```text
//! mode \t fault \t pv \t sp \t master \t compressor \t bypass \t heater \t fans [\t Kp \t Ki \t Kd \t out]
//! ```
//!
//! Pure formatting: nothing here holds state or touches hardware.

use core::fmt::{self, Write};

use heapless::String;
use log::warn;

use crate::actuators::{Actuator, ActuatorState};
use crate::fsm::ChamberMode;

/// Capacity of one formatted status line.  Large enough for every field at
/// its widest finite `f32` rendering.
pub const STATUS_LINE_CAP: usize = 384;

/// PID columns appended when the warming strategy reports them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidFields {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub output: f32,
}

/// Everything one status line shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusRecord {
    /// Raw mode index; anything unknown prints as `ERROR`.
    pub mode: u8,
    pub fault: u8,
    pub pv: f32,
    pub setpoint: f32,
    pub actuators: ActuatorState,
    pub pid: Option<PidFields>,
}

/// Status-line name for a raw mode index.
pub fn mode_name(raw: u8) -> &'static str {
    ChamberMode::from_index(raw).map_or("ERROR", ChamberMode::name)
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{:.2}\t{:.2}",
            mode_name(self.mode),
            self.fault,
            self.pv,
            self.setpoint
        )?;
        for actuator in Actuator::ALL {
            write!(f, "\t{}", u8::from(self.actuators.get(actuator)))?;
        }
        if let Some(pid) = self.pid {
            write!(
                f,
                "\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                pid.kp, pid.ki, pid.kd, pid.output
            )?;
        }
        Ok(())
    }
}

/// Render `record` into a fixed-capacity line (no terminator).
pub fn format_status_line(record: &StatusRecord) -> String<STATUS_LINE_CAP> {
    let mut line = String::new();
    if write!(line, "{record}").is_err() {
        warn!("status line truncated at {} bytes", STATUS_LINE_CAP);
    }
    line
}
