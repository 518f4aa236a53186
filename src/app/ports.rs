//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (RTD front-end, relay lines, serial console, event
//! sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.

use heapless::String;

use crate::actuators::Actuator;
use crate::fsm::context::SensorReading;

/// Longest operator command line kept by a console adapter.
pub const CONSOLE_LINE_CAP: usize = 64;

/// One received operator line, terminator stripped.
pub type ConsoleLine = String<CONSOLE_LINE_CAP>;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Take one temperature sample.  Infallible: a failed read reports a
    /// non-zero fault code and the last good temperature.
    fn read_temperature(&mut self) -> SensorReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drives one relay line.  No feedback.
pub trait ActuatorPort {
    fn write(&mut self, actuator: Actuator, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Console port (driven adapter: operator ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Line-oriented operator channel.
pub trait ConsolePort {
    /// Return the next complete line, if one has arrived.  Never blocks.
    fn poll_line(&mut self) -> Option<ConsoleLine>;

    /// Send one line; the adapter appends the terminator.
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
