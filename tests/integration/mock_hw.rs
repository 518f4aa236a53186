//! Mock hardware adapters for integration tests.
//!
//! Records every relay write, console line and event so tests can assert
//! on the full history without touching real GPIO, SPI or UART.

use std::collections::VecDeque;

use chamberctl::actuators::Actuator;
use chamberctl::app::events::AppEvent;
use chamberctl::app::ports::{ActuatorPort, ConsoleLine, ConsolePort, EventSink, SensorPort};
use chamberctl::fsm::context::SensorReading;

// ── MockHardware ──────────────────────────────────────────────

/// RTD + relay board.  `pv` is what the next read returns.
pub struct MockHardware {
    pub pv: f32,
    pub fault: u8,
    pub writes: Vec<(Actuator, bool)>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(pv: f32) -> Self {
        Self {
            pv,
            fault: 0,
            writes: Vec::new(),
            reads: 0,
        }
    }

    /// Last level written to `actuator`, if it was ever written.
    pub fn level(&self, actuator: Actuator) -> Option<bool> {
        self.writes
            .iter()
            .rev()
            .find(|(a, _)| *a == actuator)
            .map(|&(_, on)| on)
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.level(actuator).unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> SensorReading {
        self.reads += 1;
        SensorReading {
            process_variable: self.pv,
            fault_flags: self.fault,
        }
    }
}

impl ActuatorPort for MockHardware {
    fn write(&mut self, actuator: Actuator, on: bool) {
        self.writes.push((actuator, on));
    }
}

// ── MockConsole ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockConsole {
    pub inbox: VecDeque<String>,
    pub outbox: Vec<String>,
}

#[allow(dead_code)]
impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, line: &str) {
        self.inbox.push_back(line.to_string());
    }

    /// Fields of the most recent status line.
    pub fn last_status(&self) -> Option<Vec<String>> {
        self.outbox
            .last()
            .map(|l| l.split('\t').map(str::to_string).collect())
    }
}

impl ConsolePort for MockConsole {
    fn poll_line(&mut self) -> Option<ConsoleLine> {
        let line = self.inbox.pop_front()?;
        ConsoleLine::try_from(line.as_str()).ok()
    }

    fn write_line(&mut self, line: &str) {
        self.outbox.push(line.to_string());
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
