//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode controller and the shared chamber context.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService       │
//! ActuatorPort ◀──│  Modes · Regulator     │◀──▶ ConsolePort
//!                 └────────────────────────┘
//! ```
//!
//! One call to [`AppService::run_cycle`] is one pass of the control loop:
//!
//! 1. status line (every Nth cycle)
//! 2. read the RTD
//! 3. run the current mode's regulator
//! 4. handle at most one operator command

use log::{debug, info, warn};

use crate::actuators::Actuator;
use crate::config::{SystemConfig, WarmingStrategy};
use crate::error::CommandError;
use crate::fsm::context::ChamberContext;
use crate::fsm::modes::build_mode_table;
use crate::fsm::{ChamberMode, ModeController};
use crate::status::{PidFields, StatusRecord, format_status_line};

use super::commands::{self, AppCommand, Parameter};
use super::events::AppEvent;
use super::ports::{ActuatorPort, ConsolePort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    modes: ModeController,
    ctx: ChamberContext,
    status_every: u64,
    report_pid: bool,
    cycle_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Boots in Standby with every output off; call [`start`](Self::start)
    /// next to drive the lines to that state.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = ChamberContext::new(&config);
        let modes = ModeController::new(build_mode_table(), ChamberMode::Standby);
        let report_pid =
            config.report_pid_fields && config.warming_strategy == WarmingStrategy::PidRelay;

        Self {
            modes,
            ctx,
            status_every: u64::from(config.status_every_n_cycles.max(1)),
            report_pid,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every line to its boot level and announce the boot mode.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.ctx.actuators.rewrite_all();
        self.apply_actuators(hw);
        sink.emit(&AppEvent::Started(self.modes.current_mode()));
        info!("AppService started in {:?}", self.modes.current_mode());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle: status → sensor → regulator → command.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        console: &mut impl ConsolePort,
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now_ms;

        // 1. Status line
        if self.cycle_count % self.status_every == 0 {
            self.report_status(console);
        }
        self.cycle_count += 1;

        // 2. Sensor
        let reading = hw.read_temperature();
        if reading.fault_flags != self.ctx.reading.fault_flags {
            sink.emit(&AppEvent::SensorFault {
                code: reading.fault_flags,
            });
        }
        self.ctx.reading = reading;

        // 3. Regulator
        self.modes.regulate(&mut self.ctx);
        self.apply_actuators(hw);

        // 4. At most one command
        if let Some(line) = console.poll_line() {
            match commands::parse_line(&line) {
                Ok(cmd) => self.handle_command(cmd, hw, sink),
                Err(CommandError::Empty) => {}
                Err(e) => {
                    debug!("ignored line {:?}: {}", line.as_str(), e);
                    sink.emit(&AppEvent::CommandIgnored(e));
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one operator command.  Actuator changes reach `hw` before
    /// this returns; parameter changes take effect on the next regulator
    /// run.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::FansOn => self.command_actuator(Actuator::Fans, true, sink),
            AppCommand::FansOff => self.command_actuator(Actuator::Fans, false, sink),
            AppCommand::PowerOn => self.command_actuator(Actuator::MasterPower, true, sink),
            AppCommand::PowerOff => self.command_actuator(Actuator::MasterPower, false, sink),
            AppCommand::CoolMode => self.enter_mode(ChamberMode::Cooling, sink),
            AppCommand::WarmMode => self.enter_mode(ChamberMode::Warming, sink),
            AppCommand::StandbyMode => self.enter_mode(ChamberMode::Standby, sink),
            AppCommand::Set { parameter, value } => {
                let params = &mut self.ctx.params;
                match parameter {
                    Parameter::Setpoint => params.setpoint = value,
                    Parameter::Kp => params.kp = value,
                    Parameter::Ki => params.ki = value,
                    Parameter::Kd => params.kd = value,
                }
                if !value.is_finite() {
                    warn!("{} set to non-finite value {}", parameter.name(), value);
                }
                sink.emit(&AppEvent::ParameterChanged { parameter, value });
            }
        }
        self.apply_actuators(hw);
    }

    fn command_actuator(&mut self, actuator: Actuator, on: bool, sink: &mut impl EventSink) {
        self.ctx.actuators.set(actuator, on);
        sink.emit(&AppEvent::ActuatorCommanded { actuator, on });
    }

    fn enter_mode(&mut self, mode: ChamberMode, sink: &mut impl EventSink) {
        let from = self.modes.current_mode();
        self.modes.enter(mode, &mut self.ctx);
        sink.emit(&AppEvent::ModeChanged { from, to: mode });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of everything the status line shows.
    pub fn status_record(&self) -> StatusRecord {
        let params = &self.ctx.params;
        StatusRecord {
            mode: self.modes.current_mode() as u8,
            fault: self.ctx.reading.fault_flags,
            pv: self.ctx.reading.process_variable,
            setpoint: params.setpoint,
            actuators: self.ctx.actuators.state(),
            pid: self.report_pid.then(|| PidFields {
                kp: params.kp,
                ki: params.ki,
                kd: params.kd,
                output: self.ctx.regulator.pid_output(),
            }),
        }
    }

    pub fn mode(&self) -> ChamberMode {
        self.modes.current_mode()
    }

    /// Read-only view of the chamber context (parameters, reading,
    /// actuator status, regulator).
    pub fn context(&self) -> &ChamberContext {
        &self.ctx
    }

    /// Total cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn report_status(&self, console: &mut impl ConsolePort) {
        let line = format_status_line(&self.status_record());
        console.write_line(&line);
    }

    /// Flush queued line writes to the port, oldest first.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        self.ctx
            .actuators
            .drain_writes(|w| hw.write(w.actuator, w.on));
    }
}
