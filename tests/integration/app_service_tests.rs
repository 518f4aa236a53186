//! Integration tests for the console → AppService → actuators pipeline.
//!
//! These run on the host (x86_64) and verify that operator lines typed on
//! the console end up as the right relay writes, status lines and events,
//! without any real hardware.

use super::mock_hw::{LogSink, MockConsole, MockHardware};

use chamberctl::actuators::Actuator;
use chamberctl::app::commands::{AppCommand, Parameter};
use chamberctl::app::events::AppEvent;
use chamberctl::app::service::AppService;
use chamberctl::config::SystemConfig;
use chamberctl::error::CommandError;
use chamberctl::fsm::ChamberMode;

const STEP_MS: u64 = 100;

struct Rig {
    app: AppService,
    hw: MockHardware,
    console: MockConsole,
    sink: LogSink,
    now_ms: u64,
}

impl Rig {
    fn new(pv: f32) -> Self {
        Self::with_config(SystemConfig::default(), pv)
    }

    fn with_config(config: SystemConfig, pv: f32) -> Self {
        let mut rig = Self {
            app: AppService::new(config),
            hw: MockHardware::new(pv),
            console: MockConsole::new(),
            sink: LogSink::new(),
            now_ms: 0,
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn cycle(&mut self) {
        self.app
            .run_cycle(self.now_ms, &mut self.hw, &mut self.console, &mut self.sink);
        self.now_ms += STEP_MS;
    }

    fn cycles(&mut self, n: usize) {
        for _ in 0..n {
            self.cycle();
        }
    }

    /// Type `line` and run the cycle that picks it up.
    fn send(&mut self, line: &str) {
        self.console.send(line);
        self.cycle();
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_drives_every_line_low_in_standby() {
    let rig = Rig::new(20.0);
    assert_eq!(rig.app.mode(), ChamberMode::Standby);
    assert_eq!(rig.hw.writes.len(), 5);
    for actuator in Actuator::ALL {
        assert_eq!(rig.hw.level(actuator), Some(false), "{:?}", actuator);
    }
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::Started(ChamberMode::Standby)]
    );
}

#[test]
fn first_cycle_prints_status_before_reading_sensor() {
    let mut rig = Rig::new(21.25);
    rig.cycle();
    let status = rig.console.last_status().unwrap();
    assert_eq!(status[0], "STANDBY");
    // pv not read yet when the first line is printed.
    assert_eq!(status[2], "0.00");
    assert_eq!(rig.hw.reads, 1);
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn cooling_end_to_end_closes_bypass_above_setpoint() {
    let mut rig = Rig::new(19.0);
    rig.send("COOLMODE");
    assert!(rig.hw.is_on(Actuator::Compressor));
    assert!(rig.hw.is_on(Actuator::ColdBypass), "bypass opens on entry");

    // This cycle's decision still sees the old 20.0 setpoint (target 19.5),
    // keeps the bypass open and arms the 500 ms pause; SETTEMP lands after it.
    rig.send("SETTEMP 18 5");
    assert_eq!(rig.app.context().params.setpoint, 18.5);
    assert!(rig.hw.is_on(Actuator::ColdBypass));
    rig.hw.clear();

    // t = 200..=500: inside the pause, nothing is decided.
    rig.cycles(4);
    assert!(rig.hw.writes.is_empty());
    assert!(rig.app.context().actuators.is_on(Actuator::ColdBypass));

    // t = 600: first decision after the deadline closes the bypass.
    rig.cycle();
    assert_eq!(rig.hw.writes, vec![(Actuator::ColdBypass, false)]);
    assert!(rig.app.context().actuators.is_on(Actuator::Compressor));
}

#[test]
fn warming_end_to_end_drives_heater_with_high_gain() {
    let mut rig = Rig::new(15.0);
    rig.send("WARMMODE");
    rig.send("SETKP 5000 0");
    rig.cycle();

    let out = rig.app.context().regulator.pid_output();
    assert_eq!(out, SystemConfig::default().window_size_ms as f32);
    assert!(rig.hw.is_on(Actuator::Heater));

    // PID columns appear on the next status line.
    rig.cycles(10);
    let status = rig.console.last_status().unwrap();
    assert_eq!(status.len(), 13);
    assert_eq!(status[0], "WARMING");
    assert_eq!(status[9], "5000.00");
    assert_eq!(status[12], "5000.00");
}

#[test]
fn settemp_in_standby_changes_no_actuator() {
    let mut rig = Rig::new(20.0);
    rig.hw.clear();
    rig.send("SETTEMP 4 0");
    rig.cycles(20);
    assert!(rig.hw.writes.is_empty());
    assert_eq!(rig.app.context().params.setpoint, 4.0);
    assert_eq!(rig.app.mode(), ChamberMode::Standby);
}

#[test]
fn cooling_to_warming_stops_refrigeration_and_resets_integrator() {
    let mut rig = Rig::new(10.0);
    rig.send("WARMMODE");
    rig.cycles(30);
    assert!(rig.app.context().regulator.pid().integral() > 0.0);

    rig.send("COOLMODE");
    rig.cycles(3);
    rig.send("WARMMODE");

    assert!(!rig.hw.is_on(Actuator::Compressor));
    assert!(!rig.hw.is_on(Actuator::ColdBypass));
    assert!(rig.hw.is_on(Actuator::Fans));
    assert!(rig.hw.is_on(Actuator::MasterPower));
    assert_eq!(rig.app.context().regulator.pid().integral(), 0.0);
}

// ── Single-actuator commands ──────────────────────────────────

#[test]
fn fan_and_power_commands_touch_one_line_each() {
    let mut rig = Rig::new(20.0);
    for (line, actuator, on) in [
        ("FANSON", Actuator::Fans, true),
        ("FANSOFF", Actuator::Fans, false),
        ("POWERON", Actuator::MasterPower, true),
        ("POWEROFF", Actuator::MasterPower, false),
    ] {
        rig.hw.clear();
        rig.send(line);
        assert_eq!(rig.hw.writes, vec![(actuator, on)], "{line}");
    }
}

#[test]
fn poweroff_is_not_a_mode_change() {
    let mut rig = Rig::new(25.0);
    rig.send("COOLMODE");
    rig.send("POWEROFF");
    assert_eq!(rig.app.mode(), ChamberMode::Cooling);
    assert!(!rig.hw.is_on(Actuator::MasterPower));
    assert!(rig.hw.is_on(Actuator::Compressor));
}

#[test]
fn repeating_a_mode_command_rewrites_its_baseline() {
    let mut rig = Rig::new(20.0);
    rig.send("STDBYMODE");
    let first = rig.hw.writes.split_off(5);
    rig.send("STDBYMODE");
    let second = rig.hw.writes.split_off(5);
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert!(first.contains(&(Actuator::MasterPower, true)));
}

// ── Ignored input ─────────────────────────────────────────────

#[test]
fn malformed_lines_are_logged_and_ignored() {
    let mut rig = Rig::new(20.0);
    rig.hw.clear();
    rig.send("coolmode");
    rig.send("SETTEMP 18");
    rig.send("");
    assert!(rig.hw.writes.is_empty());
    assert_eq!(rig.app.mode(), ChamberMode::Standby);

    let ignored: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::CommandIgnored(reason) => Some(*reason),
            _ => None,
        })
        .collect();
    assert_eq!(
        ignored,
        vec![
            CommandError::Unknown,
            CommandError::MissingArgument { expected: 2 }
        ]
    );
}

#[test]
fn only_one_command_is_handled_per_cycle() {
    let mut rig = Rig::new(20.0);
    rig.console.send("COOLMODE");
    rig.console.send("WARMMODE");
    rig.cycle();
    assert_eq!(rig.app.mode(), ChamberMode::Cooling);
    rig.cycle();
    assert_eq!(rig.app.mode(), ChamberMode::Warming);
}

#[test]
fn direct_command_api_matches_console_path() {
    let mut rig = Rig::new(20.0);
    rig.app.handle_command(
        AppCommand::Set {
            parameter: Parameter::Kd,
            value: 0.5,
        },
        &mut rig.hw,
        &mut rig.sink,
    );
    assert_eq!(rig.app.context().params.kd, 0.5);
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::ParameterChanged {
            parameter: Parameter::Kd,
            value: 0.5
        })
    );
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn sensor_fault_is_reported_but_does_not_stop_cooling() {
    let mut rig = Rig::new(30.0);
    rig.hw.fault = 0x80;
    rig.send("COOLMODE");
    rig.cycles(10);
    assert!(!rig.hw.is_on(Actuator::ColdBypass), "still cooling");
    // Reported once, not once per cycle.
    let faults = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::SensorFault { .. }))
        .count();
    assert_eq!(faults, 1);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::SensorFault { code: 0x80 }));

    let status = rig.console.last_status().unwrap();
    assert_eq!(status[1], "128");
}
