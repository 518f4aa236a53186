//! Regulation behaviour seen through the full service: relay window
//! timing, the minimum-output gate and the alternative warming strategy.

use super::mock_hw::{LogSink, MockConsole, MockHardware};

use chamberctl::actuators::Actuator;
use chamberctl::app::service::AppService;
use chamberctl::config::{SystemConfig, WarmingGate, WarmingStrategy};

fn started(config: SystemConfig, pv: f32) -> (AppService, MockHardware, MockConsole, LogSink) {
    let mut app = AppService::new(config);
    let mut hw = MockHardware::new(pv);
    let console = MockConsole::new();
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, console, sink)
}

#[test]
fn window_start_advances_in_whole_windows() {
    let (mut app, mut hw, mut console, mut sink) = started(SystemConfig::default(), 18.0);
    console.send("WARMMODE");
    app.run_cycle(250, &mut hw, &mut console, &mut sink);

    // Irregular cycle spacing, long enough to cross several windows.
    let mut now = 250;
    for step in [130u64, 480, 2200, 90, 3100, 1700, 4999, 5001, 260] {
        now += step;
        app.run_cycle(now, &mut hw, &mut console, &mut sink);
        let relay = app.context().regulator.relay();
        assert_eq!((relay.start_ms() - 250) % 5000, 0, "at {now}");
        assert!(relay.elapsed(now) <= 5000, "at {now}");
    }
}

#[test]
fn literal_gate_lets_small_output_fire_early_in_window() {
    // P-only, tiny gain: output is far below the 500 minimum.
    let config = SystemConfig {
        kp: 20.0,
        ki: 0.0,
        kd: 0.0,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut console, mut sink) = started(config, 19.0);
    console.send("WARMMODE");
    app.run_cycle(0, &mut hw, &mut console, &mut sink);

    app.run_cycle(10, &mut hw, &mut console, &mut sink);
    let out = app.context().regulator.pid_output();
    assert!(out > 10.0 && out < 500.0, "out = {out}");
    assert!(hw.is_on(Actuator::Heater));

    // Both checks ran: forced off, then back on.
    let heater_writes: Vec<bool> = hw
        .writes
        .iter()
        .rev()
        .take(2)
        .map(|&(_, on)| on)
        .collect();
    assert_eq!(heater_writes, vec![true, false]);
}

#[test]
fn exclusive_gate_keeps_heater_off_below_minimum() {
    let config = SystemConfig {
        kp: 20.0,
        ki: 0.0,
        kd: 0.0,
        warming_gate: WarmingGate::Exclusive,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut console, mut sink) = started(config, 19.0);
    console.send("WARMMODE");
    app.run_cycle(0, &mut hw, &mut console, &mut sink);

    app.run_cycle(10, &mut hw, &mut console, &mut sink);
    assert!(!hw.is_on(Actuator::Heater));
}

#[test]
fn hysteresis_strategy_switches_heater_around_setpoint() {
    let config = SystemConfig {
        warming_strategy: WarmingStrategy::Hysteresis,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut console, mut sink) = started(config, 19.0);
    console.send("WARMMODE");
    app.run_cycle(0, &mut hw, &mut console, &mut sink);

    app.run_cycle(100, &mut hw, &mut console, &mut sink);
    assert!(hw.is_on(Actuator::Heater));

    // Heater on: holds until setpoint + 0.5.
    hw.pv = 20.3;
    app.run_cycle(700, &mut hw, &mut console, &mut sink);
    assert!(hw.is_on(Actuator::Heater));

    hw.pv = 20.6;
    app.run_cycle(1300, &mut hw, &mut console, &mut sink);
    assert!(!hw.is_on(Actuator::Heater));

    // No PID columns without the PID strategy.
    assert!(app.status_record().pid.is_none());
}

#[test]
fn cooling_pause_does_not_starve_commands() {
    let config = SystemConfig {
        cooling_pause_ms: 60_000,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut console, mut sink) = started(config, 25.0);
    console.send("COOLMODE");
    app.run_cycle(0, &mut hw, &mut console, &mut sink);
    app.run_cycle(100, &mut hw, &mut console, &mut sink);
    assert!(!hw.is_on(Actuator::ColdBypass));

    // Well inside the pause the next command still lands immediately.
    console.send("FANSOFF");
    app.run_cycle(200, &mut hw, &mut console, &mut sink);
    assert!(!hw.is_on(Actuator::Fans));
    assert_eq!(console.outbox.len(), 1);
}
