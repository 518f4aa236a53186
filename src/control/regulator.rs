//! Per-mode regulation algorithms.
//!
//! ```text
//!  COOLING   bypass open?  target = sp - h : target = sp
//!            pv > target → bypass closed (cool) else bypass open
//!
//!  WARMING   PID(pv, sp) → out ∈ [0, window]
//!            heater on while out > ms-into-window
//! ```
//!
//! The regulator owns all algorithm state (PID, relay window, bang-bang
//! deadline) and reaches the outputs only through the [`ActuatorBank`].
//! Sensor fault codes are never consulted here.

use log::debug;

use super::ControlParameters;
use super::pid::PidController;
use super::relay::RelayWindow;
use crate::actuators::{Actuator, ActuatorBank};
use crate::config::{SystemConfig, WarmingGate, WarmingStrategy};

/// Regulation state for the Cooling and Warming modes.
pub struct TemperatureRegulator {
    pid: PidController,
    relay: RelayWindow,
    /// Earliest time the next bang-bang decision may run.  `None` = now.
    pause_due_ms: Option<u64>,
    strategy: WarmingStrategy,
    gate: WarmingGate,
    min_output: f32,
    hysteresis_c: f32,
    pause_ms: u32,
}

impl TemperatureRegulator {
    pub fn new(config: &SystemConfig) -> Self {
        let mut pid = PidController::new(config.pid_sample_ms);
        pid.set_limits(0.0, config.window_size_ms as f32);

        Self {
            pid,
            relay: RelayWindow::new(config.window_size_ms),
            pause_due_ms: None,
            strategy: config.warming_strategy,
            gate: config.warming_gate,
            min_output: config.min_output,
            hysteresis_c: config.hysteresis_c,
            pause_ms: config.cooling_pause_ms,
        }
    }

    // ── Mode entry ────────────────────────────────────────────

    /// Restart the relay window at `now_ms` and reinitialise the PID.
    pub fn reset_warming(&mut self, now_ms: u64) {
        self.relay.reset(now_ms);
        self.pid.reinitialize();
        self.pause_due_ms = None;
    }

    /// Let the first bang-bang decision after entering Cooling run at once.
    pub fn reset_cooling(&mut self) {
        self.pause_due_ms = None;
        self.pid.disable();
    }

    /// Nothing regulates in Standby; stop the PID so its output freezes.
    pub fn reset_standby(&mut self) {
        self.pid.disable();
    }

    // ── Algorithms ────────────────────────────────────────────

    /// Hysteresis bang-bang on the cold-bypass valve.
    ///
    /// Returns `false` if the inter-decision pause has not yet elapsed.
    pub fn cool(
        &mut self,
        now_ms: u64,
        pv: f32,
        params: &ControlParameters,
        bank: &mut ActuatorBank,
    ) -> bool {
        if !self.pause_elapsed(now_ms) {
            return false;
        }

        let mut target = params.setpoint;
        if bank.is_on(Actuator::ColdBypass) {
            target -= self.hysteresis_c;
        }

        // Bypass closed = refrigerant through the chamber = active cooling.
        let cooling = pv > target;
        bank.set(Actuator::ColdBypass, !cooling);
        debug!("cool: pv={:.2} target={:.2} cooling={}", pv, target, cooling);

        self.pause_due_ms = Some(now_ms + u64::from(self.pause_ms));
        true
    }

    /// Heater control for the configured warming strategy.
    pub fn warm(
        &mut self,
        now_ms: u64,
        pv: f32,
        params: &ControlParameters,
        bank: &mut ActuatorBank,
    ) {
        match self.strategy {
            WarmingStrategy::PidRelay => self.warm_pid_relay(now_ms, pv, params, bank),
            WarmingStrategy::Hysteresis => self.warm_hysteresis(now_ms, pv, params, bank),
        }
    }

    fn warm_pid_relay(
        &mut self,
        now_ms: u64,
        pv: f32,
        params: &ControlParameters,
        bank: &mut ActuatorBank,
    ) {
        let output = self.pid.compute(now_ms, pv, params.setpoint, params.gains());

        self.relay.advance(now_ms);
        let elapsed = self.relay.elapsed(now_ms) as f32;

        match self.gate {
            WarmingGate::Literal => {
                // Two independent checks: the relay check runs second and
                // can switch the heater back on below the minimum output.
                if output < self.min_output {
                    bank.set(Actuator::Heater, false);
                }
                bank.set(Actuator::Heater, output > elapsed);
            }
            WarmingGate::Exclusive => {
                let on = output >= self.min_output && output > elapsed;
                bank.set(Actuator::Heater, on);
            }
        }
        debug!(
            "warm: pv={:.2} sp={:.2} out={:.0} elapsed={:.0}",
            pv, params.setpoint, output, elapsed
        );
    }

    fn warm_hysteresis(
        &mut self,
        now_ms: u64,
        pv: f32,
        params: &ControlParameters,
        bank: &mut ActuatorBank,
    ) {
        if !self.pause_elapsed(now_ms) {
            return;
        }

        let mut target = params.setpoint;
        if bank.is_on(Actuator::Heater) {
            target += self.hysteresis_c;
        }
        bank.set(Actuator::Heater, pv < target);

        self.pause_due_ms = Some(now_ms + u64::from(self.pause_ms));
    }

    fn pause_elapsed(&self, now_ms: u64) -> bool {
        self.pause_due_ms.is_none_or(|due| now_ms >= due)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Latest PID output (0 outside Warming until first computed).
    pub fn pid_output(&self) -> f32 {
        self.pid.output()
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn relay(&self) -> &RelayWindow {
        &self.relay
    }
}
