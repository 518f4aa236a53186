//! System configuration parameters
//!
//! All tunables for the chamber controller.  Defaults are compiled in; a
//! JSON override document can replace any subset of fields at boot.
//! Nothing here is persisted: after a power cycle or watchdog reset the
//! controller always starts from these values.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Worst-case time spent inside one RTD conversion (bias settle + one-shot).
pub const RTD_CONVERSION_BUDGET_MS: u32 = 80;

/// Worst-case time to push one status line out at 9600 baud.
pub const STATUS_LINE_BUDGET_MS: u32 = 120;

/// How the heater is driven while in Warming mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarmingStrategy {
    /// Time-proportioning PID relay over a fixed window.
    PidRelay,
    /// On/off with +0.5 °C hysteresis while the heater is on.
    Hysteresis,
}

/// How the minimum-output gate combines with the relay on/off check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarmingGate {
    /// Both checks run independently; the relay check runs last and wins.
    Literal,
    /// Below the minimum output the heater stays off for the whole window.
    Exclusive,
}

/// RTD wiring of the probe connected to the MAX31865.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RtdWires {
    Two,
    Three,
    Four,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Control parameters (initial values) ---
    /// Setpoint at boot (°C)
    pub setpoint_c: f32,
    /// Proportional gain at boot
    pub kp: f32,
    /// Integral gain at boot
    pub ki: f32,
    /// Derivative gain at boot
    pub kd: f32,

    // --- Warming ---
    pub warming_strategy: WarmingStrategy,
    pub warming_gate: WarmingGate,
    /// Relay window length (ms); also the PID output upper limit
    pub window_size_ms: u32,
    /// PID output below which the heater is forced off
    pub min_output: f32,
    /// PID recompute interval (ms)
    pub pid_sample_ms: u32,

    // --- Bang-bang ---
    /// Setpoint offset applied while the bypass is open, or while the
    /// heater is on under the hysteresis warming strategy (°C)
    pub hysteresis_c: f32,
    /// Minimum pause between bang-bang decisions (ms)
    pub cooling_pause_ms: u32,

    // --- Reporting ---
    /// Emit the status line every N control cycles
    pub status_every_n_cycles: u32,
    /// Append Kp, Ki, Kd and PID output to the status line
    pub report_pid_fields: bool,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- RTD ---
    /// Probe resistance at 0 °C (Ω), 100 for PT100
    pub rtd_nominal_ohms: f32,
    /// MAX31865 reference resistor (Ω)
    pub rtd_reference_ohms: f32,
    pub rtd_wires: RtdWires,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Control parameters
            setpoint_c: 20.0,
            kp: 2.0,
            ki: 5.0,
            kd: 1.0,

            // Warming
            warming_strategy: WarmingStrategy::PidRelay,
            warming_gate: WarmingGate::Literal,
            window_size_ms: 5000,
            min_output: 500.0, // 10% of the window
            pid_sample_ms: 100,

            // Bang-bang
            hysteresis_c: 0.5,
            cooling_pause_ms: 500,

            // Reporting
            status_every_n_cycles: 10,
            report_pid_fields: true,

            // Timing
            control_loop_interval_ms: 100,
            watchdog_timeout_ms: 4000,

            // RTD (PT100, Adafruit breakout reference)
            rtd_nominal_ohms: 100.0,
            rtd_reference_ohms: 430.0,
            rtd_wires: RtdWires::Three,
        }
    }
}

impl SystemConfig {
    /// Parse an override document.  Missing fields keep their defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(doc).map_err(|_| ConfigError::Malformed)
    }

    /// Defaults, overridden by `doc` if given, then validated.
    pub fn load(doc: Option<&str>) -> Result<Self, ConfigError> {
        let config = match doc {
            Some(doc) => Self::from_json(doc)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the timing and structural fields.
    ///
    /// Setpoint and gains are intentionally not checked: operators can set
    /// any value at runtime and the boot values follow the same rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size_ms == 0 {
            return Err(ConfigError::ValidationFailed("window_size_ms must be > 0"));
        }
        if self.pid_sample_ms == 0 {
            return Err(ConfigError::ValidationFailed("pid_sample_ms must be > 0"));
        }
        if self.status_every_n_cycles == 0 {
            return Err(ConfigError::ValidationFailed(
                "status_every_n_cycles must be > 0",
            ));
        }
        if self.rtd_reference_ohms <= 0.0 || self.rtd_nominal_ohms <= 0.0 {
            return Err(ConfigError::ValidationFailed("RTD resistances must be > 0"));
        }
        if self.worst_case_cycle_ms() >= self.watchdog_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "worst-case cycle exceeds watchdog timeout",
            ));
        }
        Ok(())
    }

    /// Upper bound on one loop iteration: the inter-cycle sleep, one RTD
    /// conversion and one status line.  The cooling pause is a deadline,
    /// not a sleep, so it never adds to the cycle.
    pub fn worst_case_cycle_ms(&self) -> u32 {
        self.control_loop_interval_ms
            .saturating_add(RTD_CONVERSION_BUDGET_MS)
            .saturating_add(STATUS_LINE_BUDGET_MS)
    }
}
