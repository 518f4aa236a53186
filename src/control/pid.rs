//! PID controller for the heater relay
//!
//! Fixed-sample-time PID: the output is only recomputed once
//! `sample_ms` has elapsed since the previous computation, and the
//! integral and derivative gains are scaled by that fixed period so the
//! tuning does not depend on how fast the main loop spins.  Derivative
//! acts on the measurement (not the error) so setpoint changes do not kick
//! the output.

/// Controller gains, passed in on every computation so operator updates
/// take effect on the next sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// PID controller
pub struct PidController {
    sample_ms: u32,
    output_min: f32,
    output_max: f32,
    /// Integral term (already multiplied by Ki), clamped to the output range.
    integral: f32,
    last_input: Option<f32>,
    last_output: f32,
    last_compute_ms: Option<u64>,
    enabled: bool,
}

impl PidController {
    /// A disabled controller with output limits `[0, 100]`.
    pub fn new(sample_ms: u32) -> Self {
        Self {
            sample_ms: sample_ms.max(1),
            output_min: 0.0,
            output_max: 100.0,
            integral: 0.0,
            last_input: None,
            last_output: 0.0,
            last_compute_ms: None,
            enabled: false,
        }
    }

    /// Set output limits
    pub fn set_limits(&mut self, min: f32, max: f32) {
        self.output_min = min;
        self.output_max = max;
        self.integral = self.clamp(self.integral);
        self.last_output = self.clamp(self.last_output);
    }

    /// Clear all runtime state and enable the controller.  The next
    /// [`compute`](Self::compute) runs immediately.
    pub fn reinitialize(&mut self) {
        self.integral = 0.0;
        self.last_input = None;
        self.last_output = 0.0;
        self.last_compute_ms = None;
        self.enabled = true;
    }

    /// Stop computing; [`compute`](Self::compute) keeps returning the last output.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Advance the controller.
    ///
    /// Returns the current output, which only changes when a full sample
    /// period has elapsed since the last computation.
    pub fn compute(&mut self, now_ms: u64, input: f32, setpoint: f32, gains: Gains) -> f32 {
        if !self.enabled {
            return self.last_output;
        }
        if let Some(last) = self.last_compute_ms {
            if now_ms.saturating_sub(last) < u64::from(self.sample_ms) {
                return self.last_output;
            }
        }

        let dt = self.sample_ms as f32 / 1000.0;
        let error = setpoint - input;
        let d_input = self.last_input.map_or(0.0, |last| input - last);

        // Integral (anti-windup: the accumulated term never leaves the output range)
        self.integral = self.clamp(self.integral + gains.ki * dt * error);

        let p = gains.kp * error;
        let d = gains.kd / dt * d_input;
        let output = self.clamp(p + self.integral - d);

        self.last_input = Some(input);
        self.last_output = output;
        self.last_compute_ms = Some(now_ms);
        output
    }

    pub fn output(&self) -> f32 {
        self.last_output
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_compute_ms(&self) -> Option<u64> {
        self.last_compute_ms
    }

    /// Clamp to the output range.  Non-finite values collapse to the lower
    /// limit so NaN gains cannot push the relay out of range.
    fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.output_min
        } else {
            value.clamp(self.output_min, self.output_max)
        }
    }
}
