//! Relay coil driver (one digital output per load).
//!
//! Active-high: a set pin energises the relay.  The driver is a dumb
//! actuator: no interlocks, no feedback.  A pin error is logged and the
//! requested level is still recorded, so status reporting always shows
//! what was last commanded.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp-idf-hal` `PinDriver` in output mode.
//! On host/test: any `embedded_hal` [`OutputPin`] mock.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct RelayOutput<P> {
    pin: P,
    label: &'static str,
    energised: bool,
}

impl<P: OutputPin> RelayOutput<P> {
    /// Wrap `pin` and drive it low.
    pub fn new(pin: P, label: &'static str) -> Self {
        let mut relay = Self {
            pin,
            label,
            energised: true,
        };
        relay.set(false);
        relay
    }

    pub fn set(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("relay {}: pin write failed ({:?})", self.label, e);
        }
        self.energised = on;
    }

    pub fn is_energised(&self) -> bool {
        self.energised
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
