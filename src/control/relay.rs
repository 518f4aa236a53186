//! Time-proportioning relay window.
//!
//! The heater is a slow on/off load, so the PID output is expressed as
//! "milliseconds on per window".  The window start only ever moves forward
//! by whole windows, which keeps the relay phase locked to the moment
//! Warming was entered regardless of loop jitter.

pub struct RelayWindow {
    start_ms: u64,
    size_ms: u32,
}

impl RelayWindow {
    pub fn new(size_ms: u32) -> Self {
        Self { start_ms: 0, size_ms }
    }

    /// Start a fresh window at `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
    }

    /// Move the window start forward by exactly one window if `now_ms`
    /// is past the end of the current one.  Returns `true` if it moved.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if self.elapsed(now_ms) > u64::from(self.size_ms) {
            self.start_ms += u64::from(self.size_ms);
            true
        } else {
            false
        }
    }

    /// Milliseconds since the current window started.
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }
}
