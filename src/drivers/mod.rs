//! Relay output driver and the task watchdog.

pub mod relay;
pub mod watchdog;
