//! Application core — pure domain logic, zero I/O.
//!
//! Command parsing, mode orchestration and the per-cycle loop body of the
//! chamber controller.  All interaction with hardware and the operator
//! console happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
