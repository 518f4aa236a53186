//! Actuator bank — the five relay outputs and their reported status.
//!
//! The bank is the only writer of [`ActuatorState`].  Every
//! [`ActuatorBank::set`] records the new status immediately and queues the
//! line write; the application service drains the queue into the
//! [`ActuatorPort`](crate::app::ports::ActuatorPort) in the same order the
//! writes were requested, so mode-transition sequences reach the hardware
//! exactly as sequenced.
//!
//! Nothing couples the outputs: heater and compressor may both be on if an
//! operator asks for it.

use heapless::Deque;
use log::{debug, warn};

/// Capacity of the pending-write queue.  One mode transition issues five
/// writes and one regulator step at most one, so this never fills between
/// drains.
const PENDING_CAP: usize = 16;

/// One relay output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    MasterPower,
    Compressor,
    ColdBypass,
    Heater,
    Fans,
}

impl Actuator {
    /// Every actuator, in status-line order.
    pub const ALL: [Actuator; 5] = [
        Self::MasterPower,
        Self::Compressor,
        Self::ColdBypass,
        Self::Heater,
        Self::Fans,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MasterPower => "master",
            Self::Compressor => "compressor",
            Self::ColdBypass => "cold_bypass",
            Self::Heater => "heater",
            Self::Fans => "fans",
        }
    }
}

/// Recorded on/off status of every actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub master_power: bool,
    pub compressor: bool,
    pub cold_bypass: bool,
    pub heater: bool,
    pub fans: bool,
}

impl ActuatorState {
    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::MasterPower => self.master_power,
            Actuator::Compressor => self.compressor,
            Actuator::ColdBypass => self.cold_bypass,
            Actuator::Heater => self.heater,
            Actuator::Fans => self.fans,
        }
    }

    fn slot(&mut self, actuator: Actuator) -> &mut bool {
        match actuator {
            Actuator::MasterPower => &mut self.master_power,
            Actuator::Compressor => &mut self.compressor,
            Actuator::ColdBypass => &mut self.cold_bypass,
            Actuator::Heater => &mut self.heater,
            Actuator::Fans => &mut self.fans,
        }
    }
}

/// A single requested line write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrite {
    pub actuator: Actuator,
    pub on: bool,
}

/// Owns the actuator status and the queue of line writes not yet applied.
pub struct ActuatorBank {
    state: ActuatorState,
    pending: Deque<LineWrite, PENDING_CAP>,
    /// Set if the queue overflowed; the next drain rewrites every line.
    resync: bool,
}

impl Default for ActuatorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorBank {
    /// All actuators off, nothing pending.
    pub fn new() -> Self {
        Self {
            state: ActuatorState::default(),
            pending: Deque::new(),
            resync: false,
        }
    }

    /// Drive `actuator` to `on`.  Idempotent: repeating a write re-drives
    /// the line with the same level.
    pub fn set(&mut self, actuator: Actuator, on: bool) {
        *self.state.slot(actuator) = on;
        debug!("actuator {} -> {}", actuator.name(), on);
        if self.pending.push_back(LineWrite { actuator, on }).is_err() {
            warn!("actuator write queue full, forcing full resync");
            self.resync = true;
        }
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.state.get(actuator)
    }

    /// Snapshot of the recorded status.
    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Queue a write of every line at its recorded level (boot, recovery).
    pub fn rewrite_all(&mut self) {
        self.pending.clear();
        self.resync = true;
    }

    /// Hand every pending write, oldest first, to `write`.
    pub fn drain_writes(&mut self, mut write: impl FnMut(LineWrite)) {
        if self.resync {
            self.pending.clear();
            self.resync = false;
            for actuator in Actuator::ALL {
                write(LineWrite {
                    actuator,
                    on: self.state.get(actuator),
                });
            }
            return;
        }
        while let Some(w) = self.pending.pop_front() {
            write(w);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.resync || !self.pending.is_empty()
    }
}
