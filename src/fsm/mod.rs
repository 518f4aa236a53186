//! Function-pointer chamber-mode machine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  ModeTable                                       │
//! │  ┌──────────┬──────────────┬──────────────────┐  │
//! │  │ Mode     │ on_enter     │ regulate         │  │
//! │  ├──────────┼──────────────┼──────────────────┤  │
//! │  │ Cooling  │ fn(ctx)      │ Some(fn(ctx))    │  │
//! │  │ Warming  │ fn(ctx)      │ Some(fn(ctx))    │  │
//! │  │ Standby  │ fn(ctx)      │ None             │  │
//! │  └──────────┴──────────────┴──────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Modes change only on operator command.  [`ModeController::enter`] is
//! unconditional: entering the current mode again re-runs its whole
//! baseline sequence.  Each cycle [`ModeController::regulate`] runs the
//! current row's regulation step, if it has one.

pub mod context;
pub mod modes;

use context::ChamberContext;
use log::info;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Chamber operating mode.
/// Must stay in sync with the table built in [`modes::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChamberMode {
    Cooling = 0,
    Warming = 1,
    Standby = 2,
}

impl ChamberMode {
    /// Total number of modes; sizes the table array.
    pub const COUNT: usize = 3;

    /// Convert a raw index back to a mode.  `None` for anything unknown.
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Cooling),
            1 => Some(Self::Warming),
            2 => Some(Self::Standby),
            _ => None,
        }
    }

    /// Upper-case name used on the status line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cooling => "COOLING",
            Self::Warming => "WARMING",
            Self::Standby => "STANDBY",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for mode entry sequences and regulation steps.
pub type ModeActionFn = fn(&mut ChamberContext);

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
pub struct ModeDescriptor {
    pub id: ChamberMode,
    /// Actuator baseline sequence, run on every entry.
    pub on_enter: ModeActionFn,
    /// Per-cycle regulation step; `None` = nothing to regulate.
    pub regulate: Option<ModeActionFn>,
}

// ---------------------------------------------------------------------------
// Mode controller
// ---------------------------------------------------------------------------

/// Owns the mode table and the current mode.
pub struct ModeController {
    /// Fixed-size table indexed by `ChamberMode as usize`.
    table: [ModeDescriptor; ChamberMode::COUNT],
    current: usize,
    /// Number of mode entries since boot (including re-entries).
    entries: u64,
}

impl ModeController {
    /// Construct the controller in `initial` **without** running its entry
    /// sequence: at boot the mode is reported as `initial` while every
    /// output is still off.
    pub fn new(table: [ModeDescriptor; ChamberMode::COUNT], initial: ChamberMode) -> Self {
        debug_assert!(
            table
                .iter()
                .enumerate()
                .all(|(i, row)| row.id as usize == i),
            "mode table out of order"
        );
        Self {
            table,
            current: initial as usize,
            entries: 0,
        }
    }

    /// Enter `mode` and run its baseline sequence, even if already in it.
    pub fn enter(&mut self, mode: ChamberMode, ctx: &mut ChamberContext) {
        let next = mode as usize;
        info!(
            "mode: {} -> {}",
            self.table[self.current].id.name(),
            self.table[next].id.name()
        );
        self.current = next;
        self.entries += 1;
        (self.table[next].on_enter)(ctx);
    }

    pub fn enter_cooling(&mut self, ctx: &mut ChamberContext) {
        self.enter(ChamberMode::Cooling, ctx);
    }

    pub fn enter_warming(&mut self, ctx: &mut ChamberContext) {
        self.enter(ChamberMode::Warming, ctx);
    }

    pub fn enter_standby(&mut self, ctx: &mut ChamberContext) {
        self.enter(ChamberMode::Standby, ctx);
    }

    /// Run the current mode's regulation step.  Returns `false` for modes
    /// without one.
    pub fn regulate(&mut self, ctx: &mut ChamberContext) -> bool {
        match self.table[self.current].regulate {
            Some(step) => {
                step(ctx);
                true
            }
            None => false,
        }
    }

    pub fn current_mode(&self) -> ChamberMode {
        self.table[self.current].id
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }
}
