//! Concrete mode handler functions and table builder.
//!
//! Each mode is two plain `fn` pointers: the baseline sequence run on
//! every entry, and the regulation step run once per cycle.  Standby has
//! no regulation step.
//!
//! ```text
//!             master  fans  heater  compressor  bypass
//!  COOLING      on     on    off       on         on   (open: not cooling yet)
//!  WARMING      on     on    off       off        off  + relay window, PID reset
//!  STANDBY      on     off   off       off        off
//! ```
//!
//! Writes are issued in exactly the column order above.

use super::context::ChamberContext;
use super::{ChamberMode, ModeDescriptor};
use crate::actuators::Actuator;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; ChamberMode::COUNT] {
    [
        // 0: Cooling
        ModeDescriptor {
            id: ChamberMode::Cooling,
            on_enter: cooling_enter,
            regulate: Some(cooling_regulate),
        },
        // 1: Warming
        ModeDescriptor {
            id: ChamberMode::Warming,
            on_enter: warming_enter,
            regulate: Some(warming_regulate),
        },
        // 2: Standby
        ModeDescriptor {
            id: ChamberMode::Standby,
            on_enter: standby_enter,
            regulate: None,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  COOLING — compressor running, bypass cycled by the regulator
// ═══════════════════════════════════════════════════════════════════════════

fn cooling_enter(ctx: &mut ChamberContext) {
    let bank = &mut ctx.actuators;
    bank.set(Actuator::MasterPower, true);
    bank.set(Actuator::Fans, true);
    bank.set(Actuator::Heater, false);
    bank.set(Actuator::Compressor, true);
    bank.set(Actuator::ColdBypass, true);
    ctx.regulator.reset_cooling();
    info!("COOLING: compressor on, bypass open");
}

fn cooling_regulate(ctx: &mut ChamberContext) {
    let pv = ctx.reading.process_variable;
    ctx.regulator
        .cool(ctx.now_ms, pv, &ctx.params, &mut ctx.actuators);
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARMING — heater driven by the relay window
// ═══════════════════════════════════════════════════════════════════════════

fn warming_enter(ctx: &mut ChamberContext) {
    let bank = &mut ctx.actuators;
    bank.set(Actuator::MasterPower, true);
    bank.set(Actuator::Fans, true);
    bank.set(Actuator::Heater, false);
    bank.set(Actuator::Compressor, false);
    bank.set(Actuator::ColdBypass, false);
    ctx.regulator.reset_warming(ctx.now_ms);
    info!("WARMING: relay window restarted at {} ms", ctx.now_ms);
}

fn warming_regulate(ctx: &mut ChamberContext) {
    let pv = ctx.reading.process_variable;
    ctx.regulator
        .warm(ctx.now_ms, pv, &ctx.params, &mut ctx.actuators);
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY — powered, idle
// ═══════════════════════════════════════════════════════════════════════════

fn standby_enter(ctx: &mut ChamberContext) {
    let bank = &mut ctx.actuators;
    bank.set(Actuator::MasterPower, true);
    bank.set(Actuator::Fans, false);
    bank.set(Actuator::Heater, false);
    bank.set(Actuator::Compressor, false);
    bank.set(Actuator::ColdBypass, false);
    ctx.regulator.reset_standby();
    info!("STANDBY: all loads off, master on");
}
