//! Inbound operator commands.
//!
//! One command per line, whitespace-separated, case-sensitive:
//!
//! ```text
//! FANSON | FANSOFF | POWERON | POWEROFF
//! COOLMODE | WARMMODE | STDBYMODE
//! SETTEMP <int> <frac>     setpoint = int + frac / 10
//! SETKP | SETKI | SETKD <int> <frac>
//! ```
//!
//! Numeric arguments are read like C `strtol`: an optional sign and the
//! leading digits; anything else reads as 0.  Parsing never fails on a
//! bad number, only on a missing one.

use heapless::Vec;
use log::warn;

use crate::error::CommandError;

/// A line with more tokens than this is rejected outright.
pub const MAX_TOKENS: usize = 8;

/// Operator-adjustable control parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Setpoint,
    Kp,
    Ki,
    Kd,
}

impl Parameter {
    pub fn name(self) -> &'static str {
        match self {
            Self::Setpoint => "setpoint",
            Self::Kp => "kp",
            Self::Ki => "ki",
            Self::Kd => "kd",
        }
    }
}

/// Commands the console can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    FansOn,
    FansOff,
    CoolMode,
    WarmMode,
    StandbyMode,
    PowerOn,
    PowerOff,
    /// Overwrite one control parameter.  Never range-checked.
    Set { parameter: Parameter, value: f32 },
}

/// Split `line` on ASCII whitespace.
pub fn tokenize(line: &str) -> Result<Vec<&str, MAX_TOKENS>, CommandError> {
    let mut tokens = Vec::new();
    for tok in line.split_ascii_whitespace() {
        tokens.push(tok).map_err(|_| CommandError::TooManyTokens)?;
    }
    Ok(tokens)
}

/// Parse one console line.  Tokens past the last expected argument are
/// ignored.
pub fn parse_line(line: &str) -> Result<AppCommand, CommandError> {
    let tokens = tokenize(line)?;
    parse(&tokens)
}

/// Parse an already tokenized line.
pub fn parse(tokens: &[&str]) -> Result<AppCommand, CommandError> {
    let (&name, args) = tokens.split_first().ok_or(CommandError::Empty)?;

    let cmd = match name {
        "FANSON" => AppCommand::FansOn,
        "FANSOFF" => AppCommand::FansOff,
        "COOLMODE" => AppCommand::CoolMode,
        "WARMMODE" => AppCommand::WarmMode,
        "STDBYMODE" => AppCommand::StandbyMode,
        "POWERON" => AppCommand::PowerOn,
        "POWEROFF" => AppCommand::PowerOff,
        "SETTEMP" => set(Parameter::Setpoint, args)?,
        "SETKP" => set(Parameter::Kp, args)?,
        "SETKI" => set(Parameter::Ki, args)?,
        "SETKD" => set(Parameter::Kd, args)?,
        _ => return Err(CommandError::Unknown),
    };
    Ok(cmd)
}

fn set(parameter: Parameter, args: &[&str]) -> Result<AppCommand, CommandError> {
    let [int_tok, frac_tok, ..] = args else {
        return Err(CommandError::MissingArgument { expected: 2 });
    };

    let int = lenient_int(int_tok);
    let frac = lenient_int(frac_tok);
    if int.coerced || frac.coerced {
        warn!(
            "{}: non-numeric argument coerced ({:?} {:?} -> {} {})",
            parameter.name(),
            int_tok,
            frac_tok,
            int.value,
            frac.value
        );
    }

    Ok(AppCommand::Set {
        parameter,
        value: compose(int.value, frac.value),
    })
}

/// `int + frac / 10` with real division.
pub fn compose(int: i32, frac: i32) -> f32 {
    int as f32 + frac as f32 / 10.0
}

/// Result of reading one numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenientInt {
    pub value: i32,
    /// True if any part of the token was not consumed.
    pub coerced: bool,
}

/// `strtol`-style read: optional sign, then leading decimal digits.
/// Out-of-range values saturate.
pub fn lenient_int(token: &str) -> LenientInt {
    let bytes = token.as_bytes();
    let (negative, rest) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return LenientInt {
            value: 0,
            coerced: !token.is_empty(),
        };
    }

    let magnitude = rest[..digits].iter().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    let signed = if negative { -magnitude } else { magnitude };

    LenientInt {
        value: signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        coerced: digits != rest.len(),
    }
}
