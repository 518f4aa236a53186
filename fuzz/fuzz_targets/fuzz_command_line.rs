//! Fuzz target: console bytes → `LineAssembler` → `parse_line`
//!
//! Streams arbitrary bytes through the line assembler and parses every
//! completed line.  Neither stage may panic, and no assembled line may
//! exceed the console line capacity or contain a terminator.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use chamberctl::adapters::console::LineAssembler;
use chamberctl::app::commands::parse_line;
use chamberctl::app::ports::CONSOLE_LINE_CAP;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut assembler = LineAssembler::new();

    for &byte in data {
        if let Some(line) = assembler.push(byte) {
            assert!(line.len() <= CONSOLE_LINE_CAP);
            assert!(!line.is_empty(), "blank lines are skipped");
            assert!(!line.contains(['\r', '\n']));
            let _ = parse_line(&line);
        }
        assert!(assembler.pending() <= CONSOLE_LINE_CAP);
    }

    // The whole input as one line, bypassing the assembler.
    if let Ok(text) = core::str::from_utf8(data) {
        let _ = parse_line(text);
    }
});
