//! Serial console adapter — operator command lines in, status lines out.
//!
//! ```text
//!  UART bytes ──▶ LineAssembler ──▶ ConsoleLine ──▶ AppService
//!  AppService ──▶ write_line ──▶ "...\n" ──▶ UART
//! ```
//!
//! Lines end at CR, LF or CRLF.  Blank lines are skipped.  A line longer
//! than [`CONSOLE_LINE_CAP`] is dropped whole, up to its terminator, so a
//! flood of garbage can never be mistaken for a command.

use heapless::Vec;
use log::warn;

use crate::app::ports::{CONSOLE_LINE_CAP, ConsoleLine, ConsolePort};

// ───────────────────────────────────────────────────────────────
// Byte link
// ───────────────────────────────────────────────────────────────

/// Byte-oriented serial channel under the console.
pub trait SerialLink {
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes.  Returns 0 if nothing is waiting;
    /// never blocks.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write some of `data`, returning how much was accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;
}

#[cfg(target_os = "espidf")]
impl SerialLink for esp_idf_hal::uart::UartDriver<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        esp_idf_hal::uart::UartDriver::read(self, buf, esp_idf_hal::delay::NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        esp_idf_hal::uart::UartDriver::write(self, data)
    }
}

// ───────────────────────────────────────────────────────────────
// Line assembler
// ───────────────────────────────────────────────────────────────

/// Streaming line assembler.
pub struct LineAssembler {
    buf: Vec<u8, CONSOLE_LINE_CAP>,
    /// Current line overflowed; drop bytes until the next terminator.
    discarding: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte.  Returns a line when `byte` terminates a non-empty one.
    pub fn push(&mut self, byte: u8) -> Option<ConsoleLine> {
        if byte == b'\r' || byte == b'\n' {
            return self.finish();
        }
        if self.discarding {
            return None;
        }
        if self.buf.push(byte).is_err() {
            warn!("console: line exceeds {} bytes, dropping", CONSOLE_LINE_CAP);
            self.discarding = true;
            self.buf.clear();
        }
        None
    }

    fn finish(&mut self) -> Option<ConsoleLine> {
        if self.discarding {
            self.discarding = false;
            return None;
        }
        if self.buf.is_empty() {
            return None;
        }
        let line = match core::str::from_utf8(&self.buf) {
            Ok(text) => ConsoleLine::try_from(text).ok(),
            Err(_) => {
                warn!("console: dropping non-UTF-8 line");
                None
            }
        };
        self.buf.clear();
        line
    }

    /// Bytes held for the line in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

// ───────────────────────────────────────────────────────────────
// Console adapter
// ───────────────────────────────────────────────────────────────

/// [`ConsolePort`] over any [`SerialLink`].
pub struct SerialConsole<L> {
    link: L,
    assembler: LineAssembler,
}

impl<L: SerialLink> SerialConsole<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            assembler: LineAssembler::new(),
        }
    }

    fn write_all(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            match self.link.write(data) {
                Ok(0) => {
                    warn!("console: link accepted no bytes, dropping output");
                    return;
                }
                Ok(n) => data = &data[n..],
                Err(e) => {
                    warn!("console: write failed: {:?}", e);
                    return;
                }
            }
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}

impl<L: SerialLink> ConsolePort for SerialConsole<L> {
    fn poll_line(&mut self) -> Option<ConsoleLine> {
        let mut byte = [0u8; 1];
        loop {
            match self.link.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(line) = self.assembler.push(byte[0]) {
                        return Some(line);
                    }
                }
                Err(e) => {
                    warn!("console: read failed: {:?}", e);
                    return None;
                }
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        self.write_all(line.as_bytes());
        self.write_all(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn feed(asm: &mut LineAssembler, bytes: &[u8]) -> std::vec::Vec<String> {
        bytes
            .iter()
            .filter_map(|&b| asm.push(b))
            .map(|l| l.as_str().to_string())
            .collect()
    }

    #[test]
    fn any_terminator_ends_a_line() {
        let mut asm = LineAssembler::new();
        let lines = feed(&mut asm, b"FANSON\rCOOLMODE\nSETTEMP 18 5\r\n");
        assert_eq!(lines, vec!["FANSON", "COOLMODE", "SETTEMP 18 5"]);
    }

    #[test]
    fn partial_line_waits_for_terminator() {
        let mut asm = LineAssembler::new();
        assert!(feed(&mut asm, b"WARM").is_empty());
        assert_eq!(asm.pending(), 4);
        assert_eq!(feed(&mut asm, b"MODE\n"), vec!["WARMMODE"]);
    }

    #[test]
    fn overlong_line_is_dropped_whole() {
        let mut asm = LineAssembler::new();
        let mut input = vec![b'X'; CONSOLE_LINE_CAP + 10];
        input.extend_from_slice(b"\nPOWERON\n");
        assert_eq!(feed(&mut asm, &input), vec!["POWERON"]);
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed(&mut asm, b"\xff\xfe\nFANSOFF\n"), vec!["FANSOFF"]);
    }

    /// In-memory link: `rx` is what the operator typed.
    #[derive(Default)]
    struct Loopback {
        rx: VecDeque<u8>,
        tx: std::vec::Vec<u8>,
        chunk: usize,
    }

    impl SerialLink for Loopback {
        type Error = ();

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }

        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            let n = data.len().min(self.chunk.max(1));
            self.tx.extend_from_slice(&data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn poll_returns_one_line_at_a_time() {
        let link = Loopback {
            rx: b"FANSON\nFANSOFF\n".iter().copied().collect(),
            ..Loopback::default()
        };
        let mut console = SerialConsole::new(link);
        assert_eq!(console.poll_line().unwrap().as_str(), "FANSON");
        assert_eq!(console.poll_line().unwrap().as_str(), "FANSOFF");
        assert!(console.poll_line().is_none());
    }

    #[test]
    fn write_line_survives_short_writes() {
        let link = Loopback {
            chunk: 3,
            ..Loopback::default()
        };
        let mut console = SerialConsole::new(link);
        console.write_line("STANDBY\t0");
        assert_eq!(console.link().tx, b"STANDBY\t0\n");
    }
}
