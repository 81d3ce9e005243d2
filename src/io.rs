//! Host I/O abstraction for the `.SYS` escape.
//!
//! The simulator only ever needs one blocking character read and one
//! character write; wrapping both behind small traits lets the trace/run
//! loop be driven by a real terminal in the CLI binary and by scripted
//! buffers in tests, without the simulator core knowing the difference.

use std::io::{self, Read, Write};

/// Supplies characters to `.SYS #0`.
pub trait CharSource {
    /// Blocks until one character is available and returns its code.
    fn read_char(&mut self) -> io::Result<u8>;
}

/// Receives characters from `.SYS #1`.
pub trait CharSink {
    fn write_char(&mut self, ch: u8) -> io::Result<()>;
}

/// Reads one byte at a time from standard input.
pub struct StdinSource;

impl CharSource for StdinSource {
    fn read_char(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        io::stdin().read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

/// Writes characters to standard output, flushing after each one so
/// interactive programs see output promptly.
pub struct StdoutSink;

impl CharSink for StdoutSink {
    fn write_char(&mut self, ch: u8) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&[ch])?;
        handle.flush()
    }
}

/// A scripted character source backed by an in-memory buffer, for tests
/// that drive `.SYS #0` without a real terminal.
pub struct ScriptedSource {
    remaining: std::collections::VecDeque<u8>,
}

impl ScriptedSource {
    pub fn new(script: impl Into<Vec<u8>>) -> ScriptedSource {
        ScriptedSource {
            remaining: script.into().into_iter().collect(),
        }
    }
}

impl CharSource for ScriptedSource {
    fn read_char(&mut self) -> io::Result<u8> {
        self.remaining
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "scripted input exhausted"))
    }
}

/// A capturing character sink, for tests that need to assert on `.SYS #1`
/// output instead of printing to a real terminal.
#[derive(Default)]
pub struct CapturingSink {
    pub captured: Vec<u8>,
}

impl CharSink for CapturingSink {
    fn write_char(&mut self, ch: u8) -> io::Result<()> {
        self.captured.push(ch);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scripted_source_yields_bytes_in_order() {
        let mut src = ScriptedSource::new(vec![b'h', b'i']);
        assert_eq!(src.read_char().unwrap(), b'h');
        assert_eq!(src.read_char().unwrap(), b'i');
        assert!(src.read_char().is_err());
    }

    #[test]
    fn capturing_sink_records_every_write() {
        let mut sink = CapturingSink::default();
        sink.write_char(b'A').unwrap();
        sink.write_char(b'B').unwrap();
        assert_eq!(sink.captured, vec![b'A', b'B']);
    }
}
