//! Interactive trace/debugger prompt driving [`crate::sim::Cpu`].
//!
//! The simulator's run loop calls back into a [`Debugger`] whenever
//! tracing is active or a breakpoint is hit; the debugger owns the
//! breakpoint set and the prompt's command loop, and hands back a
//! [`TraceOutcome`] telling the run loop what to do next.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use crate::constants::BASE_PC;
use crate::disasm::disassemble_one;
use crate::sim::{Cpu, TraceOutcome};

/// Owns the breakpoint set and renders the `Step:` prompt.
pub struct Debugger<'a, R, W> {
    pub breakpoints: HashSet<u16>,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Debugger<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Debugger<'a, R, W> {
        Debugger {
            breakpoints: HashSet::new(),
            input,
            output,
        }
    }

    /// Called by the run loop at a trace checkpoint: prints the
    /// about-to-execute instruction and CPU state, then drives the
    /// `Step:` prompt until a command decides what happens next.
    pub fn checkpoint(&mut self, cpu: &mut Cpu) -> TraceOutcome {
        let (line, _) = disassemble_one(&cpu.mem, cpu.pc as usize);
        let _ = writeln!(self.output, "{}", line);
        let _ = writeln!(self.output, "{}", trace_cpu_line(cpu));

        // `list`'s pointer restarts from the current PC each time the
        // prompt is (re-)entered, per §4.4.
        let mut list_off = cpu.pc as usize;
        loop {
            let _ = write!(self.output, "Step:");
            let _ = self.output.flush();
            let mut raw = String::new();
            if self.input.read_line(&mut raw).unwrap_or(0) == 0 {
                return TraceOutcome::Quit;
            }
            let cmd = raw.trim().to_lowercase();

            if cmd.is_empty() {
                return TraceOutcome::Step;
            }
            if cmd == "bl" {
                for addr in &self.breakpoints {
                    let _ = writeln!(self.output, "{:#06x}", addr);
                }
                continue;
            }
            if let Some(rest) = cmd.strip_prefix('d') {
                match u16::from_str_radix(rest.trim(), 16) {
                    Ok(addr) if self.breakpoints.remove(&addr) => {}
                    Ok(addr) => {
                        let _ = writeln!(self.output, "No breakpoint set at {:#06x}", addr);
                    }
                    Err(_) => {
                        let _ = writeln!(self.output, "Invalid breakpoint");
                    }
                }
                continue;
            }
            if let Some(rest) = cmd.strip_prefix('b') {
                match u16::from_str_radix(rest.trim(), 16) {
                    Ok(addr) => {
                        self.breakpoints.insert(addr);
                    }
                    Err(_) => {
                        let _ = writeln!(self.output, "Invalid breakpoint");
                    }
                }
                continue;
            }
            if cmd == "q" || cmd == "quit" {
                return TraceOutcome::Quit;
            }
            if cmd == "l" || cmd == "list" {
                for _ in 0..5 {
                    if list_off >= cpu.mem.len() {
                        break;
                    }
                    let (line, len) = disassemble_one(&cpu.mem, list_off);
                    let _ = writeln!(self.output, "{}", line);
                    list_off += len;
                }
                continue;
            }
            if cmd == "r" || cmd == "restart" {
                let _ = writeln!(self.output, "Restarting...");
                // The source resets PC to 0, which almost certainly
                // jumps outside loaded code; fixed to BASE_PC here
                // (permitted by §9 item 8).
                cpu.pc = BASE_PC;
                return TraceOutcome::Step;
            }
            if cmd == "c" || cmd == "continue" {
                return TraceOutcome::Continue;
            }
            if cmd == "h" || cmd == "help" || cmd == "?" {
                let _ = writeln!(self.output, " b addr      : set a breakpoint at addr");
                let _ = writeln!(self.output, " bl          : list all breakpoints");
                let _ = writeln!(self.output, " c, continue : run from current instruction");
                let _ = writeln!(self.output, " d addr      : delete the breakpoint at addr");
                let _ = writeln!(self.output, " l, list     : list next 5 instructions");
                let _ = writeln!(self.output, " q, quit     : exit program");
                let _ = writeln!(self.output, " r, restart  : restart program");
                let _ = writeln!(self.output, " [Enter]     : step to next instruction");
                continue;
            }
            let _ = writeln!(self.output, "Unknown command: {}", cmd);
        }
    }
}

/// Renders the `PC:AAAA A:nn X:nn Y:nn SP:aaaa Dx Cx Ix Nx Zx Ox` line
/// printed before every instruction while tracing (§6.4).
pub fn trace_cpu_line(cpu: &Cpu) -> String {
    use crate::constants::flag;
    let bit = |mask: u8| if cpu.p & mask != 0 { 1 } else { 0 };
    format!(
        "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} SP:{:04X} D{} C{} I{} N{} Z{} O{}",
        cpu.pc,
        cpu.a,
        cpu.x,
        cpu.y,
        0x100u16 + cpu.sp as u16,
        bit(flag::D),
        bit(flag::C),
        bit(flag::I),
        bit(flag::N),
        bit(flag::Z),
        bit(flag::V),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::{CapturingSink, ScriptedSource};
    use std::io::Cursor;

    #[test]
    fn empty_line_steps_once() {
        let mut cpu = Cpu::new(&[0xA9, 0x05, 0x00]);
        let mut input = Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();
        let mut dbg = Debugger::new(&mut input, &mut output);
        assert_eq!(dbg.checkpoint(&mut cpu), TraceOutcome::Step);
    }

    #[test]
    fn continue_leaves_trace_mode() {
        let mut cpu = Cpu::new(&[0xA9, 0x05, 0x00]);
        let mut input = Cursor::new(b"continue\n".to_vec());
        let mut output = Vec::new();
        let mut dbg = Debugger::new(&mut input, &mut output);
        assert_eq!(dbg.checkpoint(&mut cpu), TraceOutcome::Continue);
    }

    #[test]
    fn breakpoint_set_and_cleared() {
        let mut cpu = Cpu::new(&[0xA9, 0x05, 0x00]);
        let mut input = Cursor::new(b"b 0202\nd 0202\n\n".to_vec());
        let mut output = Vec::new();
        let mut dbg = Debugger::new(&mut input, &mut output);
        dbg.checkpoint(&mut cpu);
        assert!(dbg.breakpoints.is_empty());
    }

    #[test]
    fn restart_resets_pc_to_base_pc_not_zero() {
        let mut cpu = Cpu::new(&[0xA9, 0x05, 0x00]);
        cpu.pc = 0x0205;
        let mut input = Cursor::new(b"restart\n".to_vec());
        let mut output = Vec::new();
        let mut dbg = Debugger::new(&mut input, &mut output);
        dbg.checkpoint(&mut cpu);
        assert_eq!(cpu.pc, BASE_PC);
    }

    #[test]
    fn trace_line_matches_the_documented_format() {
        let mut cpu = Cpu::new(&[0x00]);
        cpu.a = 0x05;
        cpu.p = crate::constants::flag::Z;
        let line = trace_cpu_line(&cpu);
        assert!(line.starts_with("PC:0200 A:05 X:00 Y:00 SP:01FF"));
        assert!(line.contains("Z1"));
        assert!(line.contains("C0"));
    }

    #[test]
    fn quit_stops_the_debugger() {
        let mut cpu = Cpu::new(&[0xA9, 0x05, 0x00]);
        let mut input = Cursor::new(b"quit\n".to_vec());
        let mut output = Vec::new();
        let mut dbg = Debugger::new(&mut input, &mut output);
        assert_eq!(dbg.checkpoint(&mut cpu), TraceOutcome::Quit);
    }

    #[test]
    fn unused_io_helpers_compile_against_the_sim_traits() {
        // Smoke check that the io module's test doubles are usable from
        // trace-level tests without pulling in a real terminal.
        let mut source = ScriptedSource::new(vec![b'x']);
        let mut sink = CapturingSink::default();
        use crate::io::{CharSink, CharSource};
        assert_eq!(source.read_char().unwrap(), b'x');
        sink.write_char(b'y').unwrap();
        assert_eq!(sink.captured, vec![b'y']);
    }
}
