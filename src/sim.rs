//! Instruction-level simulator.
//!
//! Executes an assembled byte image directly against a flat memory
//! buffer, dispatching through [`crate::opcodes::CATALOGUE`] so the
//! simulator can never disagree with the assembler or disassembler
//! about what an opcode means. A handful of deviations from textbook
//! 6502 behavior are preserved deliberately because the reference this
//! variant was distilled from produces them; each is called out below.

use crate::constants::{flag, sys_selector, BASE_PC, MEMORY_SIZE, SP_RESET, STACK_PAGE, SYS_OPCODE};
use crate::io::{CharSink, CharSource};
use crate::opcodes::{AddrMode, Mnemonic, CATALOGUE};

/// Why a run of the simulator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ran off the end of the loaded code (`PC` reached `endpos`).
    RanOffEnd,
    /// `BRK` was executed; the caller should enter the trace prompt.
    Brk,
    /// The trace prompt (or caller) asked to quit.
    Quit,
}

/// A fatal condition that aborts the run, matching the reference
/// implementation's `!Address reference overflow: $AAAA` and unknown-
/// opcode failures (see the design note on unknown opcodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    AddressOverflow(u32),
    UnknownOpcode(u8),
}

impl Fault {
    pub fn message(self) -> String {
        match self {
            Fault::AddressOverflow(addr) => format!("!Address reference overflow: ${:04X}", addr),
            Fault::UnknownOpcode(op) => format!("!Unknown opcode: ${:02X}", op),
        }
    }
}

/// The CPU and its flat memory buffer.
pub struct Cpu {
    pub mem: Vec<u8>,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub p: u8,
    pub endpos: u16,
}

impl Cpu {
    /// Builds a machine with `code` loaded at `BASE_PC`.
    pub fn new(code: &[u8]) -> Cpu {
        let mut mem = vec![0u8; MEMORY_SIZE];
        let base = BASE_PC as usize;
        let end = (base + code.len()).min(mem.len());
        mem[base..end].copy_from_slice(&code[..end - base]);
        Cpu {
            mem,
            a: 0,
            x: 0,
            y: 0,
            sp: SP_RESET,
            pc: BASE_PC,
            p: 0,
            endpos: BASE_PC.wrapping_add(code.len() as u16),
        }
    }

    // ---- flag helpers ----

    fn set_flag(&mut self, mask: u8, on: bool) {
        if on {
            self.p |= mask;
        } else {
            self.p &= !mask;
        }
    }

    fn flag(&self, mask: u8) -> bool {
        self.p & mask != 0
    }

    fn set_flags_from_op(&mut self, r: u8) {
        self.set_flag(flag::Z, r == 0);
        self.set_flag(flag::N, r & 0x80 != 0);
    }

    // ---- memory access, range-checked per the memory model ----

    fn validate(&self, addr: u32) -> Result<(), Fault> {
        if addr as usize >= self.mem.len() {
            Err(Fault::AddressOverflow(addr))
        } else {
            Ok(())
        }
    }

    fn read8(&self, addr: u16) -> Result<u8, Fault> {
        self.validate(addr as u32)?;
        Ok(self.mem[addr as usize])
    }

    fn write8(&mut self, addr: u16, v: u8) -> Result<(), Fault> {
        self.validate(addr as u32)?;
        self.mem[addr as usize] = v;
        Ok(())
    }

    fn operand8(&self) -> u8 {
        self.mem[self.pc as usize]
    }

    fn operand16(&self) -> u16 {
        self.mem[self.pc as usize] as u16 | ((self.mem[self.pc as usize + 1] as u16) << 8)
    }

    /// Effective address for the addressing mode, per §4.3. `PC` still
    /// points at the first operand byte; the caller advances it
    /// afterward by `mode.operand_len()`.
    fn ea(&self, mode: AddrMode, index: u8) -> Result<u16, Fault> {
        match mode {
            AddrMode::ZPage => Ok(self.operand8() as u16),
            AddrMode::ZPageX | AddrMode::ZPageY => Ok(self.operand8().wrapping_add(index) as u16),
            AddrMode::Abs => Ok(self.operand16()),
            AddrMode::AbsX | AddrMode::AbsY => Ok(self.operand16().wrapping_add(index as u16)),
            AddrMode::IndX => {
                let p = self.operand8().wrapping_add(index) as u16;
                let lo = self.read8(p)?;
                let hi = self.read8(p.wrapping_add(1))?;
                Ok(lo as u16 | ((hi as u16) << 8))
            }
            AddrMode::IndY => {
                let p = self.operand8() as u16;
                let lo = self.read8(p)?;
                let hi = self.read8(p.wrapping_add(1))?;
                let base = lo as u16 | ((hi as u16) << 8);
                Ok(base.wrapping_add(index as u16))
            }
            _ => unreachable!("ea() called with a mode that has no effective address"),
        }
    }

    fn read_operand(&self, mode: AddrMode, index: u8) -> Result<u8, Fault> {
        match mode {
            AddrMode::Imm => Ok(self.operand8()),
            _ => {
                let addr = self.ea(mode, index)?;
                self.read8(addr)
            }
        }
    }

    fn write_operand(&mut self, mode: AddrMode, index: u8, v: u8) -> Result<(), Fault> {
        let addr = self.ea(mode, index)?;
        self.write8(addr, v)
    }

    // ---- stack ----
    //
    // push16/pop16 byte order is specified explicitly and deliberately
    // differs from a naive reading of the source: the high byte lands
    // at `0x100 + SP`, the low byte at `0x100 + SP - 1`. JSR/RTS depend
    // on this exact order.

    fn push8(&mut self, v: u8) -> Result<(), Fault> {
        self.write8(STACK_PAGE + self.sp as u16, v)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    fn pop8(&mut self) -> Result<u8, Fault> {
        self.sp = self.sp.wrapping_add(1);
        self.read8(STACK_PAGE + self.sp as u16)
    }

    fn push16(&mut self, v: u16) -> Result<(), Fault> {
        self.write8(STACK_PAGE + self.sp as u16, (v >> 8) as u8)?;
        self.write8(STACK_PAGE + self.sp.wrapping_sub(1) as u16, (v & 0xFF) as u8)?;
        self.sp = self.sp.wrapping_sub(2);
        Ok(())
    }

    fn pop16(&mut self) -> Result<u16, Fault> {
        self.sp = self.sp.wrapping_add(2);
        let hi = self.read8(STACK_PAGE + self.sp as u16)?;
        let lo = self.read8(STACK_PAGE + self.sp.wrapping_sub(1) as u16)?;
        Ok(lo as u16 | ((hi as u16) << 8))
    }

    // ---- arithmetic ----
    //
    // The V rule below matches the source's simplification rather than
    // the canonical 6502 overflow rule; see the design note on ADC/SBC.

    fn add(&mut self, a: u8, m: u8) -> u8 {
        let carry_in = if self.flag(flag::C) { 1 } else { 0 };
        let mut t: i32 = a as i32 + m as i32 + carry_in;
        if self.flag(flag::D) {
            if t & 0x0F > 0x09 {
                t += 0x06;
            }
            if t & 0xF0 > 0x90 {
                t += 0x60;
            }
            self.set_flag(flag::C, t > 0x99);
        } else {
            self.set_flag(flag::C, t > 0xFF);
            self.set_flag(flag::V, a < 128 && m < 128 && t >= 128);
        }
        (t & 0xFF) as u8
    }

    fn sub(&mut self, a: u8, m: u8) -> u8 {
        let borrow = if self.flag(flag::C) { 0 } else { 1 };
        let mut t: i32 = a as i32 - m as i32 - borrow;
        if self.flag(flag::D) {
            if t & 0x0F > 0x09 {
                t += 0x06;
            }
            if t & 0xF0 > 0x90 {
                t += 0x60;
            }
            self.set_flag(flag::C, t > 0x99);
        } else {
            self.set_flag(flag::C, t <= 0xFF);
            self.set_flag(flag::V, a < 128 && m < 128 && t >= 128);
        }
        (t & 0xFF) as u8
    }

    /// Runs instructions until `PC` reaches `endpos`, a breakpoint or
    /// trace condition fires, or a fatal fault occurs. `should_break`
    /// is consulted before each instruction; when it returns `true` the
    /// caller is expected to drive the trace prompt and call
    /// [`Cpu::step`] itself afterward. Returns the reason execution
    /// stopped, or a fault.
    pub fn run(
        &mut self,
        trace: bool,
        breakpoints: &std::collections::HashSet<u16>,
        mut on_trace_point: impl FnMut(&mut Cpu) -> TraceOutcome,
        source: &mut dyn CharSource,
        sink: &mut dyn CharSink,
    ) -> Result<StopReason, Fault> {
        let mut tracing = trace;
        while self.pc < self.endpos {
            if tracing || breakpoints.contains(&self.pc) {
                tracing = true;
                match on_trace_point(self) {
                    TraceOutcome::Continue => tracing = false,
                    TraceOutcome::Step => {}
                    TraceOutcome::Quit => return Ok(StopReason::Quit),
                }
            }
            let op = self.mem[self.pc as usize];
            self.pc = self.pc.wrapping_add(1);
            match self.step(op, source, sink)? {
                Some(reason) => return Ok(reason),
                None => {}
            }
        }
        Ok(StopReason::RanOffEnd)
    }

    /// Executes a single already-fetched opcode. `self.pc` must already
    /// point at the first operand byte (or the next instruction, for
    /// zero-operand opcodes), matching the run loop's fetch/advance
    /// order. Returns `Some(reason)` if the instruction should stop the
    /// caller's run loop (`BRK`).
    pub fn step(
        &mut self,
        op: u8,
        source: &mut dyn CharSource,
        sink: &mut dyn CharSink,
    ) -> Result<Option<StopReason>, Fault> {
        let entry = CATALOGUE[op as usize].ok_or(Fault::UnknownOpcode(op))?;
        let mode = entry.mode;

        use Mnemonic::*;
        match entry.mnemonic {
            Adc => self.binop(mode, |me, m| me.add(me.a, m))?,
            And => self.binop(mode, |me, m| me.a & m)?,
            Ora => self.binop(mode, |me, m| me.a | m)?,
            Eor => self.binop(mode, |me, m| me.a ^ m)?,
            Sbc => self.binop(mode, |me, m| me.sub(me.a, m))?,

            Lda => self.load_into(mode, Reg::A)?,
            Ldx => self.load_into(mode, Reg::X)?,
            Ldy => self.load_into(mode, Reg::Y)?,

            Sta => self.store_from(mode, self.a)?,
            Stx => self.store_from(mode, self.x)?,
            Sty => self.store_from(mode, self.y)?,

            Asl => self.shift(mode, true, false)?,
            Lsr => self.shift(mode, false, false)?,
            Rol => self.shift(mode, true, true)?,
            Ror => self.shift(mode, false, true)?,

            Inc => self.bump(mode, 1)?,
            Dec => self.bump(mode, -1)?,
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_flags_from_op(self.x);
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_flags_from_op(self.x);
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_flags_from_op(self.y);
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_flags_from_op(self.y);
            }

            Cmp => self.compare(mode, self.a)?,
            Cpx => self.compare(mode, self.x)?,
            Cpy => self.compare(mode, self.y)?,

            Bit => {
                let m = self.read_operand(mode, 0)?;
                let r = m & self.a;
                self.set_flag(flag::Z, r == 0);
                self.set_flag(flag::N, r & 0x80 != 0);
                self.set_flag(flag::V, r & 0x40 != 0);
                self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
            }

            Tax => {
                self.x = self.a;
                self.set_flags_from_op(self.x);
            }
            Tay => {
                self.y = self.a;
                self.set_flags_from_op(self.y);
            }
            Tsx => {
                self.x = self.sp;
                self.set_flags_from_op(self.x);
            }
            Txa => {
                self.a = self.x;
                self.set_flags_from_op(self.a);
            }
            Txs => self.sp = self.x,
            Tya => {
                self.a = self.y;
                self.set_flags_from_op(self.a);
            }

            Pha => self.push8(self.a)?,
            Php => self.push8(self.p)?,
            Phx => self.push8(self.x)?,
            Phy => self.push8(self.y)?,
            Pla => {
                self.a = self.pop8()?;
                self.set_flags_from_op(self.a);
            }
            Plp => self.p = self.pop8()?,
            Plx => {
                self.x = self.pop8()?;
                self.set_flags_from_op(self.x);
            }
            Ply => {
                self.y = self.pop8()?;
                self.set_flags_from_op(self.y);
            }

            Clc => self.set_flag(flag::C, false),
            Cld => self.set_flag(flag::D, false),
            Cli => self.set_flag(flag::I, false),
            Clv => self.set_flag(flag::V, false),
            Sec => self.set_flag(flag::C, true),
            Sed => self.set_flag(flag::D, true),
            Sei => self.set_flag(flag::I, true),

            Bcc => self.branch(!self.flag(flag::C)),
            Bcs => self.branch(self.flag(flag::C)),
            Beq => self.branch(self.flag(flag::Z)),
            Bne => self.branch(!self.flag(flag::Z)),
            Bmi => self.branch(self.flag(flag::N)),
            Bpl => self.branch(!self.flag(flag::N)),
            Bvc => self.branch(!self.flag(flag::V)),
            Bvs => self.branch(self.flag(flag::V)),

            Jmp => {
                if mode == AddrMode::Ind {
                    let p = self.operand16();
                    let lo = self.read8(p)?;
                    let hi = self.read8(p.wrapping_add(1))?;
                    self.pc = lo as u16 | ((hi as u16) << 8);
                } else {
                    self.pc = self.operand16();
                }
            }
            Jsr => {
                let target = self.operand16();
                self.push16(self.pc.wrapping_add(2))?;
                self.pc = target;
            }
            Rts => self.pc = self.pop16()?,
            Rti => {
                self.p = self.pop8()?;
                self.pc = self.pop16()?;
            }

            Nop => {}

            Brk => {
                return Ok(Some(StopReason::Brk));
            }

            Sys => {
                let selector = self.operand8();
                match selector {
                    s if s == sys_selector::READ_CHAR => {
                        self.a = source
                            .read_char()
                            .map_err(|_| Fault::AddressOverflow(self.pc as u32))?;
                    }
                    s if s == sys_selector::WRITE_CHAR => {
                        sink.write_char(self.a)
                            .map_err(|_| Fault::AddressOverflow(self.pc as u32))?;
                    }
                    _ => {}
                }
                self.pc = self.pc.wrapping_add(1);
            }
        }
        Ok(None)
    }

    fn binop(&mut self, mode: AddrMode, f: impl FnOnce(&mut Cpu, u8) -> u8) -> Result<(), Fault> {
        let index = self.index_for(mode);
        let m = self.read_operand(mode, index)?;
        let r = f(self, m);
        self.a = r;
        self.set_flags_from_op(self.a);
        self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        Ok(())
    }

    fn load_into(&mut self, mode: AddrMode, reg: Reg) -> Result<(), Fault> {
        let index = self.index_for(mode);
        let v = self.read_operand(mode, index)?;
        match reg {
            Reg::A => self.a = v,
            Reg::X => self.x = v,
            Reg::Y => self.y = v,
        }
        self.set_flags_from_op(v);
        self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        Ok(())
    }

    fn store_from(&mut self, mode: AddrMode, v: u8) -> Result<(), Fault> {
        let index = self.index_for(mode);
        self.write_operand(mode, index, v)?;
        self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        Ok(())
    }

    /// `Inc`/`Dec` step of `+1`/`-1`, applied mod 256.
    fn bump(&mut self, mode: AddrMode, step: i16) -> Result<(), Fault> {
        let index = self.index_for(mode);
        let v = self.read_operand(mode, index)?;
        let r = ((v as i16 + step) & 0xFF) as u8;
        self.write_operand(mode, index, r)?;
        self.set_flags_from_op(r);
        self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        Ok(())
    }

    fn shift(&mut self, mode: AddrMode, left: bool, rotate: bool) -> Result<(), Fault> {
        let carry_in = self.flag(flag::C);
        let v = if mode == AddrMode::Acc {
            self.a
        } else {
            let index = self.index_for(mode);
            self.read_operand(mode, index)?
        };
        let (r, carry_out) = if left {
            let carry_out = v & 0x80 != 0;
            let mut r = v << 1;
            if rotate && carry_in {
                r |= 0x01;
            }
            (r, carry_out)
        } else {
            let carry_out = v & 0x01 != 0;
            let mut r = v >> 1;
            if rotate && carry_in {
                r |= 0x80;
            }
            (r, carry_out)
        };
        self.set_flag(flag::C, carry_out);
        if mode == AddrMode::Acc {
            self.a = r;
        } else {
            let index = self.index_for(mode);
            self.write_operand(mode, index, r)?;
            self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        }
        self.set_flags_from_op(r);
        Ok(())
    }

    /// Compare rule is an intentional simplification: `N` comes from
    /// the unmodified register, not from `register - memory`.
    fn compare(&mut self, mode: AddrMode, reg: u8) -> Result<(), Fault> {
        let index = self.index_for(mode);
        let m = self.read_operand(mode, index)?;
        self.set_flag(flag::Z, reg == m);
        self.set_flag(flag::C, reg >= m);
        self.set_flag(flag::N, reg & 0x80 != 0);
        self.pc = self.pc.wrapping_add(mode.operand_len() as u16);
        Ok(())
    }

    fn branch(&mut self, taken: bool) {
        if taken {
            let d = self.operand8() as i8;
            self.pc = (self.pc as i32 + d as i32) as u16;
        } else {
            self.pc = self.pc.wrapping_add(1);
        }
    }

    fn index_for(&self, mode: AddrMode) -> u8 {
        match mode {
            AddrMode::ZPageX | AddrMode::AbsX | AddrMode::IndX => self.x,
            AddrMode::ZPageY | AddrMode::AbsY | AddrMode::IndY => self.y,
            _ => 0,
        }
    }
}

enum Reg {
    A,
    X,
    Y,
}

/// What the caller wants to happen after a trace checkpoint fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Execute one more instruction, then check again.
    Step,
    /// Leave trace mode and resume free execution.
    Continue,
    /// Stop the run loop entirely.
    Quit,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::{CapturingSink, ScriptedSource};
    use std::collections::HashSet;

    fn run_to_end(code: &[u8]) -> Cpu {
        let mut cpu = Cpu::new(code);
        let mut source = ScriptedSource::new(Vec::new());
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        cpu.run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap();
        cpu
    }

    #[test]
    fn lda_immediate_sets_accumulator_and_flags() {
        // LDA #$00; BRK -- but BRK halts into trace, so just LDA #$00 alone,
        // relying on PC reaching endpos right after.
        let cpu = run_to_end(&[0xA9, 0x00]);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag(flag::Z));
        assert!(!cpu.flag(flag::N));
    }

    #[test]
    fn lda_sta_round_trips_through_zero_page() {
        let cpu = run_to_end(&[0xA9, 0x42, 0x85, 0x10]);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.mem[0x10], 0x42);
    }

    #[test]
    fn adc_sets_carry_on_overflow() {
        let cpu = run_to_end(&[0xA9, 0xFF, 0x69, 0x02]);
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.flag(flag::C));
    }

    #[test]
    fn compare_sets_n_from_unmodified_register_bitmask() {
        // LDA #$FF; CMP #$01 -- 0xFF - 0x01 has no high bit set in the
        // canonical subtraction result, but N here reads straight off A.
        let cpu = run_to_end(&[0xA9, 0xFF, 0xC9, 0x01]);
        assert!(cpu.flag(flag::N));
        assert!(cpu.flag(flag::C));
        assert!(!cpu.flag(flag::Z));
    }

    #[test]
    fn jsr_then_rts_returns_to_the_instruction_after_jsr() {
        // JSR $0206 diverts to the subroutine at $0206 (LDA #$07; RTS),
        // which returns to $0203 -- the instruction right after the
        // 3-byte JSR -- where LDA #$11 then overwrites A before BRK.
        let code = [
            0x20, 0x06, 0x02, // JSR $0206
            0xA9, 0x11, // LDA #$11 (runs after RTS)
            0x00, // BRK
            0xA9, 0x07, // LDA #$07
            0x60, // RTS
        ];
        let mut cpu = Cpu::new(&code);
        let mut source = ScriptedSource::new(Vec::new());
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        let reason = cpu
            .run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap();
        assert_eq!(reason, StopReason::Brk);
        assert_eq!(cpu.a, 0x11);
    }

    #[test]
    fn branch_not_taken_advances_past_the_displacement_byte_only() {
        // LDA #$00 sets Z; BNE is not taken (Z is set), so PC lands on
        // the very next byte rather than skipping by the displacement.
        let cpu = run_to_end(&[0xA9, 0x00, 0xD0, 0x02, 0xA9, 0x09]);
        assert_eq!(cpu.a, 0x09);
    }

    #[test]
    fn rol_acc_rotates_carry_into_bit_zero() {
        let cpu = run_to_end(&[0x38, 0xA9, 0x01, 0x2A]);
        // SEC; LDA #$01; ROL A -> carry (1) was already set, comes out
        // bit 0 as 0x03, and bit 7 (0) becomes the new carry.
        assert_eq!(cpu.a, 0x03);
        assert!(!cpu.flag(flag::C));
    }

    #[test]
    fn sys_read_char_blocks_on_the_host_source() {
        let mut cpu = Cpu::new(&[0xFF, 0x00]);
        let mut source = ScriptedSource::new(vec![b'Q']);
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        cpu.run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap();
        assert_eq!(cpu.a, b'Q');
    }

    #[test]
    fn sys_write_char_reaches_the_host_sink() {
        let mut cpu = Cpu::new(&[0xA9, b'Z', 0xFF, 0x01]);
        let mut source = ScriptedSource::new(Vec::new());
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        cpu.run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap();
        assert_eq!(sink.captured, vec![b'Z']);
    }

    #[test]
    fn unknown_opcode_is_a_fatal_fault() {
        let mut cpu = Cpu::new(&[0x02]);
        let mut source = ScriptedSource::new(Vec::new());
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        let err = cpu
            .run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap_err();
        assert_eq!(err, Fault::UnknownOpcode(0x02));
    }

    #[test]
    fn out_of_range_effective_address_is_a_fatal_fault() {
        // STA $0FFF,X with X = 0xFF pushes the EA past MEMORY_SIZE (0x1000).
        let mut cpu = Cpu::new(&[0xA2, 0xFF, 0x9D, 0xFF, 0x0F]);
        let mut source = ScriptedSource::new(Vec::new());
        let mut sink = CapturingSink::default();
        let breaks = HashSet::new();
        let err = cpu
            .run(false, &breaks, |_| TraceOutcome::Step, &mut source, &mut sink)
            .unwrap_err();
        assert!(matches!(err, Fault::AddressOverflow(_)));
    }
}
