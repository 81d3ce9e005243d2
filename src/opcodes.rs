//! The opcode catalogue: the single source of truth shared by the
//! assembler, disassembler and simulator.
//!
//! Every other component derives what it needs from [`CATALOGUE`]: the
//! assembler looks up `(mnemonic, mode) -> opcode` via [`opcode_for`], the
//! disassembler and simulator look up `opcode -> (mnemonic, mode)` by
//! indexing the table directly.

#![allow(clippy::upper_case_acronyms)]

/// Addressing modes a catalogue entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// Implied: no operand bytes.
    Imp,
    /// Accumulator: no operand bytes, operates on A.
    Acc,
    /// `#byte` immediate.
    Imm,
    ZPage,
    ZPageX,
    ZPageY,
    Abs,
    AbsX,
    AbsY,
    IndX,
    IndY,
    /// `($hhll)`, used only by `JMP`.
    Ind,
    /// Signed 8-bit PC-relative displacement.
    Branch,
    /// Absolute 16-bit target, used by `JMP`/`JSR`.
    Jump,
}

impl AddrMode {
    /// Number of operand bytes following the opcode byte.
    pub const fn operand_len(self) -> usize {
        match self {
            AddrMode::Imp | AddrMode::Acc => 0,
            AddrMode::Imm
            | AddrMode::ZPage
            | AddrMode::ZPageX
            | AddrMode::ZPageY
            | AddrMode::Branch
            | AddrMode::IndX
            | AddrMode::IndY => 1,
            AddrMode::Abs | AddrMode::AbsX | AddrMode::AbsY | AddrMode::Ind | AddrMode::Jump => 2,
        }
    }

    /// Total instruction length in bytes, opcode included.
    pub const fn instruction_len(self) -> usize {
        1 + self.operand_len()
    }
}

/// All mnemonics this variant of the 6502 understands, including the two
/// host-call/rotate extras (`PHX`/`PHY`/`PLX`/`PLY`) carried over from the
/// reference implementation and the `.SYS` host escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy,
    Dec, Dex, Dey,
    Eor,
    Inc, Inx, Iny,
    Jmp, Jsr,
    Lda, Ldx, Ldy, Lsr,
    Nop,
    Ora,
    Pha, Php, Phx, Phy, Pla, Plp, Plx, Ply,
    Rol, Ror, Rti, Rts,
    Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Sys,
    Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl Mnemonic {
    /// Upper-case mnemonic text as it appears in assembly source.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Phx => "PHX",
            Mnemonic::Phy => "PHY",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Plx => "PLX",
            Mnemonic::Ply => "PLY",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Sys => "SYS",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
        }
    }

    /// Looks up a mnemonic from its upper-cased source text. The lexer is
    /// responsible for upper-casing identifiers before calling this.
    pub fn from_str(s: &str) -> Option<Mnemonic> {
        Some(match s {
            "ADC" => Mnemonic::Adc,
            "AND" => Mnemonic::And,
            "ASL" => Mnemonic::Asl,
            "BCC" => Mnemonic::Bcc,
            "BCS" => Mnemonic::Bcs,
            "BEQ" => Mnemonic::Beq,
            "BIT" => Mnemonic::Bit,
            "BMI" => Mnemonic::Bmi,
            "BNE" => Mnemonic::Bne,
            "BPL" => Mnemonic::Bpl,
            "BRK" => Mnemonic::Brk,
            "BVC" => Mnemonic::Bvc,
            "BVS" => Mnemonic::Bvs,
            "CLC" => Mnemonic::Clc,
            "CLD" => Mnemonic::Cld,
            "CLI" => Mnemonic::Cli,
            "CLV" => Mnemonic::Clv,
            "CMP" => Mnemonic::Cmp,
            "CPX" => Mnemonic::Cpx,
            "CPY" => Mnemonic::Cpy,
            "DEC" => Mnemonic::Dec,
            "DEX" => Mnemonic::Dex,
            "DEY" => Mnemonic::Dey,
            "EOR" => Mnemonic::Eor,
            "INC" => Mnemonic::Inc,
            "INX" => Mnemonic::Inx,
            "INY" => Mnemonic::Iny,
            "JMP" => Mnemonic::Jmp,
            "JSR" => Mnemonic::Jsr,
            "LDA" => Mnemonic::Lda,
            "LDX" => Mnemonic::Ldx,
            "LDY" => Mnemonic::Ldy,
            "LSR" => Mnemonic::Lsr,
            "NOP" => Mnemonic::Nop,
            "ORA" => Mnemonic::Ora,
            "PHA" => Mnemonic::Pha,
            "PHP" => Mnemonic::Php,
            "PHX" => Mnemonic::Phx,
            "PHY" => Mnemonic::Phy,
            "PLA" => Mnemonic::Pla,
            "PLP" => Mnemonic::Plp,
            "PLX" => Mnemonic::Plx,
            "PLY" => Mnemonic::Ply,
            "ROL" => Mnemonic::Rol,
            "ROR" => Mnemonic::Ror,
            "RTI" => Mnemonic::Rti,
            "RTS" => Mnemonic::Rts,
            "SBC" => Mnemonic::Sbc,
            "SEC" => Mnemonic::Sec,
            "SED" => Mnemonic::Sed,
            "SEI" => Mnemonic::Sei,
            "STA" => Mnemonic::Sta,
            "STX" => Mnemonic::Stx,
            "STY" => Mnemonic::Sty,
            "SYS" => Mnemonic::Sys,
            "TAX" => Mnemonic::Tax,
            "TAY" => Mnemonic::Tay,
            "TSX" => Mnemonic::Tsx,
            "TXA" => Mnemonic::Txa,
            "TXS" => Mnemonic::Txs,
            "TYA" => Mnemonic::Tya,
            _ => return None,
        })
    }

    /// `true` for the eight conditional branch mnemonics.
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Mnemonic::Bcc
                | Mnemonic::Bcs
                | Mnemonic::Beq
                | Mnemonic::Bmi
                | Mnemonic::Bne
                | Mnemonic::Bpl
                | Mnemonic::Bvc
                | Mnemonic::Bvs
        )
    }
}

/// A single entry of the opcode catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
}

const fn known(mnemonic: Mnemonic, mode: AddrMode) -> Option<OpcodeEntry> {
    Some(OpcodeEntry { mnemonic, mode })
}

/// Looks up the catalogue entry for a single opcode byte. Bytes with no
/// defined mnemonic (illegal/undocumented opcodes) return `None`; the
/// disassembler renders those as `.BYTE` pseudo-ops and the simulator
/// treats them as a fatal error.
pub const fn entry_for_opcode(op: u8) -> Option<OpcodeEntry> {
    use AddrMode::*;
    use Mnemonic::*;
    match op {
        0x00 => known(Brk, Imp),
        0x01 => known(Ora, IndX),
        0x05 => known(Ora, ZPage),
        0x06 => known(Asl, ZPage),
        0x08 => known(Php, Imp),
        0x09 => known(Ora, Imm),
        0x0A => known(Asl, Acc),
        0x0D => known(Ora, Abs),
        0x0E => known(Asl, Abs),
        0x10 => known(Bpl, Branch),
        0x11 => known(Ora, IndY),
        0x15 => known(Ora, ZPageX),
        0x16 => known(Asl, ZPageX),
        0x18 => known(Clc, Imp),
        0x19 => known(Ora, AbsY),
        0x1D => known(Ora, AbsX),
        0x1E => known(Asl, AbsX),
        0x20 => known(Jsr, Jump),
        0x21 => known(And, IndX),
        0x24 => known(Bit, ZPage),
        0x25 => known(And, ZPage),
        0x26 => known(Rol, ZPage),
        0x28 => known(Plp, Imp),
        0x29 => known(And, Imm),
        0x2A => known(Rol, Acc),
        0x2C => known(Bit, Abs),
        0x2D => known(And, Abs),
        0x2E => known(Rol, Abs),
        0x30 => known(Bmi, Branch),
        0x31 => known(And, IndY),
        0x35 => known(And, ZPageX),
        0x36 => known(Rol, ZPageX),
        0x38 => known(Sec, Imp),
        0x39 => known(And, AbsY),
        0x3D => known(And, AbsX),
        0x3E => known(Rol, AbsX),
        0x40 => known(Rti, Imp),
        0x41 => known(Eor, IndX),
        0x45 => known(Eor, ZPage),
        0x46 => known(Lsr, ZPage),
        0x48 => known(Pha, Imp),
        0x49 => known(Eor, Imm),
        0x4A => known(Lsr, Acc),
        0x4C => known(Jmp, Jump),
        0x4D => known(Eor, Abs),
        0x4E => known(Lsr, Abs),
        0x50 => known(Bvc, Branch),
        0x51 => known(Eor, IndY),
        0x55 => known(Eor, ZPageX),
        0x56 => known(Lsr, ZPageX),
        0x58 => known(Cli, Imp),
        0x59 => known(Eor, AbsY),
        0x5A => known(Phy, Imp),
        0x5D => known(Eor, AbsX),
        0x5E => known(Lsr, AbsX),
        0x60 => known(Rts, Imp),
        0x61 => known(Adc, IndX),
        0x65 => known(Adc, ZPage),
        0x66 => known(Ror, ZPage),
        0x68 => known(Pla, Imp),
        0x69 => known(Adc, Imm),
        0x6A => known(Ror, Acc),
        0x6C => known(Jmp, Ind),
        0x6D => known(Adc, Abs),
        0x6E => known(Ror, Abs),
        0x70 => known(Bvs, Branch),
        0x71 => known(Adc, IndY),
        0x75 => known(Adc, ZPageX),
        0x76 => known(Ror, ZPageX),
        0x78 => known(Sei, Imp),
        0x79 => known(Adc, AbsY),
        0x7A => known(Ply, Imp),
        0x7D => known(Adc, AbsX),
        0x7E => known(Ror, AbsX),
        0x81 => known(Sta, IndX),
        0x84 => known(Sty, ZPage),
        0x85 => known(Sta, ZPage),
        0x86 => known(Stx, ZPage),
        0x88 => known(Dey, Imp),
        0x8A => known(Txa, Imp),
        0x8C => known(Sty, Abs),
        0x8D => known(Sta, Abs),
        0x8E => known(Stx, Abs),
        0x90 => known(Bcc, Branch),
        0x91 => known(Sta, IndY),
        0x94 => known(Sty, ZPageX),
        0x95 => known(Sta, ZPageX),
        0x96 => known(Stx, ZPageY),
        0x98 => known(Tya, Imp),
        0x99 => known(Sta, AbsY),
        0x9A => known(Txs, Imp),
        0x9D => known(Sta, AbsX),
        0xA0 => known(Ldy, Imm),
        0xA1 => known(Lda, IndX),
        0xA2 => known(Ldx, Imm),
        0xA4 => known(Ldy, ZPage),
        0xA5 => known(Lda, ZPage),
        0xA6 => known(Ldx, ZPage),
        0xA8 => known(Tay, Imp),
        0xA9 => known(Lda, Imm),
        0xAA => known(Tax, Imp),
        0xAC => known(Ldy, Abs),
        0xAD => known(Lda, Abs),
        0xAE => known(Ldx, Abs),
        0xB0 => known(Bcs, Branch),
        0xB1 => known(Lda, IndY),
        0xB4 => known(Ldy, ZPageX),
        0xB5 => known(Lda, ZPageX),
        0xB6 => known(Ldx, ZPageY),
        0xB8 => known(Clv, Imp),
        0xB9 => known(Lda, AbsY),
        0xBA => known(Tsx, Imp),
        0xBC => known(Ldy, AbsX),
        0xBD => known(Lda, AbsX),
        0xBE => known(Ldx, AbsY),
        0xC0 => known(Cpy, Imm),
        0xC1 => known(Cmp, IndX),
        0xC4 => known(Cpy, ZPage),
        0xC5 => known(Cmp, ZPage),
        0xC6 => known(Dec, ZPage),
        0xC8 => known(Iny, Imp),
        0xC9 => known(Cmp, Imm),
        0xCA => known(Dex, Imp),
        0xCC => known(Cpy, Abs),
        0xCD => known(Cmp, Abs),
        0xCE => known(Dec, Abs),
        0xD0 => known(Bne, Branch),
        0xD1 => known(Cmp, IndY),
        0xD5 => known(Cmp, ZPageX),
        0xD6 => known(Dec, ZPageX),
        0xD8 => known(Cld, Imp),
        0xD9 => known(Cmp, AbsY),
        0xDA => known(Phx, Imp),
        0xDD => known(Cmp, AbsX),
        0xDE => known(Dec, AbsX),
        0xE0 => known(Cpx, Imm),
        0xE1 => known(Sbc, IndX),
        0xE4 => known(Cpx, ZPage),
        0xE5 => known(Sbc, ZPage),
        0xE6 => known(Inc, ZPage),
        0xE8 => known(Inx, Imp),
        0xE9 => known(Sbc, Imm),
        0xEA => known(Nop, Imp),
        0xEC => known(Cpx, Abs),
        0xED => known(Sbc, Abs),
        0xEE => known(Inc, Abs),
        0xF0 => known(Beq, Branch),
        0xF1 => known(Sbc, IndY),
        0xF5 => known(Sbc, ZPageX),
        0xF6 => known(Inc, ZPageX),
        0xF8 => known(Sed, Imp),
        0xF9 => known(Sbc, AbsY),
        0xFA => known(Plx, Imp),
        0xFD => known(Sbc, AbsX),
        0xFE => known(Inc, AbsX),
        0xFF => known(Sys, Imm),
        _ => None,
    }
}

const fn build_catalogue() -> [Option<OpcodeEntry>; 256] {
    let mut table = [None; 256];
    let mut op: usize = 0;
    while op < 256 {
        table[op] = entry_for_opcode(op as u8);
        op += 1;
    }
    table
}

/// The canonical opcode -> (mnemonic, mode) table, indexed by opcode byte.
/// This is the single source of truth: the disassembler and simulator index
/// it directly, and [`opcode_for`] derives the assembler's mnemonic/mode ->
/// opcode direction from it.
pub const CATALOGUE: [Option<OpcodeEntry>; 256] = build_catalogue();

/// Derives the opcode byte for a `(mnemonic, mode)` pair by scanning the
/// canonical table, so the assembler direction never drifts out of sync
/// with [`CATALOGUE`].
pub fn opcode_for(mnemonic: Mnemonic, mode: AddrMode) -> Option<u8> {
    CATALOGUE.iter().enumerate().find_map(|(op, entry)| {
        entry.and_then(|e| {
            if e.mnemonic == mnemonic && e.mode == mode {
                Some(op as u8)
            } else {
                None
            }
        })
    })
}

/// Returns every addressing mode a mnemonic supports, in the order the
/// mode-down-shift rule (`ZPageX` -> `AbsX`, `ZPageY` -> `AbsY`) should
/// prefer them when the exact mode has no opcode of its own.
pub fn modes_for(mnemonic: Mnemonic) -> Vec<AddrMode> {
    CATALOGUE
        .iter()
        .filter_map(|entry| entry.as_ref())
        .filter(|e| e.mnemonic == mnemonic)
        .map(|e| e.mode)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalogue_round_trips_every_known_opcode() {
        for op in 0..=255u8 {
            if let Some(entry) = CATALOGUE[op as usize] {
                let resolved = opcode_for(entry.mnemonic, entry.mode);
                assert_eq!(resolved, Some(op), "opcode {:#04X} did not round-trip", op);
            }
        }
    }

    #[test]
    fn asl_accumulator_is_not_confused_with_ldy_immediate() {
        assert_eq!(
            CATALOGUE[0x0A],
            Some(OpcodeEntry {
                mnemonic: Mnemonic::Asl,
                mode: AddrMode::Acc,
            })
        );
        assert_eq!(
            CATALOGUE[0xA0],
            Some(OpcodeEntry {
                mnemonic: Mnemonic::Ldy,
                mode: AddrMode::Imm,
            })
        );
    }

    #[test]
    fn jmp_indirect_is_present() {
        assert_eq!(
            CATALOGUE[0x6C],
            Some(OpcodeEntry {
                mnemonic: Mnemonic::Jmp,
                mode: AddrMode::Ind,
            })
        );
    }

    #[test]
    fn sys_uses_opcode_0xff() {
        assert_eq!(opcode_for(Mnemonic::Sys, AddrMode::Imm), Some(0xFF));
    }
}
