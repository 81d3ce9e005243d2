//! Disassembler: turns a byte sequence back into an annotated listing,
//! indexed purely by the opcode catalogue so it can never disagree with
//! the assembler or simulator about what an opcode means.

use crate::constants::BASE_PC;
use crate::opcodes::{AddrMode, CATALOGUE};

/// Disassembles `bytes` starting at `offset`, returning one formatted
/// line per instruction in the `AAAA: BB BB BB  MNEM operand` form.
/// Unknown opcodes render as `.BYTE 0xNN` and consume one byte.
pub fn disassemble(bytes: &[u8], offset: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pos = offset;
    while pos < bytes.len() {
        let (line, len) = disassemble_one(bytes, pos);
        lines.push(line);
        pos += len;
    }
    lines
}

/// Disassembles a single instruction at `pos`, returning the formatted
/// line and the number of bytes it consumed.
pub fn disassemble_one(bytes: &[u8], pos: usize) -> (String, usize) {
    let op = bytes[pos];
    let addr = BASE_PC.wrapping_add(pos as u16);

    match CATALOGUE[op as usize] {
        None => (output(addr, &bytes[pos..pos + 1], &format!(".BYTE {:#04X}", op)), 1),
        Some(entry) => {
            let len = entry.mode.instruction_len();
            let raw = safe_slice(bytes, pos, len);
            let operand_text = format_operand(entry.mode, bytes, pos, addr);
            let mnem = entry.mnemonic.as_str();
            let text = if operand_text.is_empty() {
                mnem.to_string()
            } else {
                format!("{} {}", mnem, operand_text)
            };
            (output(addr, raw, &text), len)
        }
    }
}

/// Takes up to `len` bytes starting at `pos`, defensively truncating at
/// the end of the buffer rather than panicking on a trailing partial
/// instruction.
fn safe_slice(bytes: &[u8], pos: usize, len: usize) -> &[u8] {
    let end = (pos + len).min(bytes.len());
    &bytes[pos..end]
}

fn num8(bytes: &[u8], pos: usize) -> u8 {
    bytes.get(pos).copied().unwrap_or(0)
}

/// Reads a little-endian 16-bit word, defensively returning 0 if either
/// byte would be out of bounds (mirrors the reference disassembler's
/// defensive `num16`).
fn num16(bytes: &[u8], pos: usize) -> u16 {
    if pos + 1 >= bytes.len() {
        0
    } else {
        bytes[pos] as u16 | ((bytes[pos + 1] as u16) << 8)
    }
}

fn format_operand(mode: AddrMode, bytes: &[u8], pos: usize, addr: u16) -> String {
    let operand_pos = pos + 1;
    match mode {
        AddrMode::Imp | AddrMode::Acc => String::new(),
        AddrMode::Imm => format!("#${:02X}", num8(bytes, operand_pos)),
        AddrMode::ZPage => format!("${:02X}", num8(bytes, operand_pos)),
        AddrMode::ZPageX => format!("${:02X},X", num8(bytes, operand_pos)),
        AddrMode::ZPageY => format!("${:02X},Y", num8(bytes, operand_pos)),
        AddrMode::Abs | AddrMode::Jump => format!("${:04X}", num16(bytes, operand_pos)),
        AddrMode::AbsX => format!("${:04X},X", num16(bytes, operand_pos)),
        AddrMode::AbsY => format!("${:04X},Y", num16(bytes, operand_pos)),
        AddrMode::Ind => format!("(${:04X})", num16(bytes, operand_pos)),
        AddrMode::IndX => format!("(${:02X},X)", num8(bytes, operand_pos)),
        AddrMode::IndY => format!("(${:02X}),Y", num8(bytes, operand_pos)),
        AddrMode::Branch => {
            let displacement = num8(bytes, operand_pos) as i8;
            let next_pc = addr.wrapping_add(2);
            let target = (next_pc as i32 + displacement as i32) as u16;
            format!("${:04X}", target)
        }
    }
}

fn output(addr: u16, raw: &[u8], text: &str) -> String {
    let mut bytes_column = String::new();
    for b in raw {
        bytes_column.push_str(&format!("{:02X} ", b));
    }
    // Pad the bytes column to a fixed width of 3 bytes (9 characters) so
    // the mnemonic column always lines up regardless of instruction length.
    while bytes_column.len() < 9 {
        bytes_column.push(' ');
    }
    format!("{:04X}: {} {}", addr, bytes_column, text)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recovers_immediate_load_and_store() {
        let lines = disassemble(&[0xA9, 0x05, 0x85, 0x10, 0x00], 0);
        assert_eq!(lines[0], "0200: A9 05     LDA #$05");
        assert_eq!(lines[1], "0202: 85 10     STA $10");
        assert_eq!(lines[2], "0204: 00        BRK");
    }

    #[test]
    fn unknown_opcode_renders_as_byte_pseudo_op() {
        let lines = disassemble(&[0x02], 0);
        assert_eq!(lines[0], "0200: 02        .BYTE 0x02");
    }

    #[test]
    fn branch_target_is_resolved_relative_to_the_post_displacement_pc() {
        // DEX; BNE loop assembles to CA D0 FD with `loop` at BASE_PC; the
        // BNE sits two bytes later, so its displacement (-3) must resolve
        // back to that same label address.
        let lines = disassemble(&[0xCA, 0xD0, 0xFD], 0);
        assert_eq!(lines[1], "0201: D0 FD     BNE $0200");
    }

    #[test]
    fn jmp_indirect_is_rendered_with_parens() {
        let lines = disassemble(&[0x6C, 0x00, 0x03], 0);
        assert_eq!(lines[0], "0200: 6C 00 03  JMP ($0300)");
    }
}
