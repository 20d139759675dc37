use std::fmt;

use crate::cpu::Cpu;
use crate::mmu::Memory;

use super::*;

// The generated code "sees" Target, Reg8, etc. because they are in scope.
include!(concat!(env!("OUT_DIR"), "/opcodes_generated.rs"));

/// A fetched instruction: its table entry, the operand bytes that followed it
/// (little-endian, zero when absent) and the address it was fetched from.
#[derive(Debug, Copy, Clone)]
pub struct Instruction {
    pub info: OpcodeInfo,
    pub operand: u16,
    pub address: u16,
}

impl Instruction {
    pub fn imm8(&self) -> u8 {
        self.operand as u8
    }

    pub fn imm16(&self) -> u16 {
        self.operand
    }

    /// The 8-bit operand read as a signed displacement.
    pub fn rel8(&self) -> i8 {
        self.operand as u8 as i8
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}: {}", self.address, self.info)?;
        match self.info.operand_len() {
            1 => write!(f, " ({:02X})", self.imm8()),
            2 => write!(f, " ({:04X})", self.imm16()),
            _ => Ok(()),
        }
    }
}
