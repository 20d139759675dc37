use std::fmt;

use crate::cpu::AluOutput;

use super::*;

/// Static description of one opcode, generated from `data/opcodes.json`.
#[derive(Debug, Copy, Clone)]
pub struct OpcodeInfo {
    // Type is generated in build.rs
    pub mnemonic: Mnemonic,
    /// Encoded length, opcode (and 0xCB prefix) included.
    pub bytes: u8,
    /// `[taken, not_taken]` for conditional branches, otherwise a single entry.
    pub cycles: &'static [u8],
    pub operands: &'static [(Target, bool)], // (Target, is_immediate)
    pub prefixed: bool,
    pub flags: FlagSpec,
}

impl OpcodeInfo {
    /// Number of operand bytes that follow the opcode.
    pub fn operand_len(&self) -> u8 {
        let opcode_len = if self.prefixed { 2 } else { 1 };
        self.bytes.saturating_sub(opcode_len)
    }

    pub fn result(&self) -> InstructionResult {
        InstructionResult::from_instr(self)
    }

    /// For instructions that need to pass calculated flag proposals.
    pub fn result_with_flags(&self, z: bool, n: bool, h: bool, c: bool) -> InstructionResult {
        InstructionResult::with_flags(self, z, n, h, c)
    }

    pub fn result_with_alu(&self, alu: AluOutput) -> InstructionResult {
        InstructionResult::with_flags(self, alu.z, alu.n, alu.h, alu.c)
    }

    pub fn first_operand(&self) -> Target {
        self.operands[0].0
    }

    pub fn last_operand(&self) -> Target {
        self.operands[self.operands.len() - 1].0
    }

    /// The condition of a conditional branch, if any.
    pub fn condition(&self) -> Option<Condition> {
        match self.operands.first() {
            Some((Target::Condition(cond), _)) => Some(*cond),
            _ => None,
        }
    }
}

impl fmt::Display for OpcodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5}", format!("{:?}", self.mnemonic))?;

        let operand_strings: Vec<String> = self
            .operands
            .iter()
            .map(|(target, _is_immediate)| target.as_string())
            .collect();

        if !operand_strings.is_empty() {
            write!(f, " {: <14}", operand_strings.join(", "))?;
        }
        write!(f, " {}", self.flags)
    }
}
