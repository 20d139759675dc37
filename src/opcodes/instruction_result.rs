use super::*;

/// Outcome of a single handler: elapsed cycles plus the flag values it proposes.
/// Proposals only land in F where the opcode's `FlagSpec` says `Calculate`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InstructionResult {
    pub cycles: u8,
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl InstructionResult {
    /// Use this for instructions with fixed timing (LD, NOP, ALU, etc.)
    /// It automatically pulls the first cycle value from the opcode metadata.
    pub fn from_instr(instr: &OpcodeInfo) -> Self {
        Self::simple(instr.cycles[0])
    }

    /// Use this for arithmetic where flags are calculated.
    pub fn with_flags(instr: &OpcodeInfo, z: bool, n: bool, h: bool, c: bool) -> Self {
        Self {
            cycles: instr.cycles[0],
            z,
            n,
            h,
            c,
        }
    }

    /// Use this for conditional branches (JR, JP, CALL, RET).
    /// Unconditional forms only list one cycle count, which is always the taken one.
    pub fn branching(instr: &OpcodeInfo, condition_met: bool) -> Self {
        let cycles = if condition_met {
            instr.cycles[0]
        } else {
            instr.cycles.get(1).copied().unwrap_or(instr.cycles[0])
        };
        Self::simple(cycles)
    }

    /// For instructions that do not change flags.
    pub fn simple(cycles: u8) -> Self {
        Self {
            cycles,
            z: false,
            h: false,
            c: false,
            n: false,
        }
    }
}
