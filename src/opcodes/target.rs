use std::fmt;

use super::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    Register8(Reg8),
    Register16(Reg16),
    Immediate8,
    Immediate16,
    AddrImmediate16,                // [a16]
    AddrImmediate8,                 // [a8] for LDH, 0xFF00 + a8
    AddrRegister8(Reg8),            // [C] for LDH, 0xFF00 + C
    AddrRegister16(Reg16),          // [HL], [BC], [DE]
    AddrRegister16Decrement(Reg16), // [HL-]
    AddrRegister16Increment(Reg16), // [HL+]
    StackPointerOffset,             // SP+e8
    Bit(u8),
    Condition(Condition),
    Relative8, // Signed i8 for JR and SP arithmetic
    Vector(u8), // Fixed addresses for RST
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl Target {
    pub fn as_string(&self) -> String {
        match self {
            Target::Register8(reg) => format!("{}", reg),
            Target::Register16(reg) => format!("{}", reg),
            Target::Immediate8 => "n8".to_string(),
            Target::Immediate16 => "n16".to_string(),
            Target::AddrImmediate16 => "[a16]".to_string(),
            Target::AddrImmediate8 => "[a8]".to_string(),
            Target::AddrRegister16(reg) => format!("[{}]", reg),
            Target::AddrRegister8(reg) => format!("[{}]", reg),
            Target::AddrRegister16Decrement(reg) => format!("[{}-]", reg),
            Target::AddrRegister16Increment(reg) => format!("[{}+]", reg),
            Target::StackPointerOffset => "SP+e8".to_string(),
            Target::Bit(b) => format!("{}", b),
            Target::Condition(cond) => format!("{}", cond),
            Target::Relative8 => "e8".to_string(),
            Target::Vector(v) => format!("${:02X}", v),
        }
    }
}
