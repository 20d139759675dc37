use std::error::Error;
use std::fmt;

/// An opcode with no entry in either instruction table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub opcode: u8,
    /// True when `opcode` followed the 0xCB prefix.
    pub prefixed: bool,
    /// Where the instruction starts (the prefix byte when prefixed).
    pub address: u16,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.prefixed { "CB " } else { "" };
        write!(
            f,
            "Undefined opcode {}{:02X} at {:#06X}",
            prefix, self.opcode, self.address
        )
    }
}

impl Error for DecodeError {}
