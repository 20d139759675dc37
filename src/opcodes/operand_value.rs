#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandValue {
    U8(u8),
    U16(u16),
}

impl OperandValue {
    pub fn as_u8(self) -> u8 {
        match self {
            OperandValue::U8(v) => v,
            OperandValue::U16(v) => panic!("Expected U8, got U16({:#06X})", v),
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            OperandValue::U16(v) => v,
            OperandValue::U8(v) => v as u16, // Safe promotion
        }
    }
}
