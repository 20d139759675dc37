/// Represents an arithmetic operation and its result.
/// The purpose is to keep the underlying operations pure, the CPU decides
/// which of the proposed flags land in F.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

/// Result of the 16-bit additions, which never touch Z or N.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AluOutput16 {
    pub value: u16,
    pub h: bool,
    pub c: bool,
}

impl AluOutput {
    fn logic(value: u8, h: bool) -> Self {
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h,
            c: false,
        }
    }

    fn shifted(value: u8, c: bool) -> Self {
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h: false,
            c,
        }
    }

    /// A bare value for operations the flag spec leaves untouched (RES, SET).
    pub fn unflagged(value: u8) -> Self {
        AluOutput {
            value,
            z: false,
            n: false,
            h: false,
            c: false,
        }
    }

    pub fn add(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res = (a as u16) + (b as u16) + (c_in as u16);
        let res_u8 = res as u8;

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: false,
            // Carry out of bit 3
            h: (a & 0x0F) + (b & 0x0F) + c_in > 0x0F,
            c: res > 0xFF,
        }
    }

    pub fn sub(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res_u8 = a.wrapping_sub(b).wrapping_sub(c_in);

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: true,
            // Borrow from bit 4
            h: (a & 0x0F) < (b & 0x0F) + c_in,
            c: (a as u16) < (b as u16) + (c_in as u16),
        }
    }

    pub fn and(a: u8, b: u8) -> Self {
        Self::logic(a & b, true)
    }

    pub fn or(a: u8, b: u8) -> Self {
        Self::logic(a | b, false)
    }

    pub fn xor(a: u8, b: u8) -> Self {
        Self::logic(a ^ b, false)
    }

    /// C is reported clear, INC leaves it to the flag spec.
    pub fn inc(value: u8) -> Self {
        let res = value.wrapping_add(1);
        AluOutput {
            value: res,
            z: res == 0,
            n: false,
            h: (value & 0x0F) == 0x0F,
            c: false,
        }
    }

    pub fn dec(value: u8) -> Self {
        let res = value.wrapping_sub(1);
        AluOutput {
            value: res,
            z: res == 0,
            n: true,
            h: (value & 0x0F) == 0,
            c: false,
        }
    }

    pub fn rlc(value: u8) -> Self {
        Self::shifted(value.rotate_left(1), value & 0x80 != 0)
    }

    pub fn rrc(value: u8) -> Self {
        Self::shifted(value.rotate_right(1), value & 0x01 != 0)
    }

    /// Rotate left through carry.
    pub fn rl(value: u8, carry: bool) -> Self {
        Self::shifted((value << 1) | carry as u8, value & 0x80 != 0)
    }

    /// Rotate right through carry.
    pub fn rr(value: u8, carry: bool) -> Self {
        Self::shifted((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    }

    pub fn sla(value: u8) -> Self {
        Self::shifted(value << 1, value & 0x80 != 0)
    }

    /// Arithmetic shift, bit 7 is kept.
    pub fn sra(value: u8) -> Self {
        Self::shifted((value >> 1) | (value & 0x80), value & 0x01 != 0)
    }

    pub fn srl(value: u8) -> Self {
        Self::shifted(value >> 1, value & 0x01 != 0)
    }

    pub fn swap(value: u8) -> Self {
        Self::shifted(value.rotate_left(4), false)
    }

    /// Adjusts A to packed BCD after an addition (n clear) or subtraction (n set).
    pub fn daa(a: u8, n: bool, h: bool, c: bool) -> Self {
        let mut adjust = 0u8;
        let mut carry = c;

        let value = if n {
            if c {
                adjust |= 0x60;
            }
            if h {
                adjust |= 0x06;
            }
            a.wrapping_sub(adjust)
        } else {
            if c || a > 0x99 {
                adjust |= 0x60;
                carry = true;
            }
            if h || (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            a.wrapping_add(adjust)
        };

        AluOutput {
            value,
            z: value == 0,
            n,
            h: false,
            c: carry,
        }
    }

    /// BIT b: Z is set when the bit is clear.
    pub fn bit(value: u8, bit: u8) -> Self {
        AluOutput {
            value,
            z: value & (1 << bit) == 0,
            n: false,
            h: true,
            c: false,
        }
    }
}

impl AluOutput16 {
    /// ADD HL, rr: carries out of bit 11 and bit 15.
    pub fn add(a: u16, b: u16) -> Self {
        let (value, c) = a.overflowing_add(b);
        AluOutput16 {
            value,
            h: (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF,
            c,
        }
    }

    /// SP + e8. The flags come from the unsigned add of the low byte.
    pub fn add_signed(sp: u16, offset: i8) -> Self {
        let low = sp as u8;
        let e = offset as u8;
        AluOutput16 {
            value: sp.wrapping_add_signed(offset as i16),
            h: (low & 0x0F) + (e & 0x0F) > 0x0F,
            c: (low as u16) + (e as u16) > 0xFF,
        }
    }
}
