pub mod alu;
pub mod error;
pub mod instruction_set;
pub mod snapshot;

use std::fmt;

use log::{Level, debug, log_enabled, trace};

use crate::constants::*;
use crate::interrupt::InterruptKind;
use crate::mmu::Memory;
use crate::opcodes::*;

pub use alu::{AluOutput, AluOutput16};
pub use error::DecodeError;
pub use snapshot::CpuSnapshot;

/// Register file plus the HALT state. IME lives with the interrupt controller on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    // 8-bit Registers
    pub a: u8,
    pub f: u8, // Flags Register
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    // 16-bit Special Registers
    pub pc: u16, // Program Counter
    pub sp: u16, // Stack Pointer

    pub halted: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Register values left behind by the boot ROM.
    pub fn new() -> Self {
        Self {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            pc: 0x0100, // Entry point for cartridges
            sp: 0xFFFE,
            halted: false,
        }
    }

    pub fn get_flag(&self, flag: u8) -> bool {
        (self.f & flag) != 0
    }

    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.f |= flag;
        } else {
            self.f &= !flag;
        }
    }

    /// Executes one instruction and returns the T-cycles it took.
    ///
    /// A halted CPU only checks for a wake-up: any interrupt that is both
    /// requested and enabled resumes execution, even with IME off.
    pub fn step(&mut self, bus: &mut impl Memory) -> Result<u32, DecodeError> {
        if self.halted && !bus.interrupts().pending_enabled_ignoring_master() {
            return Ok(HALTED_STEP_CYCLES);
        }

        let instr = self.fetch(&*bus)?;

        if self.halted {
            debug!("Woken from HALT at {:#06X}", self.pc);
            self.halted = false;
        }

        if log_enabled!(Level::Trace) {
            trace!("{}", CpuSnapshot::from_cpu(self, &*bus).to_doctor_string());
        }
        debug!("{}", instr);

        self.pc = self.pc.wrapping_add(instr.info.bytes as u16);
        let result = self.dispatch(instr, bus);
        self.f = instr.info.flags.resolve(self.f, &result);

        bus.interrupts_mut().tick_ime_delay();

        Ok(result.cycles as u32)
    }

    /// Decodes the instruction at PC without moving PC.
    pub fn fetch(&self, bus: &impl Memory) -> Result<Instruction, DecodeError> {
        let opcode = bus.read_byte(self.pc);
        let (prefixed, code) = if opcode == CB_PREFIX_OPCODE_BYTE {
            (true, bus.read_byte(self.pc.wrapping_add(1)))
        } else {
            (false, opcode)
        };

        let table = if prefixed { &CB_OPCODES } else { &OPCODES };
        let info = table[code as usize].ok_or(DecodeError {
            opcode: code,
            prefixed,
            address: self.pc,
        })?;

        let operand_addr = self.pc.wrapping_add(info.bytes as u16 - info.operand_len() as u16);
        let operand = match info.operand_len() {
            0 => 0,
            1 => bus.read_byte(operand_addr) as u16,
            _ => bus.read_u16(operand_addr),
        };

        Ok(Instruction {
            info,
            operand,
            address: self.pc,
        })
    }

    /// The interrupt the driver should service before the next step, if any.
    pub fn pending_interrupt(&self, bus: &impl Memory) -> Option<InterruptKind> {
        bus.interrupts().pending()
    }

    /// Pushes PC and jumps to the interrupt's vector. Returns the T-cycles spent.
    pub fn service_interrupt(&mut self, kind: InterruptKind, bus: &mut impl Memory) -> u32 {
        let vector = bus.interrupts_mut().dispatch(kind);
        self.halted = false;
        let pc = self.pc;
        self.push_u16(bus, pc);
        self.pc = vector;
        INTERRUPT_DISPATCH_CYCLES
    }

    /// Reads the value an operand refers to. `[HL+]` and `[HL-]` adjust HL.
    pub(crate) fn read_operand(
        &mut self,
        target: Target,
        instr: &Instruction,
        bus: &mut impl Memory,
    ) -> OperandValue {
        match target {
            Target::Register8(reg) => OperandValue::U8(self.get_reg8(reg)),
            Target::Register16(reg) => OperandValue::U16(self.get_reg16(reg)),
            Target::Immediate8 | Target::Relative8 => OperandValue::U8(instr.imm8()),
            Target::Immediate16 => OperandValue::U16(instr.imm16()),
            Target::AddrImmediate16 => OperandValue::U8(bus.read_byte(instr.imm16())),
            Target::AddrImmediate8 => OperandValue::U8(bus.read_byte(high_page(instr.imm8()))),
            Target::AddrRegister8(reg) => {
                OperandValue::U8(bus.read_byte(high_page(self.get_reg8(reg))))
            }
            Target::AddrRegister16(reg) => OperandValue::U8(bus.read_byte(self.get_reg16(reg))),
            Target::AddrRegister16Increment(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_add(1));
                OperandValue::U8(bus.read_byte(addr))
            }
            Target::AddrRegister16Decrement(reg) => {
                let addr = self.get_reg16(reg);
                self.set_reg16(reg, addr.wrapping_sub(1));
                OperandValue::U8(bus.read_byte(addr))
            }
            Target::Bit(b) => OperandValue::U8(b),
            Target::Vector(v) => OperandValue::U16(v as u16),
            Target::StackPointerOffset | Target::Condition(_) => {
                panic!("{:?} has no value of its own", target)
            }
        }
    }

    pub(crate) fn write_operand(
        &mut self,
        target: Target,
        instr: &Instruction,
        value: OperandValue,
        bus: &mut impl Memory,
    ) {
        match (target, value) {
            (Target::Register8(reg), OperandValue::U8(v)) => self.set_reg8(reg, v),
            (Target::Register16(reg), OperandValue::U16(v)) => self.set_reg16(reg, v),
            // LD [a16], SP
            (Target::AddrImmediate16, OperandValue::U16(v)) => bus.write_u16(instr.imm16(), v),
            (Target::AddrImmediate16, OperandValue::U8(v)) => bus.write_byte(instr.imm16(), v),
            (Target::AddrImmediate8, OperandValue::U8(v)) => {
                bus.write_byte(high_page(instr.imm8()), v)
            }
            (Target::AddrRegister8(reg), OperandValue::U8(v)) => {
                bus.write_byte(high_page(self.get_reg8(reg)), v)
            }
            (Target::AddrRegister16(reg), OperandValue::U8(v)) => {
                bus.write_byte(self.get_reg16(reg), v)
            }
            (Target::AddrRegister16Increment(reg), OperandValue::U8(v)) => {
                let addr = self.get_reg16(reg);
                bus.write_byte(addr, v);
                self.set_reg16(reg, addr.wrapping_add(1));
            }
            (Target::AddrRegister16Decrement(reg), OperandValue::U8(v)) => {
                let addr = self.get_reg16(reg);
                bus.write_byte(addr, v);
                self.set_reg16(reg, addr.wrapping_sub(1));
            }
            _ => panic!("Invalid write target {:?} for {:?}", target, value),
        }
    }

    /// Whether a branch with this condition is taken. No condition means always.
    pub fn condition_met(&self, condition: Option<Condition>) -> bool {
        match condition {
            None => true,
            Some(Condition::NotZero) => !self.get_flag(FLAG_Z),
            Some(Condition::Zero) => self.get_flag(FLAG_Z),
            Some(Condition::NotCarry) => !self.get_flag(FLAG_C),
            Some(Condition::Carry) => self.get_flag(FLAG_C),
        }
    }

    pub fn get_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::BC => u16::from_be_bytes([self.b, self.c]),
            Reg16::DE => u16::from_be_bytes([self.d, self.e]),
            Reg16::HL => u16::from_be_bytes([self.h, self.l]),
            Reg16::SP => self.sp,
            Reg16::AF => u16::from_be_bytes([self.a, self.f]),
        }
    }

    pub fn set_reg16(&mut self, reg: Reg16, val: u16) {
        let [high, low] = val.to_be_bytes();
        match reg {
            Reg16::BC => {
                self.b = high;
                self.c = low;
            }
            Reg16::DE => {
                self.d = high;
                self.e = low;
            }
            Reg16::HL => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = val,
            Reg16::AF => {
                self.a = high;
                // The lower 4 bits of the F register are always 0
                self.f = low & 0xF0;
            }
        }
    }

    pub fn get_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    pub fn set_reg8(&mut self, reg: Reg8, val: u8) {
        match reg {
            Reg8::A => self.a = val,
            Reg8::B => self.b = val,
            Reg8::C => self.c = val,
            Reg8::D => self.d = val,
            Reg8::E => self.e = val,
            Reg8::H => self.h = val,
            Reg8::L => self.l = val,
        }
    }

    /// Pushes a 16-bit value onto the stack, high byte first.
    pub fn push_u16(&mut self, bus: &mut impl Memory, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.sp = self.sp.wrapping_sub(1);
        bus.write_byte(self.sp, high);
        self.sp = self.sp.wrapping_sub(1);
        bus.write_byte(self.sp, low);
    }

    pub fn pop_u16(&mut self, bus: &mut impl Memory) -> u16 {
        let low = bus.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        let high = bus.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        u16::from_be_bytes([high, low])
    }
}

// 0xFF00 + n, used by LDH and LD [C].
fn high_page(offset: u8) -> u16 {
    0xFF00 | offset as u16
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |mask: u8, letter: char| if self.get_flag(mask) { letter } else { '-' };

        write!(
            f,
            "A:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} Flags:[{}{}{}{}]",
            self.a,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            flag(FLAG_Z, 'Z'),
            flag(FLAG_N, 'N'),
            flag(FLAG_H, 'H'),
            flag(FLAG_C, 'C'),
        )
    }
}
