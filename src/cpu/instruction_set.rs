// One handler per mnemonic. PC already points past the instruction when a
// handler runs, and the returned flags go through the opcode's FlagSpec.

use log::debug;

use crate::constants::*;
use crate::cpu::{AluOutput, AluOutput16, Cpu};
use crate::mmu::Memory;
use crate::opcodes::*;

impl Cpu {
    /// A op src for the 8-bit accumulator ALU group.
    fn alu_a(
        &mut self,
        instr: &Instruction,
        bus: &mut impl Memory,
        op: impl Fn(u8, u8, bool) -> AluOutput,
        store: bool,
    ) -> InstructionResult {
        let val = self
            .read_operand(instr.info.last_operand(), instr, bus)
            .as_u8();
        let res = op(self.a, val, self.get_flag(FLAG_C));
        if store {
            self.a = res.value;
        }
        instr.info.result_with_alu(res)
    }

    /// Read-modify-write on a register or [HL], for INC/DEC and the CB group.
    fn modify_operand(
        &mut self,
        instr: &Instruction,
        target: Target,
        bus: &mut impl Memory,
        op: impl Fn(u8, bool) -> AluOutput,
    ) -> InstructionResult {
        let val = self.read_operand(target, instr, bus).as_u8();
        let res = op(val, self.get_flag(FLAG_C));
        self.write_operand(target, instr, OperandValue::U8(res.value), bus);
        instr.info.result_with_alu(res)
    }

    /// RLCA, RRCA, RLA and RRA.
    fn rotate_a(&mut self, instr: &Instruction, op: impl Fn(u8, bool) -> AluOutput) -> InstructionResult {
        let res = op(self.a, self.get_flag(FLAG_C));
        self.a = res.value;
        instr.info.result_with_alu(res)
    }

    fn bit_operands(instr: &Instruction) -> (u8, Target) {
        match instr.info.first_operand() {
            Target::Bit(b) => (b, instr.info.last_operand()),
            other => panic!("{:?} expects a bit index, got {:?}", instr.info.mnemonic, other),
        }
    }
}

impl InstructionSet for Cpu {
    fn nop(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        instr.info.result()
    }

    fn ld(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        // LD HL, SP+e8
        if instr.info.operands.len() == 3 {
            let res = AluOutput16::add_signed(self.sp, instr.rel8());
            self.set_reg16(Reg16::HL, res.value);
            return instr.info.result_with_flags(false, false, res.h, res.c);
        }

        let (dest, src) = (instr.info.first_operand(), instr.info.last_operand());
        let val = self.read_operand(src, &instr, bus);
        self.write_operand(dest, &instr, val, bus);
        instr.info.result()
    }

    fn ldh(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.ld(instr, bus)
    }

    fn inc(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        match instr.info.first_operand() {
            // 16-bit Increment (Affects NO flags)
            Target::Register16(reg) => {
                self.set_reg16(reg, self.get_reg16(reg).wrapping_add(1));
                instr.info.result()
            }
            target => self.modify_operand(&instr, target, bus, |v, _| AluOutput::inc(v)),
        }
    }

    fn dec(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        match instr.info.first_operand() {
            Target::Register16(reg) => {
                self.set_reg16(reg, self.get_reg16(reg).wrapping_sub(1));
                instr.info.result()
            }
            target => self.modify_operand(&instr, target, bus, |v, _| AluOutput::dec(v)),
        }
    }

    fn add(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        match instr.info.first_operand() {
            // ADD SP, e8
            Target::Register16(Reg16::SP) => {
                let res = AluOutput16::add_signed(self.sp, instr.rel8());
                self.sp = res.value;
                instr.info.result_with_flags(false, false, res.h, res.c)
            }
            // ADD HL, rr. Z is left alone by the flag spec.
            Target::Register16(Reg16::HL) => {
                let rr = self
                    .read_operand(instr.info.last_operand(), &instr, bus)
                    .as_u16();
                let res = AluOutput16::add(self.get_reg16(Reg16::HL), rr);
                self.set_reg16(Reg16::HL, res.value);
                instr.info.result_with_flags(false, false, res.h, res.c)
            }
            _ => self.alu_a(&instr, bus, |a, b, _| AluOutput::add(a, b, false), true),
        }
    }

    fn adc(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, AluOutput::add, true)
    }

    fn sub(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, |a, b, _| AluOutput::sub(a, b, false), true)
    }

    fn sbc(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, AluOutput::sub, true)
    }

    fn and(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, |a, b, _| AluOutput::and(a, b), true)
    }

    fn xor(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, |a, b, _| AluOutput::xor(a, b), true)
    }

    fn or(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, |a, b, _| AluOutput::or(a, b), true)
    }

    // Flags as SUB, A is untouched.
    fn cp(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.alu_a(&instr, bus, |a, b, _| AluOutput::sub(a, b, false), false)
    }

    fn push(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let val = self
            .read_operand(instr.info.first_operand(), &instr, bus)
            .as_u16();
        self.push_u16(bus, val);
        instr.info.result()
    }

    fn pop(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let val = self.pop_u16(bus);
        self.write_operand(instr.info.first_operand(), &instr, OperandValue::U16(val), bus);
        // Only POP AF computes flags, and they are whatever was popped.
        instr.info.result_with_flags(
            self.get_flag(FLAG_Z),
            self.get_flag(FLAG_N),
            self.get_flag(FLAG_H),
            self.get_flag(FLAG_C),
        )
    }

    fn jp(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let taken = self.condition_met(instr.info.condition());
        if taken {
            self.pc = self
                .read_operand(instr.info.last_operand(), &instr, bus)
                .as_u16();
        }
        InstructionResult::branching(&instr.info, taken)
    }

    fn jr(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        let taken = self.condition_met(instr.info.condition());
        if taken {
            self.pc = self.pc.wrapping_add_signed(instr.rel8() as i16);
        }
        InstructionResult::branching(&instr.info, taken)
    }

    fn call(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let taken = self.condition_met(instr.info.condition());
        if taken {
            let ret = self.pc;
            self.push_u16(bus, ret);
            self.pc = instr.imm16();
        }
        InstructionResult::branching(&instr.info, taken)
    }

    fn ret(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let taken = self.condition_met(instr.info.condition());
        if taken {
            self.pc = self.pop_u16(bus);
        }
        InstructionResult::branching(&instr.info, taken)
    }

    fn reti(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.pc = self.pop_u16(bus);
        bus.interrupts_mut().enable_interrupts_immediate();
        instr.info.result()
    }

    fn rst(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let vector = self
            .read_operand(instr.info.first_operand(), &instr, bus)
            .as_u16();
        let ret = self.pc;
        self.push_u16(bus, ret);
        self.pc = vector;
        instr.info.result()
    }

    fn di(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        bus.interrupts_mut().disable_interrupts();
        instr.info.result()
    }

    fn ei(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        bus.interrupts_mut().schedule_enable();
        instr.info.result()
    }

    fn halt(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        debug!("HALT at {:#06X}", instr.address);
        self.halted = true;
        instr.info.result()
    }

    // Treated as HALT, the padding byte is already skipped.
    fn stop(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        debug!("STOP at {:#06X}", instr.address);
        self.halted = true;
        instr.info.result()
    }

    fn rlca(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        self.rotate_a(&instr, |v, _| AluOutput::rlc(v))
    }

    fn rrca(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        self.rotate_a(&instr, |v, _| AluOutput::rrc(v))
    }

    fn rla(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        self.rotate_a(&instr, AluOutput::rl)
    }

    fn rra(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        self.rotate_a(&instr, AluOutput::rr)
    }

    fn daa(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        let res = AluOutput::daa(
            self.a,
            self.get_flag(FLAG_N),
            self.get_flag(FLAG_H),
            self.get_flag(FLAG_C),
        );
        self.a = res.value;
        instr.info.result_with_alu(res)
    }

    fn cpl(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        self.a = !self.a;
        instr.info.result()
    }

    fn scf(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        instr.info.result()
    }

    fn ccf(&mut self, instr: Instruction, _bus: &mut impl Memory) -> InstructionResult {
        instr.info.result()
    }

    fn rlc(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::rlc(v))
    }

    fn rrc(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::rrc(v))
    }

    fn rl(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, AluOutput::rl)
    }

    fn rr(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, AluOutput::rr)
    }

    fn sla(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::sla(v))
    }

    fn sra(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::sra(v))
    }

    fn swap(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::swap(v))
    }

    fn srl(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        self.modify_operand(&instr, instr.info.first_operand(), bus, |v, _| AluOutput::srl(v))
    }

    fn bit(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let (bit, target) = Self::bit_operands(&instr);
        let val = self.read_operand(target, &instr, bus).as_u8();
        instr.info.result_with_alu(AluOutput::bit(val, bit))
    }

    fn res(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let (bit, target) = Self::bit_operands(&instr);
        self.modify_operand(&instr, target, bus, |v, _| AluOutput::unflagged(v & !(1 << bit)))
    }

    fn set(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {
        let (bit, target) = Self::bit_operands(&instr);
        self.modify_operand(&instr, target, bus, |v, _| AluOutput::unflagged(v | (1 << bit)))
    }
}
