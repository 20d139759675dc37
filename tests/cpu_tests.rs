mod common;

use common::{bootstrap, with_program};
use gameboy_core::constants::*;
use gameboy_core::cpu::{Cpu, DecodeError};
use gameboy_core::interrupt::InterruptKind;
use gameboy_core::mmu::{Bus, Memory};
use gameboy_core::opcodes::{Reg16, Reg8};

const NOP: u8 = 0x00;
const HALT: u8 = 0x76;
const STOP: u8 = 0x10;
const EI: u8 = 0xFB;
const DI: u8 = 0xF3;
const RETI: u8 = 0xD9;
const RET: u8 = 0xC9;
const CALL: u8 = 0xCD;
const PREFIX: u8 = 0xCB;

fn step(cpu: &mut Cpu, bus: &mut Bus) -> u32 {
    cpu.step(bus).unwrap()
}

fn flags(cpu: &Cpu) -> (bool, bool, bool, bool) {
    (
        cpu.get_flag(FLAG_Z),
        cpu.get_flag(FLAG_N),
        cpu.get_flag(FLAG_H),
        cpu.get_flag(FLAG_C),
    )
}

#[test]
fn test_nop_advances_pc() {
    let (mut cpu, mut bus) = with_program(&[NOP]);
    let before = cpu.clone();

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.pc, 0x0101);
    assert_eq!(cpu.f, before.f);
    assert_eq!(cpu.a, before.a);
}

#[test]
fn test_inc_r_wraps_on_every_register() {
    // INC B, C, D, E, H, L, A
    let cases = [
        (0x04, Reg8::B),
        (0x0C, Reg8::C),
        (0x14, Reg8::D),
        (0x1C, Reg8::E),
        (0x24, Reg8::H),
        (0x2C, Reg8::L),
        (0x3C, Reg8::A),
    ];

    for (opcode, reg) in cases {
        for carry in [false, true] {
            let (mut cpu, mut bus) = with_program(&[opcode]);
            cpu.set_reg8(reg, 0xFF);
            cpu.f = if carry { FLAG_C | FLAG_N } else { FLAG_N };

            assert_eq!(step(&mut cpu, &mut bus), 4);
            assert_eq!(cpu.get_reg8(reg), 0x00, "{:?}", reg);
            assert_eq!(flags(&cpu), (true, false, true, carry), "{:?}", reg);
        }
    }
}

#[test]
fn test_dec_hl_indirect() {
    // DEC [HL]
    let (mut cpu, mut bus) = with_program(&[0x35]);
    cpu.set_reg16(Reg16::HL, 0xC000);
    bus.write_byte(0xC000, 0x10);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.read_byte(0xC000), 0x0F);
    let (z, n, h, _) = flags(&cpu);
    assert!(!z && n && h);
}

#[test]
fn test_add_a_a_overflow() {
    // ADD A, A
    let (mut cpu, mut bus) = with_program(&[0x87]);
    cpu.a = 0x80;
    cpu.f = 0;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x00);
    // H stays clear: both low nibbles are zero, so nothing carries out of
    // bit 3. Hardware agrees, even though this case is often listed with H set.
    assert_eq!(flags(&cpu), (true, false, false, true));
}

#[test]
fn test_adc_uses_carry_in() {
    // ADC A, n8
    let (mut cpu, mut bus) = with_program(&[0xCE, 0x0E]);
    cpu.a = 0x01;
    cpu.f = FLAG_C;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.a, 0x10);
    assert_eq!(flags(&cpu), (false, false, true, false));
}

#[test]
fn test_sub_a_a_is_always_zero() {
    for a in [0x00, 0x01, 0x0F, 0x80, 0xFF] {
        // SUB A, A
        let (mut cpu, mut bus) = with_program(&[0x97]);
        cpu.a = a;
        cpu.f = FLAG_C | FLAG_H;

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0);
        assert_eq!(flags(&cpu), (true, true, false, false), "A = {:#04X}", a);
    }
}

#[test]
fn test_cp_leaves_a() {
    // CP A, n8
    let (mut cpu, mut bus) = with_program(&[0xFE, 0x20]);
    cpu.a = 0x10;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x10);
    assert_eq!(flags(&cpu), (false, true, false, true));
}

#[test]
fn test_logic_ops() {
    // AND A, B ; OR A, C ; XOR A, A
    let (mut cpu, mut bus) = with_program(&[0xA0, 0xB1, 0xAF]);
    cpu.a = 0xF0;
    cpu.b = 0x3C;
    cpu.c = 0x01;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x30);
    assert_eq!(flags(&cpu), (false, false, true, false));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x31);
    assert_eq!(flags(&cpu), (false, false, false, false));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x00);
    assert_eq!(flags(&cpu), (true, false, false, false));
}

#[test]
fn test_daa_after_bcd_add() {
    // LD A, 0x15 ; ADD A, 0x27 ; DAA
    let (mut cpu, mut bus) = with_program(&[0x3E, 0x15, 0xC6, 0x27, 0x27]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.a, 0x42);
    assert!(!cpu.get_flag(FLAG_H));
    assert!(!cpu.get_flag(FLAG_C));
}

#[test]
fn test_daa_after_bcd_sub() {
    // LD A, 0x42 ; SUB A, 0x15 ; DAA
    let (mut cpu, mut bus) = with_program(&[0x3E, 0x42, 0xD6, 0x15, 0x27]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert_eq!(cpu.a, 0x27);
    assert!(cpu.get_flag(FLAG_N));
}

#[test]
fn test_cpl_scf_ccf() {
    // CPL ; SCF ; CCF
    let (mut cpu, mut bus) = with_program(&[0x2F, 0x37, 0x3F]);
    cpu.a = 0x5A;
    cpu.f = FLAG_Z;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0xA5);
    assert_eq!(flags(&cpu), (true, true, true, false));

    step(&mut cpu, &mut bus);
    assert_eq!(flags(&cpu), (true, false, false, true));

    step(&mut cpu, &mut bus);
    assert_eq!(flags(&cpu), (true, false, false, false));
}

#[test]
fn test_rotate_a_clears_zero() {
    // RLCA with A = 0 still reports Z clear.
    let (mut cpu, mut bus) = with_program(&[0x07, 0x17]);
    cpu.a = 0x00;
    cpu.f = FLAG_Z;
    step(&mut cpu, &mut bus);
    assert_eq!(flags(&cpu), (false, false, false, false));

    // RLA pulls the carry in.
    cpu.a = 0x80;
    cpu.f = FLAG_C;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x01);
    assert_eq!(flags(&cpu), (false, false, false, true));
}

#[test]
fn test_ld_immediates_and_registers() {
    // LD BC, 0x1234 ; LD D, B ; LD [HL], 0x99 ; LD E, [HL]
    let (mut cpu, mut bus) = with_program(&[0x01, 0x34, 0x12, 0x50, 0x36, 0x99, 0x5E]);
    cpu.set_reg16(Reg16::HL, 0xC100);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.get_reg16(Reg16::BC), 0x1234);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.d, 0x12);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.read_byte(0xC100), 0x99);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.e, 0x99);
    assert_eq!(cpu.pc, 0x0107);
}

#[test]
fn test_ld_hl_increment_and_decrement() {
    // LD [HL+], A ; LD [HL-], A ; LD A, [HL+]
    let (mut cpu, mut bus) = with_program(&[0x22, 0x32, 0x2A]);
    cpu.set_reg16(Reg16::HL, 0xC000);
    cpu.a = 0x42;

    step(&mut cpu, &mut bus);
    assert_eq!(bus.read_byte(0xC000), 0x42);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0xC001);

    cpu.a = 0x43;
    step(&mut cpu, &mut bus);
    assert_eq!(bus.read_byte(0xC001), 0x43);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0xC000);

    cpu.a = 0;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0xC001);
}

#[test]
fn test_ldh_uses_high_page() {
    // LDH [0x80], A ; LDH A, [C]
    let (mut cpu, mut bus) = with_program(&[0xE0, 0x80, 0xF2]);
    cpu.a = 0x77;
    cpu.c = 0x80;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.read_byte(0xFF80), 0x77);

    cpu.a = 0;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.a, 0x77);
}

#[test]
fn test_ld_a16_sp() {
    // LD [0xC000], SP
    let (mut cpu, mut bus) = with_program(&[0x08, 0x00, 0xC0]);
    cpu.sp = 0xBEEF;

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(bus.read_byte(0xC000), 0xEF);
    assert_eq!(bus.read_byte(0xC001), 0xBE);
}

#[test]
fn test_inc_dec_16_leave_flags() {
    // INC BC ; DEC DE
    let (mut cpu, mut bus) = with_program(&[0x03, 0x1B]);
    cpu.set_reg16(Reg16::BC, 0xFFFF);
    cpu.set_reg16(Reg16::DE, 0x0000);
    let f = cpu.f;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.get_reg16(Reg16::BC), 0x0000);
    assert_eq!(cpu.get_reg16(Reg16::DE), 0xFFFF);
    assert_eq!(cpu.f, f);
}

#[test]
fn test_add_hl_keeps_zero_flag() {
    // ADD HL, BC
    let (mut cpu, mut bus) = with_program(&[0x09]);
    cpu.set_reg16(Reg16::HL, 0x0FFF);
    cpu.set_reg16(Reg16::BC, 0x0001);
    cpu.f = FLAG_Z | FLAG_N;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0x1000);
    assert_eq!(flags(&cpu), (true, false, true, false));
}

#[test]
fn test_add_sp_e8_and_ld_hl_sp_e8() {
    // ADD SP, -1 ; LD HL, SP+2
    let (mut cpu, mut bus) = with_program(&[0xE8, 0xFF, 0xF8, 0x02]);
    cpu.sp = 0x0001;
    cpu.f = FLAG_Z | FLAG_N;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.sp, 0x0000);
    // Low byte 0x01 + 0xFF carries out of both bit 3 and bit 7.
    assert_eq!(flags(&cpu), (false, false, true, true));

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0x0002);
    assert_eq!(cpu.sp, 0x0000);
    assert_eq!(flags(&cpu), (false, false, false, false));
}

#[test]
fn test_push_pop_round_trip() {
    // PUSH BC ; POP DE ; PUSH HL ; POP HL
    let (mut cpu, mut bus) = with_program(&[0xC5, 0xD1, 0xE5, 0xE1]);
    cpu.set_reg16(Reg16::BC, 0x1234);
    cpu.set_reg16(Reg16::HL, 0xABCD);
    let sp = cpu.sp;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.sp, sp - 2);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.get_reg16(Reg16::DE), 0x1234);
    assert_eq!(cpu.sp, sp);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.get_reg16(Reg16::HL), 0xABCD);
    assert_eq!(cpu.sp, sp);
}

#[test]
fn test_pop_af_masks_low_nibble() {
    // POP AF
    let (mut cpu, mut bus) = with_program(&[0xF1]);
    cpu.sp = 0xC000;
    bus.write_u16(0xC000, 0x12FF);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x12);
    assert_eq!(cpu.f, 0xF0);
    assert_eq!(cpu.sp, 0xC002);
}

#[test]
fn test_jp_and_jr() {
    // JP 0x0150 ; at 0x0150: JR -2 back onto itself
    let (mut cpu, mut bus) = with_program(&[0xC3, 0x50, 0x01]);
    bus.force_write_bytes(0x0150, &[0x18, 0xFE]);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.pc, 0x0150);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.pc, 0x0150);
}

#[test]
fn test_jp_hl() {
    let (mut cpu, mut bus) = with_program(&[0xE9]);
    cpu.set_reg16(Reg16::HL, 0xC000);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.pc, 0xC000);
}

#[test]
fn test_conditional_branch_cycles() {
    // (opcode bytes, taken cycles, not-taken cycles, target when taken)
    let cases: [(&[u8], u32, u32, u16); 4] = [
        (&[0x20, 0x10], 12, 8, 0x0112),       // JR NZ, +16
        (&[0xC2, 0x00, 0x02], 16, 12, 0x0200), // JP NZ, 0x0200
        (&[0xC4, 0x00, 0x02], 24, 12, 0x0200), // CALL NZ, 0x0200
        (&[0xC0], 20, 8, 0x1234),             // RET NZ
    ];

    for (program, taken_cycles, skipped_cycles, target) in cases {
        let (mut cpu, mut bus) = with_program(program);
        cpu.sp = 0xC000;
        bus.write_u16(0xC000, 0x1234);
        cpu.f = 0;
        assert_eq!(step(&mut cpu, &mut bus), taken_cycles, "{:02X?}", program);
        assert_eq!(cpu.pc, target, "{:02X?}", program);

        let (mut cpu, mut bus) = with_program(program);
        cpu.f = FLAG_Z;
        assert_eq!(step(&mut cpu, &mut bus), skipped_cycles, "{:02X?}", program);
        assert_eq!(cpu.pc, 0x0100 + program.len() as u16, "{:02X?}", program);
    }
}

#[test]
fn test_call_ret_round_trip() {
    let (mut cpu, mut bus) = with_program(&[CALL, 0x00, 0x02, NOP]);
    bus.force_write_byte(0x0200, RET);
    let sp = cpu.sp;

    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.pc, 0x0200);
    assert_eq!(bus.read_u16(cpu.sp), 0x0103);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.pc, 0x0103);
    assert_eq!(cpu.sp, sp);
}

#[test]
fn test_rst_pushes_return_address() {
    // RST 0x38
    let (mut cpu, mut bus) = with_program(&[0xFF]);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.pc, 0x0038);
    assert_eq!(bus.read_u16(cpu.sp), 0x0101);
}

#[test]
fn test_cb_operations_on_registers() {
    let (mut cpu, mut bus) = with_program(&[
        PREFIX, 0x7C, // BIT 7, H
        PREFIX, 0x37, // SWAP A
        PREFIX, 0x38, // SRL B
        PREFIX, 0x11, // RL C
        PREFIX, 0x2A, // SRA D
    ]);
    cpu.h = 0x80;
    cpu.a = 0xF1;
    cpu.b = 0x01;
    cpu.c = 0x80;
    cpu.d = 0x81;
    cpu.f = FLAG_C;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(flags(&cpu), (false, false, true, true));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0x1F);
    assert_eq!(flags(&cpu), (false, false, false, false));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.b, 0x00);
    assert_eq!(flags(&cpu), (true, false, false, true));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.c, 0x01, "carry rotates into bit 0");
    assert!(cpu.get_flag(FLAG_C));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.d, 0xC0);
    assert_eq!(cpu.pc, 0x010A);
}

#[test]
fn test_cb_operations_on_hl_indirect() {
    let (mut cpu, mut bus) = with_program(&[
        PREFIX, 0x86, // RES 0, [HL]
        PREFIX, 0xFE, // SET 7, [HL]
        PREFIX, 0x46, // BIT 0, [HL]
        PREFIX, 0x06, // RLC [HL]
    ]);
    cpu.set_reg16(Reg16::HL, 0xC000);
    bus.write_byte(0xC000, 0x01);
    cpu.f = 0;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.read_byte(0xC000), 0x00);
    assert_eq!(cpu.f, 0, "RES leaves flags alone");

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.read_byte(0xC000), 0x80);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert!(cpu.get_flag(FLAG_Z));

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.read_byte(0xC000), 0x01);
    assert_eq!(flags(&cpu), (false, false, false, true));
}

#[test]
fn test_undefined_opcodes_leave_state_untouched() {
    for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let (mut cpu, mut bus) = with_program(&[opcode]);
        let before = cpu.clone();

        let err = cpu.step(&mut bus).unwrap_err();
        assert_eq!(
            err,
            DecodeError {
                opcode,
                prefixed: false,
                address: 0x0100
            }
        );
        assert_eq!(cpu, before);
    }
}

#[test]
fn test_decode_error_display() {
    let (mut cpu, mut bus) = with_program(&[0xDD]);
    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(err.to_string(), "Undefined opcode DD at 0x0100");
}

#[test]
fn test_halt_idles_until_interrupt_even_with_ime_off() {
    let (mut cpu, mut bus) = with_program(&[HALT, NOP]);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(cpu.halted);
    assert_eq!(cpu.pc, 0x0101);

    for _ in 0..3 {
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.pc, 0x0101);
    }

    // Requested but not enabled: still halted.
    bus.interrupts.request(InterruptKind::Timer);
    step(&mut cpu, &mut bus);
    assert!(cpu.halted);

    bus.write_byte(IE_ADDR, InterruptKind::Timer.mask());
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(!cpu.halted);
    assert_eq!(cpu.pc, 0x0102, "resumes after HALT without a dispatch");
    assert_eq!(bus.read_if() & InterruptKind::Timer.mask(), InterruptKind::Timer.mask());
}

#[test]
fn test_stop_skips_padding_and_halts() {
    let (mut cpu, mut bus) = with_program(&[STOP, 0x00, NOP]);
    step(&mut cpu, &mut bus);
    assert!(cpu.halted);
    assert_eq!(cpu.pc, 0x0102);
}

#[test]
fn test_ei_delay_timing() {
    let (mut cpu, mut bus) = with_program(&[EI, NOP, NOP]);

    step(&mut cpu, &mut bus);
    assert!(!bus.interrupts.master_enabled, "EI must not take effect immediately");

    step(&mut cpu, &mut bus);
    assert!(bus.interrupts.master_enabled, "IME is on after the following instruction");
}

#[test]
fn test_di_cancels_pending_ei() {
    let (mut cpu, mut bus) = with_program(&[EI, DI, NOP]);
    for _ in 0..3 {
        step(&mut cpu, &mut bus);
    }
    assert!(!bus.interrupts.master_enabled);
    assert_eq!(bus.interrupts.ime_pending, None);
}

#[test]
fn test_reti_enables_immediately() {
    let (mut cpu, mut bus) = with_program(&[RETI]);
    cpu.sp = 0xC000;
    bus.write_u16(0xC000, 0x0200);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.pc, 0x0200);
    assert!(bus.interrupts.master_enabled);
}

#[test]
fn test_service_interrupt_pushes_pc() {
    let (mut cpu, mut bus) = bootstrap();
    bus.interrupts.master_enabled = true;
    bus.write_byte(IE_ADDR, 0x1F);
    bus.write_byte(IF_ADDR, InterruptKind::Timer.mask() | InterruptKind::VBlank.mask());

    let kind = cpu.pending_interrupt(&bus).unwrap();
    assert_eq!(kind, InterruptKind::VBlank);

    let cycles = cpu.service_interrupt(kind, &mut bus);
    assert_eq!(cycles, 20);
    assert_eq!(cpu.pc, 0x0040);
    assert_eq!(bus.read_u16(cpu.sp), 0x0100);
    assert!(!bus.interrupts.master_enabled);
    assert_eq!(bus.read_if(), InterruptKind::Timer.mask());
}
