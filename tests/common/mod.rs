#![allow(dead_code, unused_imports)]

pub mod ring_logger;

pub use ring_logger::{captured_lines, clear_log, dump_log, init_logger};

use gameboy_core::cpu::Cpu;
use gameboy_core::mmu::Bus;

/// Where test programs are placed, the post-boot entry point.
pub const PROGRAM_START: u16 = 0x0100;

pub fn bootstrap() -> (Cpu, Bus) {
    // RUST_LOG=trace cargo test <name> -- --nocapture
    let bus = Bus::new();
    let cpu = Cpu::new();
    (cpu, bus)
}

/// A fresh CPU and bus with `program` at the entry point.
pub fn with_program(program: &[u8]) -> (Cpu, Bus) {
    let (cpu, mut bus) = bootstrap();
    bus.force_write_bytes(PROGRAM_START, program);
    (cpu, bus)
}
