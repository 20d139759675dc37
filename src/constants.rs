// Flag register bits (F). The low nibble is always zero.
pub const FLAG_Z: u8 = 0b1000_0000;
pub const FLAG_N: u8 = 0b0100_0000;
pub const FLAG_H: u8 = 0b0010_0000;
pub const FLAG_C: u8 = 0b0001_0000;

pub const CB_PREFIX_OPCODE_BYTE: u8 = 0xCB;

pub const GAME_BOY_FILE_EXT: &str = "gb";
pub const GAME_BOY_COLOR_FILE_EXT: &str = "gbc";

/// 64 KiB, the full 16-bit address space.
pub const MEMORY_SIZE: usize = 0x10000;
/// Non-banked cartridge window, 0x0000-0x7FFF.
pub const ROM_SIZE: usize = 0x8000;

// Not usable area, reads as 0 and ignores writes.
pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;

pub const ADDR_SERIAL_SB: u16 = 0xFF01;
pub const ADDR_SERIAL_SC: u16 = 0xFF02;
pub const ADDR_TIMER_DIV: u16 = 0xFF04;
pub const ADDR_TIMER_TIMA: u16 = 0xFF05;
pub const ADDR_TIMER_TMA: u16 = 0xFF06;
pub const ADDR_TIMER_TAC: u16 = 0xFF07;
pub const IF_ADDR: u16 = 0xFF0F;
pub const IE_ADDR: u16 = 0xFFFF;

pub const ADDR_VEC_VBLANK: u16 = 0x0040;
pub const ADDR_VEC_LCD_STAT: u16 = 0x0048;
pub const ADDR_VEC_TIMER: u16 = 0x0050;
pub const ADDR_VEC_SERIAL: u16 = 0x0058;
pub const ADDR_VEC_JOYPAD: u16 = 0x0060;

/// Clock ticks per machine cycle.
pub const T_CYCLES_PER_M_CYCLE: u32 = 4;
/// What a halted CPU reports per step.
pub const HALTED_STEP_CYCLES: u32 = T_CYCLES_PER_M_CYCLE;
/// Two wait states, two stack writes and the jump.
pub const INTERRUPT_DISPATCH_CYCLES: u32 = 5 * T_CYCLES_PER_M_CYCLE;

/// 4.194304 MHz / 59.7 Hz
pub const CYCLES_PER_FRAME: u32 = 70_224;
