/*
Source: https://gbdev.io/pandocs/Memory_Map.html

Start	End	Description
0000	7FFF	32 KiB cartridge ROM, bank 00 and 01
8000	9FFF	8 KiB Video RAM (VRAM)
A000	BFFF	8 KiB External RAM
C000	DFFF	8 KiB Work RAM (WRAM)
E000	FDFF	Echo RAM
FE00	FE9F	Object attribute memory (OAM)
FEA0	FEFF	Not Usable
FF00	FF7F	I/O Registers
FF80	FFFE	High RAM (HRAM)
FFFF	FFFF	Interrupt Enable register (IE)

Everything is one flat array except the unusable window, the timer
registers and IF/IE, which live in their own components.
*/

use log::{debug, info, trace};

use crate::{
    cartridge::Cartridge,
    constants::*,
    interrupt::InterruptController,
    mmu::memory_trait::Memory,
    timer::Timer,
};

/// Serial transfer start with the internal clock.
const SERIAL_TRANSFER_START: u8 = 0x81;
const SERIAL_TRANSFER_BUSY: u8 = 0x80;

/// I/O register values left behind by the boot ROM.
const POST_BOOT_IO: [(u16, u8); 28] = [
    (0xFF05, 0x00), // TIMA
    (0xFF06, 0x00), // TMA
    (0xFF07, 0x00), // TAC
    (0xFF10, 0x80), // NR10
    (0xFF11, 0xBF), // NR11
    (0xFF12, 0xF3), // NR12
    (0xFF14, 0xBF), // NR14
    (0xFF16, 0x3F), // NR21
    (0xFF17, 0x00), // NR22
    (0xFF19, 0xBF), // NR24
    (0xFF1A, 0x7F), // NR30
    (0xFF1B, 0xFF), // NR31
    (0xFF1C, 0x9F), // NR32
    (0xFF1E, 0xBF), // NR34
    (0xFF20, 0xFF), // NR41
    (0xFF21, 0x00), // NR42
    (0xFF22, 0x00), // NR43
    (0xFF23, 0xBF), // NR44
    (0xFF24, 0x77), // NR50
    (0xFF25, 0xF3), // NR51
    (0xFF26, 0xF1), // NR52
    (0xFF40, 0x91), // LCDC
    (0xFF42, 0x00), // SCY
    (0xFF43, 0x00), // SCX
    (0xFF45, 0x00), // LYC
    (0xFF47, 0xFC), // BGP
    (0xFF48, 0xFF), // OBP0
    (0xFF49, 0xFF), // OBP1
];

#[derive(Debug, Clone)]
pub struct Bus {
    // This puts exactly 64KB on the HEAP, not the STACK
    pub data: Box<[u8; MEMORY_SIZE]>,
    pub interrupts: InterruptController,
    pub timer: Timer,
    serial: Vec<u8>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Zeroed memory, IME off, timer stopped.
    pub fn new() -> Self {
        Bus {
            data: Box::new([0u8; MEMORY_SIZE]),
            interrupts: InterruptController::new(),
            timer: Timer::new(),
            serial: Vec::new(),
        }
    }

    /// A bus with the cartridge mapped and the I/O registers the boot ROM leaves behind.
    pub fn with_cartridge(cartridge: &Cartridge) -> Self {
        let mut bus = Self::new();
        bus.load_cartridge(cartridge);
        bus.apply_post_boot_state();
        bus
    }

    /// Copies the fixed ROM window into 0x0000-0x7FFF.
    pub fn load_cartridge(&mut self, cartridge: &Cartridge) {
        let rom = cartridge.rom();
        self.data[..rom.len()].copy_from_slice(rom);
        debug!(
            "Mapped cartridge, memory_size: {}, rom_size: {}",
            MEMORY_SIZE,
            rom.len()
        );
    }

    pub fn apply_post_boot_state(&mut self) {
        for (addr, val) in POST_BOOT_IO {
            self.write_byte(addr, val);
        }
        self.interrupts.write_ie(0x00);
    }

    /// Bypasses every side effect, including the unusable window.
    pub fn force_write_byte(&mut self, addr: u16, val: u8) {
        self.data[addr as usize] = val;
    }

    /// Places `bytes` starting at `addr`, wrapping at the top of the address space.
    pub fn force_write_bytes(&mut self, addr: u16, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.force_write_byte(addr.wrapping_add(i as u16), *b);
        }
    }

    /// Bytes shifted out through the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.serial
    }

    pub fn serial_output_string(&self) -> String {
        String::from_utf8_lossy(&self.serial).into_owned()
    }

    fn serial_transfer(&mut self) {
        let byte = self.data[ADDR_SERIAL_SB as usize];
        self.serial.push(byte);
        info!("Serial: {:?}", byte as char);
        // The transfer completes immediately.
        self.data[ADDR_SERIAL_SC as usize] = SERIAL_TRANSFER_START & !SERIAL_TRANSFER_BUSY;
    }
}

impl Memory for Bus {
    fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            UNUSABLE_START..=UNUSABLE_END => 0x00,
            ADDR_TIMER_DIV..=ADDR_TIMER_TAC => self.timer.read_byte(addr),
            IF_ADDR => self.interrupts.read_if(),
            IE_ADDR => self.interrupts.read_ie(),
            _ => self.data[addr as usize],
        }
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            UNUSABLE_START..=UNUSABLE_END => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (IGNORED: unusable)", addr, val);
            }
            ADDR_TIMER_DIV..=ADDR_TIMER_TAC => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (TIMER)", addr, val);
                self.timer.write_byte(addr, val);
            }
            IF_ADDR => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (IF)", addr, val);
                self.interrupts.write_if(val);
            }
            IE_ADDR => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X} (IE)", addr, val);
                self.interrupts.write_ie(val);
            }
            ADDR_SERIAL_SC if val == SERIAL_TRANSFER_START => {
                self.data[addr as usize] = val;
                self.serial_transfer();
            }
            _ => {
                trace!("write_byte [0x{:04X}] -> 0x{:02X}", addr, val);
                self.data[addr as usize] = val;
            }
        }
    }

    fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    fn tick_components(&mut self, cycles: u32) {
        self.timer.advance(cycles, &mut self.interrupts);
    }
}
