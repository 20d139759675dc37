/*
FFFF - IE - Interrupt Enable (R/W)
FF0F - IF - Interrupt Flag (R/W)

Bit  Source    Vector
0    V-Blank   0x40
1    LCD STAT  0x48
2    Timer     0x50
3    Serial    0x58
4    Joypad    0x60

Lower bit wins when several are pending. IME gates dispatch but not the
HALT wake-up.
*/

use log::{debug, trace};

use crate::constants::*;

/// Only the low five bits of IE/IF map to interrupt sources.
const INTERRUPT_MASK: u8 = 0x1F;

/// EI arms this many ticks: one for the EI step itself, one for the instruction after it.
const EI_DELAY: u8 = 2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterruptKind {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl InterruptKind {
    /// All kinds, highest priority first.
    pub const ALL: [InterruptKind; 5] = [
        InterruptKind::VBlank,
        InterruptKind::LcdStat,
        InterruptKind::Timer,
        InterruptKind::Serial,
        InterruptKind::Joypad,
    ];

    pub fn bit(self) -> u8 {
        match self {
            InterruptKind::VBlank => 0,
            InterruptKind::LcdStat => 1,
            InterruptKind::Timer => 2,
            InterruptKind::Serial => 3,
            InterruptKind::Joypad => 4,
        }
    }

    pub fn mask(self) -> u8 {
        1 << self.bit()
    }

    pub fn vector(self) -> u16 {
        match self {
            InterruptKind::VBlank => ADDR_VEC_VBLANK,
            InterruptKind::LcdStat => ADDR_VEC_LCD_STAT,
            InterruptKind::Timer => ADDR_VEC_TIMER,
            InterruptKind::Serial => ADDR_VEC_SERIAL,
            InterruptKind::Joypad => ADDR_VEC_JOYPAD,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InterruptController {
    /// IE, 0xFFFF
    pub enable: u8,
    /// IF, 0xFF0F
    pub flags: u8,
    /// IME
    pub master_enabled: bool,
    /// Remaining steps before an EI takes effect.
    pub ime_pending: Option<u8>,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, kind: InterruptKind) {
        trace!("Interrupt requested: {:?}", kind);
        self.flags |= kind.mask();
    }

    /// Highest priority interrupt that is both enabled and requested, if IME is on.
    pub fn pending(&self) -> Option<InterruptKind> {
        if !self.master_enabled {
            return None;
        }
        self.highest_pending()
    }

    /// IE & IF without looking at IME. A halted CPU wakes on this.
    pub fn pending_enabled_ignoring_master(&self) -> bool {
        self.enable & self.flags & INTERRUPT_MASK != 0
    }

    fn highest_pending(&self) -> Option<InterruptKind> {
        let active = self.enable & self.flags & INTERRUPT_MASK;
        InterruptKind::ALL
            .into_iter()
            .find(|kind| active & kind.mask() != 0)
    }

    /// Acknowledges `kind` and returns the address the CPU jumps to.
    pub fn dispatch(&mut self, kind: InterruptKind) -> u16 {
        debug!("Dispatching {:?} to {:#06X}", kind, kind.vector());
        self.master_enabled = false;
        self.ime_pending = None;
        self.flags &= !kind.mask();
        kind.vector()
    }

    /// RETI
    pub fn enable_interrupts_immediate(&mut self) {
        self.master_enabled = true;
        self.ime_pending = None;
    }

    /// EI, takes effect once the following instruction has completed.
    pub fn schedule_enable(&mut self) {
        if !self.master_enabled {
            self.ime_pending = Some(EI_DELAY);
        }
    }

    /// DI, also cancels an EI that has not landed yet.
    pub fn disable_interrupts(&mut self) {
        self.master_enabled = false;
        self.ime_pending = None;
    }

    /// Called by the CPU after every executed instruction.
    pub fn tick_ime_delay(&mut self) {
        self.ime_pending = match self.ime_pending {
            Some(n) if n <= 1 => {
                trace!("IME enabled");
                self.master_enabled = true;
                None
            }
            Some(n) => Some(n - 1),
            None => None,
        };
    }

    pub fn read_if(&self) -> u8 {
        self.flags
    }

    pub fn write_if(&mut self, val: u8) {
        self.flags = val;
    }

    pub fn read_ie(&self) -> u8 {
        self.enable
    }

    pub fn write_ie(&mut self, val: u8) {
        self.enable = val;
    }
}
