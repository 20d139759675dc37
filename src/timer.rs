/*
FF04 - DIV  - Divider, high byte of a free running 16-bit counter. Writing resets it.
FF05 - TIMA - Timer counter, increments at the TAC selected rate.
FF06 - TMA  - Timer modulo, loaded into TIMA when it overflows.
FF07 - TAC  - Bit 2 enables TIMA, bits 1-0 select the input clock.

TAC  Period (T-cycles)
00   1024
01   16
10   64
11   256
*/

use log::trace;

use crate::constants::*;
use crate::interrupt::{InterruptController, InterruptKind};

const TAC_ENABLE: u8 = 0b100;
const TAC_MASK: u8 = 0b111;

#[derive(Debug, Default, Clone)]
pub struct Timer {
    pub internal_counter: u16, // Increments every T-cycle
    pub tima: u8,              // 0xFF05
    pub tma: u8,               // 0xFF06
    pub tac: u8,               // 0xFF07
    // Cycles seen by TIMA since its last increment. Kept apart from the
    // divider so a DIV reset does not shift the TIMA phase.
    tima_cycles: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// DIV as seen on the bus.
    pub fn div(&self) -> u8 {
        (self.internal_counter >> 8) as u8
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        match addr {
            ADDR_TIMER_DIV => self.div(),
            ADDR_TIMER_TIMA => self.tima,
            ADDR_TIMER_TMA => self.tma,
            ADDR_TIMER_TAC => self.tac,
            _ => panic!("Timer has a restrictive addr space: {:#06X}", addr),
        }
    }

    pub fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            ADDR_TIMER_DIV => {
                trace!("DIV reset (wrote {:#04X})", val);
                self.internal_counter = 0;
            }
            ADDR_TIMER_TIMA => self.tima = val,
            ADDR_TIMER_TMA => self.tma = val,
            ADDR_TIMER_TAC => self.tac = val & TAC_MASK,
            _ => panic!("Timer has a restrictive addr space: {:#06X}", addr),
        }
    }

    pub fn timer_enabled(&self) -> bool {
        self.tac & TAC_ENABLE != 0
    }

    /// T-cycles per TIMA increment for the current clock select.
    pub fn period(&self) -> u32 {
        match self.tac & 0b11 {
            0b00 => 1024,
            0b01 => 16,
            0b10 => 64,
            _ => 256,
        }
    }

    /// Applies `steps` TIMA increments at once. Every overflow reloads TMA,
    /// so past the first one TIMA cycles through TMA..=0xFF. Returns true
    /// when TIMA overflowed at least once.
    pub fn increment_tima(&mut self, steps: u64) -> bool {
        let to_overflow = 0x100 - self.tima as u64;
        if steps < to_overflow {
            self.tima += steps as u8;
            return false;
        }

        let reload_span = 0x100 - self.tma as u64;
        let past_reload = (steps - to_overflow) % reload_span;
        trace!("TIMA overflow, reload {:#04X}", self.tma);
        self.tima = self.tma + past_reload as u8;
        true
    }

    /// Moves the timer forward by `cycles` T-cycles, requesting a Timer
    /// interrupt when TIMA overflows.
    pub fn advance(&mut self, cycles: u32, interrupts: &mut InterruptController) {
        self.internal_counter = self.internal_counter.wrapping_add(cycles as u16);

        if !self.timer_enabled() {
            return;
        }

        let period = self.period() as u64;
        let total = self.tima_cycles as u64 + cycles as u64;
        self.tima_cycles = (total % period) as u32;
        if self.increment_tima(total / period) {
            interrupts.request(InterruptKind::Timer);
        }
    }
}
