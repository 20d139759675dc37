use crate::constants::{IE_ADDR, IF_ADDR};
use crate::interrupt::InterruptController;

/// Everything the CPU needs from the address space.
pub trait Memory {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, val: u8);

    /// The controller behind IF (0xFF0F) and IE (0xFFFF).
    fn interrupts(&self) -> &InterruptController;
    fn interrupts_mut(&mut self) -> &mut InterruptController;

    /// Advances the clocked components attached to the bus.
    fn tick_components(&mut self, cycles: u32);

    // Helper for 16-bit reads (Little Endian)
    fn read_u16(&self, addr: u16) -> u16 {
        let low = self.read_byte(addr);
        let high = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    // Helper for 16-bit writes (Little Endian)
    fn write_u16(&mut self, addr: u16, val: u16) {
        let [low, high] = val.to_le_bytes();
        self.write_byte(addr, low);
        self.write_byte(addr.wrapping_add(1), high);
    }

    fn read_ie(&self) -> u8 {
        self.read_byte(IE_ADDR)
    }

    fn read_if(&self) -> u8 {
        self.read_byte(IF_ADDR)
    }

    fn write_ie(&mut self, value: u8) {
        self.write_byte(IE_ADDR, value);
    }

    fn write_if(&mut self, value: u8) {
        self.write_byte(IF_ADDR, value);
    }
}
