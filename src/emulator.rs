use log::{debug, info};

use crate::cartridge::Cartridge;
use crate::constants::CYCLES_PER_FRAME;
use crate::cpu::{Cpu, CpuSnapshot, DecodeError};
use crate::mmu::{Bus, Memory};

/// Owns the CPU and the bus and drives them one instruction at a time.
/// Video and wall-clock pacing are left to whoever calls `step`.
#[derive(Debug, Clone)]
pub struct Emulator {
    pub cpu: Cpu,
    pub bus: Bus,
    total_cycles: u64,
}

impl Emulator {
    /// Post-boot CPU and I/O state with the cartridge mapped.
    pub fn new(cartridge: &Cartridge) -> Self {
        info!(
            "Starting {}",
            cartridge.headers.title.as_deref().unwrap_or("untitled cartridge")
        );
        Self::from_parts(Cpu::new(), Bus::with_cartridge(cartridge))
    }

    pub fn from_parts(cpu: Cpu, bus: Bus) -> Self {
        Emulator {
            cpu,
            bus,
            total_cycles: 0,
        }
    }

    /// Services one pending interrupt if there is one, then executes one
    /// instruction. Returns the T-cycles that passed, which the timer has
    /// already seen.
    pub fn step(&mut self) -> Result<u32, DecodeError> {
        let mut cycles = 0;

        if let Some(kind) = self.cpu.pending_interrupt(&self.bus) {
            let dispatch = self.cpu.service_interrupt(kind, &mut self.bus);
            self.bus.tick_components(dispatch);
            cycles += dispatch;
        }

        let executed = self.cpu.step(&mut self.bus).inspect_err(|err| {
            debug!(
                "Decode failed, {}",
                CpuSnapshot::from_cpu(&self.cpu, &self.bus).to_doctor_string()
            );
            debug!("{}", err);
        })?;
        self.bus.tick_components(executed);
        cycles += executed;

        self.total_cycles += cycles as u64;
        Ok(cycles)
    }

    /// Steps until at least `budget` T-cycles have passed. Returns the cycles actually run.
    pub fn run_for(&mut self, budget: u64) -> Result<u64, DecodeError> {
        let mut elapsed = 0u64;
        while elapsed < budget {
            elapsed += self.step()? as u64;
        }
        Ok(elapsed)
    }

    /// One video frame worth of cycles.
    pub fn run_frame(&mut self) -> Result<u64, DecodeError> {
        self.run_for(CYCLES_PER_FRAME as u64)
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }
}
