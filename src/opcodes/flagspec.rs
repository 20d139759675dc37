use super::*;
use crate::constants::{FLAG_C, FLAG_H, FLAG_N, FLAG_Z};
use std::fmt;

/// How an instruction affects each of the Z, N, H and C flags.
#[derive(Debug, Copy, Clone)]
pub struct FlagSpec {
    pub z: FlagAction,
    pub n: FlagAction,
    pub h: FlagAction,
    pub c: FlagAction,
}

impl FlagSpec {
    /// Merges the flags proposed by a handler into the current F register.
    /// The low nibble of the result is always zero.
    pub fn resolve(&self, f: u8, result: &InstructionResult) -> u8 {
        let mut out = 0;
        for (action, mask, proposed) in [
            (self.z, FLAG_Z, result.z),
            (self.n, FLAG_N, result.n),
            (self.h, FLAG_H, result.h),
            (self.c, FLAG_C, result.c),
        ] {
            if action.apply(f & mask != 0, proposed) {
                out |= mask;
            }
        }
        out
    }
}

impl fmt::Display for FlagSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Computed flags print their own letter, the rest use FlagAction's symbol.
        let letter = |action: FlagAction, name: char| match action {
            FlagAction::Calculate => name,
            FlagAction::None => '-',
            FlagAction::Set => '1',
            FlagAction::Reset => '0',
            FlagAction::Invert => '!',
        };

        write!(
            f,
            "[{}{}{}{}]",
            letter(self.z, 'Z'),
            letter(self.n, 'N'),
            letter(self.h, 'H'),
            letter(self.c, 'C')
        )
    }
}
