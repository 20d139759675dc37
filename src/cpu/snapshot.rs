use crate::{constants::*, cpu::Cpu, mmu::Memory};

/// Register state plus the four bytes at PC, in the Game Boy Doctor log format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CpuSnapshot {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub pcmem: [u8; 4], // The 4 bytes at PC
}

#[derive(Debug, PartialEq, Eq)]
pub struct StateMismatch {
    pub field: &'static str,
    pub expected: u16, // u16 covers both u8 and u16 registers
    pub actual: u16,
}

impl CpuSnapshot {
    pub fn from_cpu(cpu: &Cpu, bus: &impl Memory) -> Self {
        CpuSnapshot {
            a: cpu.a,
            f: cpu.f,
            b: cpu.b,
            c: cpu.c,
            d: cpu.d,
            e: cpu.e,
            h: cpu.h,
            l: cpu.l,
            sp: cpu.sp,
            pc: cpu.pc,
            // Plain reads, none of the mapped registers have read side effects.
            pcmem: [
                bus.read_byte(cpu.pc),
                bus.read_byte(cpu.pc.wrapping_add(1)),
                bus.read_byte(cpu.pc.wrapping_add(2)),
                bus.read_byte(cpu.pc.wrapping_add(3)),
            ],
        }
    }

    /// `[Z-HC]` style, used by the debug output.
    pub fn pretty_format_flags(&self) -> String {
        [(FLAG_Z, 'Z'), (FLAG_N, 'N'), (FLAG_H, 'H'), (FLAG_C, 'C')]
            .iter()
            .map(|&(flag, letter)| if self.f & flag != 0 { letter } else { '-' })
            .collect::<String>()
    }

    pub fn to_doctor_string(&self) -> String {
        format!(
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} PCMEM:{:02X},{:02X},{:02X},{:02X}",
            self.a,
            self.f,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            self.pcmem[0],
            self.pcmem[1],
            self.pcmem[2],
            self.pcmem[3]
        )
    }

    /// Every register that differs, `self` being the expected state.
    pub fn compare(&self, other: &CpuSnapshot) -> Vec<StateMismatch> {
        let fields: [(&'static str, u16, u16); 10] = [
            ("A", self.a as u16, other.a as u16),
            ("F", self.f as u16, other.f as u16),
            ("B", self.b as u16, other.b as u16),
            ("C", self.c as u16, other.c as u16),
            ("D", self.d as u16, other.d as u16),
            ("E", self.e as u16, other.e as u16),
            ("H", self.h as u16, other.h as u16),
            ("L", self.l as u16, other.l as u16),
            ("SP", self.sp, other.sp),
            ("PC", self.pc, other.pc),
        ];

        fields
            .into_iter()
            .filter(|(_, expected, actual)| expected != actual)
            .map(|(field, expected, actual)| StateMismatch {
                field,
                expected,
                actual,
            })
            .collect()
    }

    /// Parses a doctor line. Missing fields stay zero, unknown keys are skipped.
    pub fn from_string(s: &str) -> Result<Self, String> {
        let mut snapshot = CpuSnapshot::default();

        fn parse_hex8(v: &str) -> Result<u8, String> {
            u8::from_str_radix(v, 16).map_err(|e| format!("{}: {}", v, e))
        }
        fn parse_hex16(v: &str) -> Result<u16, String> {
            u16::from_str_radix(v, 16).map_err(|e| format!("{}: {}", v, e))
        }

        for part in s.split_whitespace() {
            let Some((key, val)) = part.split_once(':') else {
                continue;
            };

            match key {
                "A" => snapshot.a = parse_hex8(val)?,
                "F" => snapshot.f = parse_hex8(val)?,
                "B" => snapshot.b = parse_hex8(val)?,
                "C" => snapshot.c = parse_hex8(val)?,
                "D" => snapshot.d = parse_hex8(val)?,
                "E" => snapshot.e = parse_hex8(val)?,
                "H" => snapshot.h = parse_hex8(val)?,
                "L" => snapshot.l = parse_hex8(val)?,
                "SP" => snapshot.sp = parse_hex16(val)?,
                "PC" => snapshot.pc = parse_hex16(val)?,
                "PCMEM" => {
                    for (i, b_str) in val.split(',').take(4).enumerate() {
                        snapshot.pcmem[i] = parse_hex8(b_str)?;
                    }
                }
                _ => {}
            }
        }
        Ok(snapshot)
    }
}
