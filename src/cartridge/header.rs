/*
Cartridge header, 0x0100-0x014F

0x0100-0x0103  Entry point
0x0104-0x0133  Logo bitmap, compared by the boot ROM
0x0134-0x0143  Title, uppercase ASCII padded with 0x00
0x0144-0x0145  New licensee code
0x0146         SGB flag
0x0147         Cartridge type (mapper)
0x0148         ROM size code, 32 KiB << n
0x0149         RAM size code
0x014A         Destination code
0x014B         Old licensee code
0x014C         Mask ROM version
0x014D         Header checksum over 0x0134-0x014C
0x014E-0x014F  Global checksum (not checked by hardware)
*/

use log::{error, info};

pub const HEADER_END: usize = 0x0150;

const ROM_BANK_SIZE: usize = 0x4000;

const LOGO_START: usize = 0x0104;
const LOGO_END: usize = 0x0134;
const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0143;
const CHECKSUM_START: usize = 0x0134;
const CHECKSUM_END: usize = 0x014C;

const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

#[derive(Debug, Default, Clone)]
pub struct Headers {
    pub title: Option<String>,
    pub licensee_new: u16,    // 0x0144-0x0145
    pub sgb_flag: u8,         // 0x0146
    pub cart_type: u8,        // 0x0147
    pub rom_size_raw: u8,     // 0x0148
    pub ram_size_raw: u8,     // 0x0149
    pub destination: u8,      // 0x014A
    pub licensee_old: u8,     // 0x014B
    pub version: u8,          // 0x014C
    pub checksum_header: u8,  // 0x014D
    pub checksum_global: u16, // 0x014E-0x014F
    pub logo_ok: bool,
    pub checksum_ok: bool,
}

impl Headers {
    /// Parses the header. A buffer too small to hold one yields the default.
    pub fn new(content: &[u8]) -> Self {
        if content.len() < HEADER_END {
            error!("ROM size {} too small for header", content.len());
            return Self::default();
        }

        let checksum_header = content[0x014D];
        let headers = Self {
            title: extract_title(content),
            licensee_new: u16::from_be_bytes([content[0x0144], content[0x0145]]),
            sgb_flag: content[0x0146],
            cart_type: content[0x0147],
            rom_size_raw: content[0x0148],
            ram_size_raw: content[0x0149],
            destination: content[0x014A],
            licensee_old: content[0x014B],
            version: content[0x014C],
            checksum_header,
            checksum_global: u16::from_be_bytes([content[0x014E], content[0x014F]]),
            logo_ok: content[LOGO_START..LOGO_END] == NINTENDO_LOGO,
            checksum_ok: header_checksum(content) == checksum_header,
        };

        if !headers.logo_ok {
            error!("Logo verification failed");
        }
        if !headers.checksum_ok {
            error!(
                "Header checksum mismatch! Calculated: {:02X}, Header: {:02X}",
                header_checksum(content),
                checksum_header
            );
        }
        info!(
            "Cartridge: {:?}, type {} ({:#04X}), {} KiB ROM, {} KiB RAM",
            headers.title,
            cartridge_type_name(headers.cart_type),
            headers.cart_type,
            headers.rom_size_bytes() / 1024,
            headers.ram_size_bytes() / 1024
        );
        headers
    }

    /// True when the boot ROM would accept the cartridge.
    pub fn is_valid(&self) -> bool {
        self.logo_ok && self.checksum_ok
    }

    /// Number of 16 KiB banks.
    pub fn rom_banks(&self) -> usize {
        self.rom_size_bytes() / ROM_BANK_SIZE
    }

    pub fn rom_size_bytes(&self) -> usize {
        match self.rom_size_raw {
            0x52 => 72 * ROM_BANK_SIZE,
            0x53 => 80 * ROM_BANK_SIZE,
            0x54 => 96 * ROM_BANK_SIZE,
            raw => 0x8000 << raw.min(0x08),
        }
    }

    pub fn ram_size_bytes(&self) -> usize {
        match self.ram_size_raw {
            0x01 => 2 * 1024,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            _ => 0,
        }
    }

    /// Only ROM ONLY (and its RAM variants) fit the fixed 32 KiB window.
    pub fn is_banked(&self) -> bool {
        !matches!(self.cart_type, 0x00 | 0x08 | 0x09)
    }
}

pub fn cartridge_type_name(code: u8) -> &'static str {
    match code {
        0x00 => "ROM ONLY",
        0x01 => "MBC1",
        0x02 => "MBC1+RAM",
        0x03 => "MBC1+RAM+BATTERY",
        0x05 => "MBC2",
        0x06 => "MBC2+BATTERY",
        0x08 => "ROM+RAM",
        0x09 => "ROM+RAM+BATTERY",
        0x0B => "MMM01",
        0x0C => "MMM01+RAM",
        0x0D => "MMM01+RAM+BATTERY",
        0x0F => "MBC3+TIMER+BATTERY",
        0x10 => "MBC3+TIMER+RAM+BATTERY",
        0x11 => "MBC3",
        0x12 => "MBC3+RAM",
        0x13 => "MBC3+RAM+BATTERY",
        0x19 => "MBC5",
        0x1A => "MBC5+RAM",
        0x1B => "MBC5+RAM+BATTERY",
        0x1C => "MBC5+RUMBLE",
        0x1D => "MBC5+RUMBLE+RAM",
        0x1E => "MBC5+RUMBLE+RAM+BATTERY",
        0xFC => "POCKET CAMERA",
        0xFD => "BANDAI TAMA5",
        0xFE => "HuC3",
        0xFF => "HuC1+RAM+BATTERY",
        _ => "UNKNOWN",
    }
}

fn header_checksum(content: &[u8]) -> u8 {
    content[CHECKSUM_START..=CHECKSUM_END]
        .iter()
        .fold(0u8, |x, b| x.wrapping_sub(*b).wrapping_sub(1))
}

// Stops at the first NULL byte.
fn extract_title(content: &[u8]) -> Option<String> {
    let title_bytes = &content[TITLE_START..=TITLE_END];
    let end = title_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(title_bytes.len());
    if end == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&title_bytes[..end]).into_owned())
}
