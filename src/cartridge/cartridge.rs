use log::{debug, warn};

use crate::cartridge::{Headers, LoadError};
use crate::constants::ROM_SIZE;

/// A ROM image mapped without bank switching: 0x0000-0x7FFF only.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub headers: Headers,
    data: Vec<u8>,
}

impl Cartridge {
    pub fn new(content: Vec<u8>) -> Result<Self, LoadError> {
        if content.len() < ROM_SIZE {
            return Err(LoadError::TooShort {
                expected: ROM_SIZE,
                found: content.len(),
            });
        }

        let headers = Headers::new(&content);
        if headers.is_banked() {
            warn!(
                "Cartridge type {:#04X} uses bank switching, only banks 0 and 1 are mapped",
                headers.cart_type
            );
        }
        if !headers.is_valid() {
            warn!("Cartridge header failed the boot checks, running anyway");
        }
        debug!("Cartridge image is {} bytes", content.len());

        Ok(Cartridge {
            headers,
            data: content,
        })
    }

    /// The bytes visible at 0x0000-0x7FFF.
    pub fn rom(&self) -> &[u8] {
        &self.data[..ROM_SIZE]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
