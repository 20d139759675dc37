use super::error::LoadError;
use crate::cartridge::validation::validate_extension;
use log::info;
use std::fs;
use std::path::Path;

/// Reads a ROM image from disk after checking its extension.
pub fn load_rom(path: &Path) -> Result<Vec<u8>, LoadError> {
    validate_extension(path)?;

    let buffer = fs::read(path)?;
    info!("Loaded {} ({} bytes)", path.display(), buffer.len());

    Ok(buffer)
}
