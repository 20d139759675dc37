use super::error::LoadError;
use crate::constants::{GAME_BOY_COLOR_FILE_EXT, GAME_BOY_FILE_EXT};
use std::path::Path;

/// Accepts `.gb` and `.gbc`, ignoring case.
pub fn validate_extension(path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .ok_or(LoadError::MissingExtension)?
        .to_str()
        .ok_or(LoadError::MissingExtension)?;

    if ext.eq_ignore_ascii_case(GAME_BOY_FILE_EXT) || ext.eq_ignore_ascii_case(GAME_BOY_COLOR_FILE_EXT)
    {
        Ok(())
    } else {
        Err(LoadError::InvalidExtension {
            expected: ".gb or .gbc",
            found: ext.to_string(),
        })
    }
}
