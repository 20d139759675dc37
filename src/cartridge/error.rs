use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    MissingExtension,
    InvalidExtension {
        expected: &'static str,
        found: String,
    },
    /// The image does not cover the fixed 0x0000-0x7FFF window.
    TooShort {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "I/O error: {}", err),
            LoadError::MissingExtension => write!(f, "ROM file has no extension"),
            LoadError::InvalidExtension { expected, found } => write!(
                f,
                "Invalid ROM file extension: expected '{}', found '{}'",
                expected, found
            ),
            LoadError::TooShort { expected, found } => write!(
                f,
                "ROM image too short: expected at least {:#X} bytes, found {:#X}",
                expected, found
            ),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}
