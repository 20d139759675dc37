use std::error;
use std::fmt;
use std::io;

use crate::cartridge::LoadError;
use crate::cpu::DecodeError;

/// Anything that stops the driver.
#[derive(Debug)]
pub enum Error {
    Load(LoadError),
    Decode(DecodeError),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load(err) => write!(f, "Failed to load cartridge: {}", err),
            Error::Decode(err) => write!(f, "CPU stopped: {}", err),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Decode(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
