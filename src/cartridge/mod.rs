mod cartridge;
mod error;
mod header;
mod loader;
mod validation;

pub use cartridge::Cartridge;
pub use error::LoadError;
pub use header::{Headers, cartridge_type_name};
pub use loader::load_rom;
pub use validation::validate_extension;
