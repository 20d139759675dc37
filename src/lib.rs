pub mod args;
pub mod cartridge;
pub mod constants;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod interrupt;
pub mod mmu;
pub mod opcodes;
pub mod timer;

use std::io::{self, Write};
use std::path::PathBuf;

use log::info;

use cartridge::Cartridge;
use emulator::Emulator;

pub use error::Error;

pub fn setup_logging(log_path: &Option<PathBuf>) -> Result<(), io::Error> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    // Bare messages, so trace output lines up with Game Boy Doctor logs.
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));

    if let Some(path) = log_path {
        let file = std::fs::File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Loads the ROM named in `args` and runs it until the cycle budget is spent
/// or the CPU hits an undefined opcode. Captured serial output goes to stdout.
pub fn rom_exec(args: args::Args) -> Result<(), Error> {
    setup_logging(&args.log_path)?;

    let rom = cartridge::load_rom(&args.load_rom)?;
    let cartridge = Cartridge::new(rom)?;
    let mut emulator = Emulator::new(&cartridge);

    let result = match args.max_cycles {
        Some(budget) => emulator.run_for(budget).map(|_| ()),
        None => loop {
            if let Err(err) = emulator.step() {
                break Err(err);
            }
        },
    };

    info!("Ran {} T-cycles", emulator.total_cycles());
    let serial = emulator.bus.serial_output_string();
    if !serial.is_empty() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", serial)?;
        stdout.flush()?;
    }

    result.map_err(Error::from)
}
