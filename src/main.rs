use std::process::ExitCode;

use clap::Parser;
use gameboy_core::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match gameboy_core::rom_exec(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
