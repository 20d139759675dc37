use std::path::PathBuf;

use clap::Parser;

/// Runs a Game Boy ROM headless on the CPU, timer and interrupt core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// ROM image to load (.gb or .gbc)
    #[arg(long)]
    pub load_rom: PathBuf,

    /// Write the log here instead of stderr.
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Stop after this many T-cycles. Runs until the CPU faults when omitted.
    #[arg(long)]
    pub max_cycles: Option<u64>,
}
