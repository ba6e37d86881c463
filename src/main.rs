//! Binary entry point for the `lz4chain` command-line tool.
//!
//! Parses arguments with clap, runs the selected subcommand and maps any
//! error to a message on stderr and exit code 1.

use clap::Parser;

use lz4chain::cli::args::Cli;
use lz4chain::cli::commands::run;
use lz4chain::cli::constants::COMPRESSOR_NAME;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        lz4chain::displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, e);
        std::process::exit(1);
    }
}
