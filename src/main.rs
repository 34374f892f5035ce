//! Reviewgate CLI entry point.

use clap::Parser;
use reviewgate::cli::{self, Cli, EXIT_FAILED};

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILED
        }
    };

    std::process::exit(exit_code);
}
