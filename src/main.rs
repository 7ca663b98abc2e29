//! Ecopalette - command-line palette generator and editor

use std::process::ExitCode;

use ecopalette::cli;

fn main() -> ExitCode {
    cli::run()
}
