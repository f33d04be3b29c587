//! depbuild CLI entry point
//!
//! Parses the command line, runs the dependency build and turns any failure
//! into a colored error report with a suggestion on stderr (exit code 1).

use clap::Parser;
use depbuild::cli;
use depbuild::core::error::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}
