//! buildprobe CLI - probe libraries and build external projects

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use buildprobe::util::diagnostic::{emit, Diagnostic};
use buildprobe::ConfigureError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        let diagnostic = match e.downcast_ref::<ConfigureError>() {
            Some(err) => err.to_diagnostic(),
            None => e
                .chain()
                .skip(1)
                .fold(Diagnostic::error(e.to_string()), |diag, cause| {
                    diag.with_context(cause.to_string())
                }),
        };
        emit(&diagnostic, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("buildprobe=debug")
    } else {
        EnvFilter::new("buildprobe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Probe(args) => commands::probe::execute(args),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Cmake(args) => commands::cmake::execute(args),
        Commands::Vars(args) => commands::vars::execute(args),
    }
}
