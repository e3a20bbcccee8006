//! OpenFire CLI - Tools for fire engineering projects
//!
//! Entry point for the `ofire` command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        // Bare `ofire` shows help and succeeds
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    let result = match command {
        Commands::New(args) => commands::new::run(args),
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Docs => commands::docs::run(),
        Commands::Version(args) => commands::version::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit status for a failed command: the app's own code for `run`, else 1
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<ofire_projects::Error>()
        .map(ofire_projects::Error::exit_code)
        .unwrap_or(1);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Progress is shown through `output`; logs are for diagnosis
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
