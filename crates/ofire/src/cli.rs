//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// OpenFire CLI - Tools for fire engineering projects
#[derive(Parser, Debug)]
#[command(name = "ofire")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_help_heading = "Available commands")]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new OpenFire project
    New(NewArgs),

    /// Run a fire engineering application
    Run(RunArgs),

    /// Open OpenFire documentation in browser
    Docs,

    /// Show OpenFire version
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Name of the project (also the directory name)
    pub name: String,

    /// Directory to create the project in
    #[arg(short, long, default_value = ".")]
    pub directory: Utf8PathBuf,

    /// Include an example Jupyter notebook
    #[arg(long)]
    pub notebook: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script path or URL to run (defaults to main.py)
    pub target: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
