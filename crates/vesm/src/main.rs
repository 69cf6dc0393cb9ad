//! # vesm
//!
//! Compile Vue `<script setup>` blocks into CommonJS component modules
//! without building an AST.
//!
//! The heavy lifting lives in `vesm_atelier_setup`; this binary collects
//! files, compiles them in parallel and writes the results.

mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vesm")]
#[command(about = "Vue script setup to ES module compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile script setup files (default command)
    Build(commands::build::BuildArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(None);
    let result = match cli.command {
        Some(Commands::Build(args)) => commands::build::run(args, &config),
        // Default to build command with default args
        None => commands::build::run(commands::build::BuildArgs::default(), &config),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
