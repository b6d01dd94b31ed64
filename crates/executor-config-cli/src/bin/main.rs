//! executor-config CLI
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: A component violates the calling contract
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Configuration could not be resolved
//! - 10: Internal error

use clap::Parser;
use executor_config_cli::{run_cli, ExecutorCli};

fn main() {
    let cli = ExecutorCli::parse();

    let level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        match cli.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
