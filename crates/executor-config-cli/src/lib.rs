//! executor-config CLI
//!
//! Command-line front end for `executor-config-core`.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Resolve the workspace of replica 2, shard 1
//! executor-config workspace --config executor.yml --replica-id 2 --pea-id 1
//!
//! # Same, taking runtime arguments from EXECUTOR__* variables and creating the directory
//! executor-config workspace --config executor.yml --env-prefix EXECUTOR --create
//!
//! # Check component manifests before deployment
//! executor-config check --manifests indexer.yml ranker.yml --format json
//! ```

pub mod cli;
pub mod error;

pub use cli::{ExecutorCli, ExecutorCommands, ExitCode, OutputFormat};
pub use error::CliError;

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub fn run_cli(cli: ExecutorCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
