//! CLI module for executor-config
//!
//! Resolves component workspaces and checks component manifests against
//! the calling contract.

pub mod commands;
pub mod output;

pub use commands::{ExecutorCli, ExecutorCommands};
pub use output::OutputFormat;

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// At least one component violates the calling contract
    ContractViolation = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Configuration could not be resolved
    ConfigError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ExecutorCli) -> Result<ExitCode, CliError> {
    match cli.command {
        ExecutorCommands::Workspace(args) => commands::execute_workspace(args),
        ExecutorCommands::Check { manifests, format } => {
            commands::execute_check(manifests, format)
        }
    }
}
