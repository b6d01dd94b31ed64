//! Error types for the executor-config CLI

use executor_config_core::{ConfigError, ContractViolation};
use thiserror::Error;

use crate::cli::ExitCode;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Loading or resolving configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A component manifest violates the calling contract
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// Rendering output failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CliError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CliError::InvalidInput(msg.into())
    }

    /// Exit code reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidInput(_) => ExitCode::InvalidInput,
            CliError::Config(err) if err.is_user_error() => ExitCode::ConfigError,
            CliError::Config(ConfigError::Io { .. }) => ExitCode::FileError,
            CliError::Config(_) => ExitCode::InternalError,
            CliError::Contract(_) => ExitCode::ContractViolation,
            CliError::SerializationError(_) => ExitCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::invalid_input("no manifest given");
        assert_eq!(err.to_string(), "Invalid input: no manifest given");

        let err = CliError::from(ConfigError::WorkspaceNotSet);
        assert_eq!(err.to_string(), "workspace not set");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::invalid_input("x").exit_code(), ExitCode::InvalidInput);
        assert_eq!(CliError::from(ConfigError::NameNotSet).exit_code(), ExitCode::ConfigError);
        assert_eq!(
            CliError::from(ConfigError::io(
                "/missing.yml",
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing")
            ))
            .exit_code(),
            ExitCode::FileError
        );
        assert_eq!(
            CliError::from(ConfigError::invalid_value("EXECUTOR__PEA_ID", "not an integer")).exit_code(),
            ExitCode::ConfigError
        );
        assert_eq!(
            CliError::from(ConfigError::CurrentDir(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "gone"
            )))
            .exit_code(),
            ExitCode::InternalError
        );
    }
}
