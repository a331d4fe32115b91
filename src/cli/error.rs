//! CLI-level errors (wraps infrastructure errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Report(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::OperationFailed { .. } => match app.io_kind() {
                        Some(ErrorKind::NotFound) => crate::exitcode::NOINPUT,
                        Some(ErrorKind::InvalidData) => crate::exitcode::DATAERR,
                        Some(ErrorKind::PermissionDenied) => crate::exitcode::NOPERM,
                        Some(_) => crate::exitcode::IOERR,
                        None => crate::exitcode::SOFTWARE,
                    },
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::IoResultExt;

    fn failed(kind: ErrorKind) -> CliError {
        let result: std::io::Result<()> = Err(std::io::Error::new(kind, "boom"));
        result.with_context("receive scene").unwrap_err().into()
    }

    #[test]
    fn given_missing_scene_when_mapping_exit_code_then_noinput() {
        assert_eq!(failed(ErrorKind::NotFound).exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_malformed_scene_when_mapping_exit_code_then_dataerr() {
        assert_eq!(failed(ErrorKind::InvalidData).exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_config_error_when_mapping_exit_code_then_config() {
        let err: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }
}
