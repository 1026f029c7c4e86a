//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    /// Audit found diverging counts
    #[error("{0}")]
    Mismatch(String),

    /// Integrity check found issues
    #[error("{0}")]
    DataIssues(String),
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
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Mismatch(_) => crate::exitcode::FINDINGS,
            CliError::DataIssues(_) => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) | ApplicationError::Payload { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::OperationFailed { source, .. } => {
                        match source.downcast_ref::<std::io::Error>() {
                            Some(io) if io.kind() == std::io::ErrorKind::NotFound => {
                                crate::exitcode::NOINPUT
                            }
                            Some(_) => crate::exitcode::IOERR,
                            None => crate::exitcode::SOFTWARE,
                        }
                    }
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_exit_codes() {
        let missing: CliError = ApplicationError::OperationFailed {
            context: "read".into(),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        }
        .into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let bad_row: CliError = ApplicationError::Domain(DomainError::InvalidEntry {
            index: 0,
            reason: "missing or empty id".into(),
        })
        .into();
        assert_eq!(bad_row.exit_code(), crate::exitcode::DATAERR);

        assert_eq!(
            CliError::Mismatch("x".into()).exit_code(),
            crate::exitcode::FINDINGS
        );
    }
}
