//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
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
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(DomainError::InvariantViolation(_)) => {
                        crate::exitcode::SOFTWARE
                    }
                    ApplicationError::Domain(_)
                    | ApplicationError::DuplicateId(_)
                    | ApplicationError::ContactNotFound(_) => crate::exitcode::DATAERR,
                    ApplicationError::InvalidDataFile(_) => crate::exitcode::USAGE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_application_errors_when_mapping_then_sysexits_codes() {
        let dup: CliError = ApplicationError::DuplicateId(1).into();
        let bad_file: CliError = ApplicationError::InvalidDataFile("x.txt".into()).into();
        let malformed: CliError = ApplicationError::from(DomainError::InvalidId("x".into())).into();
        let config: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();

        assert_eq!(dup.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(bad_file.exit_code(), crate::exitcode::USAGE);
        assert_eq!(malformed.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);

        let broken: CliError =
            ApplicationError::from(DomainError::InvariantViolation("bf 2".into())).into();
        assert_eq!(broken.exit_code(), crate::exitcode::SOFTWARE);
    }

    #[test]
    fn given_io_error_when_mapping_then_ioerr() {
        let err: CliError = InfraError::io(
            "write",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        )
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
        assert_eq!(err.to_string(), "I/O error: write");
    }
}
