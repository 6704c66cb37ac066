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
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Script { .. } | ApplicationError::NotFound { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) | ApplicationError::OperationFailed { .. } => {
                        crate::exitcode::SOFTWARE
                    }
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Level};
    use rstest::rstest;

    #[rstest]
    #[case(ApplicationError::script(3, "unknown command"), crate::exitcode::DATAERR)]
    #[case(
        ApplicationError::not_found(Level::Company, &EntityId::new("9")),
        crate::exitcode::DATAERR
    )]
    #[case(
        ApplicationError::Config { message: "bad".into() },
        crate::exitcode::CONFIG
    )]
    fn given_application_error_when_mapped_then_uses_sysexits(
        #[case] err: ApplicationError,
        #[case] code: i32,
    ) {
        assert_eq!(CliError::from(err).exit_code(), code);
    }

    #[test]
    fn given_usage_error_when_mapped_then_exits_with_usage() {
        assert_eq!(
            CliError::Usage("nothing to do".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
