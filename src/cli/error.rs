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

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Exit code for a failed run. Argument errors that clap rejects never
    /// get here; everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        crate::exitcode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_token_when_displayed_then_message_is_unwrapped() {
        let err: CliError = ApplicationError::MissingToken.into();
        assert!(err.to_string().starts_with("no access token configured"));
        assert_eq!(err.exit_code(), crate::exitcode::FAILURE);
    }

    #[test]
    fn given_domain_error_when_converted_then_displays_domain_message() {
        let err: CliError = DomainError::NoRecipients.into();
        assert_eq!(err.to_string(), DomainError::NoRecipients.to_string());
    }
}
