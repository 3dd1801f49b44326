//! The CLI-side error taxonomy.
//!
//! Every failure a command can raise collapses into one of four
//! classes: an API error from the client (kept verbatim), a locally
//! raised operational error, a usage error, or an unexpected catch-all.
//! The class determines the machine code in the failure envelope and
//! the process exit code; both mappings happen exactly once, in `main`.

use thiserror::Error;
use voluum_api::{ApiError, ClientBuildError};
use voluum_types::{ErrorBody, codes};
use voluum_util::reports::QueryParseError;
use voluum_util::session::SessionError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local validation/precondition failure (invalid date, missing
    /// token, malformed JSON input).
    #[error("{0}")]
    Operational(String),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CommandError {
    pub fn operational(message: impl Into<String>) -> Self {
        CommandError::Operational(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        CommandError::Usage(message.into())
    }

    /// The serializable record placed in the failure envelope.
    pub fn error_body(&self) -> ErrorBody {
        match self {
            CommandError::Api(error) => error.to_error_body(),
            CommandError::Operational(message) => ErrorBody {
                message: message.clone(),
                code: Some(codes::OPERATIONAL_ERROR.to_string()),
                status: None,
                details: None,
            },
            CommandError::Usage(message) => ErrorBody {
                message: message.clone(),
                code: Some(codes::USAGE_ERROR.to_string()),
                status: None,
                details: None,
            },
            CommandError::Unexpected(error) => ErrorBody {
                message: error.to_string(),
                code: Some(codes::UNEXPECTED.to_string()),
                status: None,
                details: None,
            },
        }
    }

    /// Unclassified failures exit 2; everything classified exits 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Unexpected(_) => 2,
            _ => 1,
        }
    }
}

impl From<ClientBuildError> for CommandError {
    fn from(error: ClientBuildError) -> Self {
        CommandError::Operational(error.to_string())
    }
}

impl From<SessionError> for CommandError {
    fn from(error: SessionError) -> Self {
        CommandError::Operational(error.to_string())
    }
}

impl From<QueryParseError> for CommandError {
    fn from(error: QueryParseError) -> Self {
        CommandError::Operational(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn api_errors_keep_their_own_fields() {
        let api = ApiError::http(404, json!({"code": "NOT_FOUND"}));
        let error = CommandError::from(api);

        let body = error.error_body();
        assert_eq!(body.code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(body.status, Some(404));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn operational_and_usage_errors_carry_reserved_codes() {
        let operational = CommandError::operational("bad date");
        assert_eq!(operational.error_body().code.as_deref(), Some("OPERATIONAL_ERROR"));
        assert_eq!(operational.exit_code(), 1);

        let usage = CommandError::usage("unknown option");
        assert_eq!(usage.error_body().code.as_deref(), Some("USAGE_ERROR"));
        assert_eq!(usage.exit_code(), 1);
    }

    #[test]
    fn unexpected_errors_exit_with_two() {
        let error = CommandError::from(anyhow::anyhow!("something odd"));
        assert_eq!(error.error_body().code.as_deref(), Some("UNEXPECTED"));
        assert_eq!(error.error_body().message, "something odd");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn query_parse_errors_become_operational() {
        let error = CommandError::from(QueryParseError::InvalidPair("groupBy".to_string()));
        let body = error.error_body();
        assert_eq!(body.code.as_deref(), Some("OPERATIONAL_ERROR"));
        assert!(body.message.contains("groupBy"));
    }
}
