use thiserror::Error;
use usedmart_error::web::WebError;

/// A business rule refused the requested change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The caller is not the party allowed to make this change.
    #[error("{0}")]
    Forbidden(String),
    /// The change is not valid from the current state.
    #[error("{0}")]
    Invalid(String),
    /// A configured limit was reached.
    #[error("{0}")]
    Limit(String),
    /// The marketplace is in maintenance mode.
    #[error("The marketplace is under maintenance, please try again later")]
    Maintenance,
}

impl From<RuleError> for WebError {
    fn from(e: RuleError) -> Self {
        match e {
            RuleError::Forbidden(msg) => WebError::Forbidden(msg),
            RuleError::Invalid(msg) | RuleError::Limit(msg) => WebError::BadRequest(msg),
            RuleError::Maintenance => WebError::Unavailable(RuleError::Maintenance.to_string()),
        }
    }
}

pub type RuleResult<T = ()> = Result<T, RuleError>;
