//! Errors of the submission controller
//!
//! Two of the taxonomy's four classes surface as `Err` values here:
//! configuration errors (unknown transport method, unrecognized handler
//! name, dangling branch references) and the request-integrity error. Both
//! are fatal to the current request and not recoverable. Validation
//! failures are data, not errors: they travel in the invalid tree. Data-shape
//! anomalies are normalized away during loading.

use std::fmt;

use formwork_value::path::PathError;

/// A fatal error while processing a form request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The configured transport method is not recognized.
    UnknownMethod(String),
    /// The submission named a handler the form does not register.
    UnknownHandler(String),
    /// A control referenced a branch that does not exist.
    Path(PathError),
    /// The submitted request token does not match the session secret.
    TokenMismatch,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMethod(method) => {
                write!(f, "unknown transport method `{method}`")
            }
            Self::UnknownHandler(handler) => {
                write!(f, "unrecognized submission handler `{handler}`")
            }
            Self::Path(error) => write!(f, "{error}"),
            Self::TokenMismatch => {
                write!(f, "the submitted request token does not match the session")
            }
        }
    }
}

impl From<PathError> for FormError {
    fn from(error: PathError) -> Self {
        Self::Path(error)
    }
}
