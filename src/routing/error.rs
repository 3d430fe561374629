//! Registration and dispatch outcomes that are not a successful match.

use axum::http::StatusCode;
use thiserror::Error;

/// Rejected registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// A rule already exists on this pattern, whatever its method.
    #[error("path already registered: {pattern}")]
    AlreadyRegistered { pattern: String },
}

/// Aggregate dispatch failure over the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No rule matched the request path.
    #[error("no handler found")]
    NoHandlerFound,

    /// At least one rule matched the path, none with the request method.
    #[error("path matched, method not allowed")]
    MethodNotAllowed,

    /// Anything unexpected while serving the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Transport status code for this outcome.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NoHandlerFound => StatusCode::NOT_FOUND,
            DispatchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DispatchError::NoHandlerFound.status_code().as_u16(), 404);
        assert_eq!(DispatchError::MethodNotAllowed.status_code().as_u16(), 405);
        assert_eq!(DispatchError::Internal("boom".into()).status_code().as_u16(), 500);
    }
}
