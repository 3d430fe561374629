//! Errors raised while building or running the HTTP server.

use thiserror::Error;

use crate::routing::RegisterError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("route '{route}': {source}")]
    Register {
        route: String,
        #[source]
        source: RegisterError,
    },

    #[error("reloaded routes collide with a registered handler: {0}")]
    Reload(#[source] RegisterError),

    #[error("route '{route}' has invalid status code {status}")]
    InvalidStatus { route: String, status: u16 },
}
