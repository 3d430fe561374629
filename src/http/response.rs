//! Response mapping for dispatch failures.
//!
//! # Design Decisions
//! - Failures carry a status code and an empty body
//! - The success path writes nothing here; the handler owns the response

use axum::response::{IntoResponse, Response};

use crate::routing::DispatchError;

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}
