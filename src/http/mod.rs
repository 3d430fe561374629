//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → dispatch.rs (resolve against the rule table)
//!     → handler.rs (handler runs with request + params)
//!       or response.rs (404 / 405 / 500)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::{table_from_routes, Dispatcher};
pub use error::ServerError;
pub use handler::{handler_fn, static_responder, BoxHandler, HandlerFuture};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
