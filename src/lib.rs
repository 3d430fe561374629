//! Request dispatch table for HTTP services.
//!
//! Holds an ordered set of `(method, pattern)` rules, each bound to a
//! handler, and decides for every request which handler runs and with which
//! path parameters.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{handler_fn, Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{DispatchError, PathParams, RegisterError, RuleTable};
