//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup or on reload):
//!     (method, pattern, handler)
//!     → pattern.rs (normalize + split into literal/capture segments)
//!     → table.rs (duplicate-pattern check, append)
//!
//! Incoming Request (method, path)
//!     → path.rs (normalize once)
//!     → table.rs (walk rules in registration order)
//!     → matcher.rs (segment-by-segment comparison per rule)
//!     → Return: Resolved { rule, params } or DispatchError
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no logging, no metrics
//! - Deterministic: same table + same request = same outcome
//! - First match wins (registration order)
//! - 404 vs 405 decided over the whole table, not per rule

pub mod error;
pub mod matcher;
pub mod params;
pub mod path;
pub mod pattern;
pub mod table;

pub use error::{DispatchError, RegisterError};
pub use matcher::{match_rule, RuleMatch};
pub use params::PathParams;
pub use path::normalize;
pub use pattern::{Pattern, Segment};
pub use table::{Resolved, Rule, RuleTable};
