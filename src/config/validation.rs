//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes, addresses)
//! - Detect conflicting routes before they reach the rule table
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::Pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("route '{route}' has an empty method")]
    EmptyMethod { route: String },

    #[error("route '{route}' pattern must start with '/': {pattern}")]
    RelativePattern { route: String, pattern: String },

    #[error("route '{route}' repeats pattern {pattern} of route '{first}'")]
    DuplicatePattern {
        route: String,
        first: String,
        pattern: String,
    },

    #[error("route '{route}' repeats capture name '{capture}'")]
    DuplicateCapture { route: String, capture: String },

    #[error("route '{route}' has invalid status code {status}")]
    InvalidStatus { route: String, status: u16 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    // normalized pattern -> first route name
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
        }

        if route.method.trim().is_empty() {
            errors.push(ValidationError::EmptyMethod {
                route: route.name.clone(),
            });
        }

        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::RelativePattern {
                route: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }

        let pattern = Pattern::parse(&route.pattern);
        if let Some(first) = seen.get(pattern.as_str()) {
            errors.push(ValidationError::DuplicatePattern {
                route: route.name.clone(),
                first: first.to_string(),
                pattern: pattern.to_string(),
            });
        } else {
            seen.insert(pattern.as_str().to_string(), &route.name);
        }

        let mut captures = HashSet::new();
        for name in pattern.capture_names() {
            if !captures.insert(name) {
                errors.push(ValidationError::DuplicateCapture {
                    route: route.name.clone(),
                    capture: name.to_string(),
                });
            }
        }

        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::InvalidStatus {
                route: route.name.clone(),
                status: route.status,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
