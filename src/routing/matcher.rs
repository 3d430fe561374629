//! Per-rule matching.
//!
//! # Responsibilities
//! - Compare request segments to pattern segments, in order
//! - Bind capture segments to request values
//! - Tell a path mismatch apart from a method mismatch
//!
//! # Design Decisions
//! - Segment counts must be equal; a longer pattern never matches
//! - Captures accept any value, no type or format checks
//! - Literal comparison is exact and case-sensitive
//! - Method equality is exact string equality

use crate::routing::params::PathParams;
use crate::routing::path::{normalize, segments};
use crate::routing::pattern::Segment;
use crate::routing::table::Rule;

/// Outcome of testing one rule against one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// Path and method matched.
    Matched(PathParams),
    /// The path did not fit the pattern.
    PathMismatch,
    /// The path fit the pattern but the method differs.
    MethodMismatch,
}

impl RuleMatch {
    pub fn is_matched(&self) -> bool {
        matches!(self, RuleMatch::Matched(_))
    }
}

/// Test a single rule against a raw request path and method.
pub fn match_rule<H>(request_path: &str, request_method: &str, rule: &Rule<H>) -> RuleMatch {
    let path = normalize(request_path);
    let request_segments: Vec<&str> = segments(&path).collect();
    match_segments(&request_segments, request_method, rule)
}

/// Test a single rule against an already normalized and split request path.
pub(crate) fn match_segments<H>(
    request_segments: &[&str],
    request_method: &str,
    rule: &Rule<H>,
) -> RuleMatch {
    let pattern_segments = rule.pattern().segments();
    if pattern_segments.len() != request_segments.len() {
        return RuleMatch::PathMismatch;
    }

    let mut params = PathParams::with_capacity(pattern_segments.len());
    for (pattern, value) in pattern_segments.iter().zip(request_segments) {
        match pattern {
            Segment::Capture(name) => params.insert(name.as_str(), *value),
            Segment::Literal(literal) => {
                if literal != value {
                    return RuleMatch::PathMismatch;
                }
            }
        }
    }

    if rule.method() != request_method {
        return RuleMatch::MethodMismatch;
    }

    RuleMatch::Matched(params)
}
