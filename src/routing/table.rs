//! Rule table: registration and resolution.
//!
//! # Responsibilities
//! - Store rules in registration order
//! - Reject a second rule on an already registered pattern
//! - Resolve a request to the first matching rule
//!
//! # Design Decisions
//! - Append-only; rules are never removed or mutated
//! - Pattern identity (not method + pattern) is the uniqueness key
//! - First registered rule wins; no other precedence
//! - Generic over the handler so the table knows nothing about transports

use crate::routing::error::{DispatchError, RegisterError};
use crate::routing::matcher::{match_segments, RuleMatch};
use crate::routing::params::PathParams;
use crate::routing::path::{normalize, segments};
use crate::routing::pattern::Pattern;

/// A registered (method, pattern, handler) triple.
#[derive(Debug, Clone)]
pub struct Rule<H> {
    method: String,
    pattern: Pattern,
    handler: H,
}

impl<H> Rule<H> {
    pub fn new(method: impl Into<String>, pattern: &str, handler: H) -> Self {
        Self {
            method: method.into(),
            pattern: Pattern::parse(pattern),
            handler,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Winning rule for a request, with its captured parameters.
#[derive(Debug)]
pub struct Resolved<'a, H> {
    pub rule: &'a Rule<H>,
    pub params: PathParams,
}

impl<'a, H> Resolved<'a, H> {
    pub fn handler(&self) -> &'a H {
        self.rule.handler()
    }
}

/// Ordered, append-only collection of rules.
#[derive(Debug, Clone)]
pub struct RuleTable<H> {
    rules: Vec<Rule<H>>,
}

impl<H> Default for RuleTable<H> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<H> RuleTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` on `pattern`.
    ///
    /// Fails without touching the table when a rule already exists on the
    /// same canonical pattern, even under another method.
    pub fn register(
        &mut self,
        method: impl Into<String>,
        pattern: &str,
        handler: H,
    ) -> Result<(), RegisterError> {
        self.insert(Rule::new(method, pattern, handler))
    }

    /// Append an already built rule, with the same duplicate check as
    /// [`RuleTable::register`].
    pub fn insert(&mut self, rule: Rule<H>) -> Result<(), RegisterError> {
        if self.contains_pattern(rule.pattern().as_str()) {
            return Err(RegisterError::AlreadyRegistered {
                pattern: rule.pattern().to_string(),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// True if a rule is registered on the given pattern.
    pub fn contains(&self, pattern: &str) -> bool {
        self.contains_pattern(Pattern::parse(pattern).as_str())
    }

    fn contains_pattern(&self, canonical: &str) -> bool {
        self.rules.iter().any(|r| r.pattern().as_str() == canonical)
    }

    /// Find the rule for a request.
    ///
    /// The path is normalized once, then rules are tried in registration
    /// order. The first full match wins. Without one, a method mismatch on
    /// any rule beats a plain miss.
    pub fn resolve(&self, path: &str, method: &str) -> Result<Resolved<'_, H>, DispatchError> {
        let normalized = normalize(path);
        let request_segments: Vec<&str> = segments(&normalized).collect();

        let mut path_matched = false;
        for rule in &self.rules {
            match match_segments(&request_segments, method, rule) {
                RuleMatch::Matched(params) => return Ok(Resolved { rule, params }),
                RuleMatch::MethodMismatch => path_matched = true,
                RuleMatch::PathMismatch => {}
            }
        }

        if path_matched {
            Err(DispatchError::MethodNotAllowed)
        } else {
            Err(DispatchError::NoHandlerFound)
        }
    }

    pub fn rules(&self) -> &[Rule<H>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
