//! Route pattern parsing.
//!
//! Pattern syntax: `/`-separated segments. A segment starting with `:` is a
//! named capture (the name is the rest of the segment); anything else must
//! match the request segment literally, case-sensitively.

use std::fmt;

use crate::routing::path::{normalize, segments, SEPARATOR};

/// Marks a capture segment.
pub const CAPTURE_PREFIX: char = ':';

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Capture(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(CAPTURE_PREFIX) {
            Some(name) => Segment::Capture(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }
}

/// A normalized, pre-split route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Normalize and split a pattern string. Parsing never fails.
    ///
    /// The source is kept in canonical form: normalized, and rooted with a
    /// leading `/` unless empty. `test` and `/test` share one source.
    pub fn parse(raw: &str) -> Self {
        let mut source = normalize(raw);
        if !source.is_empty() && !source.starts_with(SEPARATOR) {
            source.insert(0, SEPARATOR);
        }
        let segments = segments(&source).map(Segment::parse).collect();
        Self { source, segments }
    }

    /// The canonical pattern string. Two patterns are the same route iff
    /// their sources are equal.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capture names in segment order, repeats included.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_segments() {
        let pattern = Pattern::parse("/foo/:first/bar/:second");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("foo".into()),
                Segment::Capture("first".into()),
                Segment::Literal("bar".into()),
                Segment::Capture("second".into()),
            ]
        );
        assert_eq!(pattern.capture_names().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_parse_normalizes_source() {
        assert_eq!(Pattern::parse("/test/").as_str(), "/test");
        assert_eq!(Pattern::parse("//a//b").as_str(), "/a/b");
        assert!(Pattern::parse("/").segments().is_empty());
        assert_eq!(Pattern::parse("/").to_string(), "/");
    }

    #[test]
    fn test_relative_pattern_is_rooted() {
        let relative = Pattern::parse("test/:id");
        assert_eq!(relative.as_str(), "/test/:id");
        assert_eq!(relative, Pattern::parse("/test/:id"));
        assert_eq!(Pattern::parse("").as_str(), "");
    }
}
