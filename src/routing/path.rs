//! Request path normalization.
//!
//! # Responsibilities
//! - Collapse runs of `/` into a single separator
//! - Strip one trailing separator
//! - Split a normalized path into segments
//!
//! # Design Decisions
//! - One linear pass, one allocation
//! - Total: every input has a normalized form, no error path
//! - `/` normalizes to the empty string (zero segments)

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// Reduce a raw path to its canonical form.
///
/// ```
/// use dispatch_router::routing::path::normalize;
///
/// assert_eq!(normalize("/a///b//c"), "/a/b/c");
/// assert_eq!(normalize("/test/"), "/test");
/// assert_eq!(normalize("/"), "");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for ch in path.chars() {
        if ch == SEPARATOR {
            if previous_was_separator {
                continue;
            }
            previous_was_separator = true;
        } else {
            previous_was_separator = false;
        }
        out.push(ch);
    }

    // After collapsing there is at most one trailing separator.
    if out.ends_with(SEPARATOR) {
        out.pop();
    }

    out
}

/// Split a normalized path into its segments.
///
/// A single leading separator is dropped so that `/a/b` yields `["a", "b"]`,
/// and the empty path yields no segments at all.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);
    let empty = trimmed.is_empty();
    trimmed.split(SEPARATOR).filter(move |_| !empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_repeated_separators() {
        assert_eq!(normalize("/a///b//c"), "/a/b/c");
        assert_eq!(normalize("//a"), "/a");
        assert_eq!(normalize("/a/////////b"), "/a/b");
    }

    #[test]
    fn test_strips_trailing_separator() {
        assert_eq!(normalize("/test/"), "/test");
        assert_eq!(normalize("/test////"), normalize("/test"));
        assert_eq!(normalize("/"), "");
        assert_eq!(normalize("///"), "");
    }

    #[test]
    fn test_leaves_clean_paths_alone() {
        assert_eq!(normalize("/foo/4/bar/22"), "/foo/4/bar/22");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("relative/path"), "relative/path");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "", "/", "//", "/a", "/a/", "/a//b///", "a//b", "/:id//x/", "////x////y////",
            "/ünïcode//ö/",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("/a/b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(segments("").count(), 0);
        assert_eq!(segments("a/b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(segments("/test").collect::<Vec<_>>(), vec!["test"]);
    }
}
