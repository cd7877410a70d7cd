//! Path expressions over value trees
//!
//! Controls address other branches of the form with small path expressions:
//!
//! - `""` or `"."`: the current branch
//! - `".."`: the parent branch
//! - `"../X"`: the sibling named `X` under the parent
//! - `"/X/Y"`: absolute, from the form root
//! - `"X/Y"`: descend from the current branch
//!
//! This module parses those expressions and resolves the descending part
//! against a nested value tree. Walking upward (parent segments, absolute
//! anchoring) needs knowledge of the live traversal and is the load walker's
//! job; the resolver here is a pure function over one tree.
//!
//! A segment that does not resolve is a configuration error (a control
//! referencing a branch that does not exist) and fails with a [`PathError`]
//! naming the missing branch and the path traversed so far. It is never
//! silently swallowed.

use std::fmt;

use crate::value::Value;

/// The separator between path segments.
pub const SEPARATOR: char = '/';

/// One segment of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A named branch.
    Name(String),
    /// The parent branch (`..`).
    Parent,
    /// The current branch (`.` or an empty segment).
    Current,
}

impl Segment {
    /// Parses a single segment.
    #[must_use]
    pub fn parse(segment: &str) -> Self {
        match segment {
            "" | "." => Self::Current,
            ".." => Self::Parent,
            name => Self::Name(name.to_string()),
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    absolute: bool,
    segments: Vec<Segment>,
}

impl PathExpr {
    /// Parses a path expression.
    ///
    /// A leading separator anchors the expression at the form root. Empty
    /// segments and `.` are kept as [`Segment::Current`] and are no-ops
    /// during resolution, so `".."` and `"../."` resolve identically.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let (absolute, rest) = match path.strip_prefix(SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        let segments = rest.split(SEPARATOR).map(Segment::parse).collect();

        Self { absolute, segments }
    }

    /// Returns whether the expression is anchored at the form root.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// A failed branch lookup while resolving a path expression.
///
/// Carries the missing branch name and the path traversed up to the point
/// of failure, so a misconfigured control can be located from the message
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    branch: String,
    traversed: String,
}

impl PathError {
    /// Creates a new lookup error.
    #[must_use]
    pub const fn new(branch: String, traversed: String) -> Self {
        Self { branch, traversed }
    }

    /// The branch name that did not resolve.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// The path traversed before the lookup failed.
    #[must_use]
    pub fn traversed(&self) -> &str {
        &self.traversed
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown branch `{}` under `{}`",
            self.branch, self.traversed
        )
    }
}

/// Appends a segment to an absolute traversed-path string.
#[must_use]
pub fn join(traversed: &str, segment: &str) -> String {
    if traversed.ends_with(SEPARATOR) {
        format!("{traversed}{segment}")
    } else {
        format!("{traversed}{SEPARATOR}{segment}")
    }
}

/// Resolves descending segments against a value tree.
///
/// `traversed` is the absolute path of `root` and is only used to report
/// failures. Parent segments cannot be resolved inside a plain value tree
/// and fail like any other missing branch.
///
/// # Errors
///
/// Returns a [`PathError`] naming the first segment that is absent from the
/// tree and the path accumulated so far.
pub fn resolve<'a>(
    root: &'a Value,
    segments: &[Segment],
    traversed: &str,
) -> Result<&'a Value, PathError> {
    let mut current = root;
    let mut traversed = traversed.to_string();

    for segment in segments {
        let name = match segment {
            Segment::Current => continue,
            Segment::Parent => "..",
            Segment::Name(name) => name.as_str(),
        };

        let entry = current.as_map().and_then(|map| map.get(name));

        match entry {
            Some(value) => {
                current = value;
                traversed = join(&traversed, name);
            }
            None => return Err(PathError::new(name.to_string(), traversed)),
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueMap;

    fn tree() -> Value {
        let mut inner = ValueMap::new();
        inner.insert("aaa".to_string(), Value::from("leaf"));

        let mut outer = ValueMap::new();
        outer.insert("aa".to_string(), Value::Map(inner));

        let mut root = ValueMap::new();
        root.insert("a".to_string(), Value::Map(outer));
        Value::Map(root)
    }

    #[test]
    fn parse_recognizes_anchoring_and_segments() {
        let expr = PathExpr::parse("/a/aa");
        assert!(expr.is_absolute());
        assert_eq!(
            expr.segments(),
            [
                Segment::Name("a".to_string()),
                Segment::Name("aa".to_string())
            ]
        );

        let expr = PathExpr::parse("../x");
        assert!(!expr.is_absolute());
        assert_eq!(
            expr.segments(),
            [Segment::Parent, Segment::Name("x".to_string())]
        );
    }

    #[test]
    fn lone_parent_matches_parent_then_current() {
        assert_eq!(
            PathExpr::parse("..").segments(),
            [Segment::Parent]
        );
        assert_eq!(
            PathExpr::parse("../.").segments(),
            [Segment::Parent, Segment::Current]
        );
    }

    #[test]
    fn resolve_descends_named_branches() {
        let tree = tree();
        let segments = PathExpr::parse("a/aa/aaa");

        let value = resolve(&tree, segments.segments(), "/").expect("path should resolve");
        assert_eq!(value, &Value::from("leaf"));
    }

    #[test]
    fn resolve_ignores_current_segments() {
        let tree = tree();
        let segments = PathExpr::parse("a/./aa");

        let value = resolve(&tree, segments.segments(), "/").expect("path should resolve");
        assert!(value.as_map().is_some());
    }

    #[test]
    fn resolve_reports_missing_branch_and_traversed_path() {
        let tree = tree();
        let segments = PathExpr::parse("a/zz/aaa");

        let error = resolve(&tree, segments.segments(), "/")
            .expect_err("missing branch should not resolve");
        assert_eq!(error.branch(), "zz");
        assert_eq!(error.traversed(), "/a");
        assert_eq!(error.to_string(), "unknown branch `zz` under `/a`");
    }

    #[test]
    fn resolve_rejects_parent_inside_tree() {
        let tree = tree();
        let segments = PathExpr::parse("a/../a");

        let error = resolve(&tree, segments.segments(), "/")
            .expect_err("parent segments should not resolve inside a value tree");
        assert_eq!(error.branch(), "..");
    }
}
