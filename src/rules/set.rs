//! Persistent rule set and the static name pattern

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default static ignore pattern: version control metadata directories
pub const DEFAULT_IGNORE_PATTERN: &str = r"^(\.git|\.hg|\.svn|_darcs|\.bzr)$";

/// Something that can exclude a path
///
/// Implemented by compiled rule files; closures work too, which keeps tests
/// and alternative pattern engines simple.
pub trait IgnoreMatcher: Send + Sync {
    /// True if `path` is excluded by this matcher
    fn is_match(&self, path: &Path, is_dir: bool) -> bool;
}

impl<F> IgnoreMatcher for F
where
    F: Fn(&Path, bool) -> bool + Send + Sync,
{
    fn is_match(&self, path: &Path, is_dir: bool) -> bool {
        self(path, is_dir)
    }
}

struct Node {
    matcher: Arc<dyn IgnoreMatcher>,
    parent: Option<Arc<Node>>,
}

/// Immutable collection of matchers, OR-ed together
///
/// Extending returns a new set that shares the existing matchers; the
/// original value is never touched. Cloning is a reference count bump, so a
/// directory can hand the same set to every child thread.
#[derive(Clone, Default)]
pub struct IgnoreRuleSet {
    head: Option<Arc<Node>>,
    len: usize,
}

impl IgnoreRuleSet {
    /// Create an empty rule set (never matches)
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matchers in the set
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the set holds no matchers
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a new set holding every matcher of `self` plus `matcher`
    pub fn extended(&self, matcher: Arc<dyn IgnoreMatcher>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                matcher,
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// True iff any matcher in the set reports a match
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        self.iter().any(|m| m.is_match(path, is_dir))
    }

    /// Iterate matchers, most recently added first
    pub fn iter(&self) -> impl Iterator<Item = &dyn IgnoreMatcher> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
            .map(|node| node.matcher.as_ref())
    }
}

impl FromIterator<Arc<dyn IgnoreMatcher>> for IgnoreRuleSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn IgnoreMatcher>>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |set, matcher| set.extended(matcher))
    }
}

impl fmt::Debug for IgnoreRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRuleSet").field("len", &self.len).finish()
    }
}

/// Process-wide regex matched against bare entry names
#[derive(Debug, Clone)]
pub struct StaticNamePattern {
    regex: Regex,
}

impl StaticNamePattern {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// True if the entry name matches
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl Default for StaticNamePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_IGNORE_PATTERN).expect("Invalid default ignore pattern"),
        }
    }
}
