//! Rule file compilation
//!
//! The walker does not parse gitignore syntax itself. A [`RuleFileLoader`]
//! turns a rule file into an [`IgnoreMatcher`] scoped to a directory; the
//! default loader delegates to the `ignore` crate.

use ::ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;
use std::sync::Arc;

use super::set::IgnoreMatcher;
use crate::error::RuleFileError;

/// Compiles rule files into matchers
pub trait RuleFileLoader: Send + Sync {
    /// Compile `rule_file`, scoping its patterns to `root`
    ///
    /// Missing and malformed files are reported as errors; callers treat
    /// both as "no additional rules".
    fn load(&self, rule_file: &Path, root: &Path) -> Result<Arc<dyn IgnoreMatcher>, RuleFileError>;
}

/// gitignore-syntax loader backed by `ignore::gitignore`
#[derive(Debug, Default, Clone, Copy)]
pub struct GitignoreLoader;

impl RuleFileLoader for GitignoreLoader {
    fn load(&self, rule_file: &Path, root: &Path) -> Result<Arc<dyn IgnoreMatcher>, RuleFileError> {
        Ok(Arc::new(ScopedGitignore::from_file(rule_file, root)?))
    }
}

/// Compiled gitignore file, scoped to the directory it applies to
#[derive(Debug, Clone)]
pub struct ScopedGitignore {
    inner: Gitignore,
}

impl ScopedGitignore {
    /// Parse `rule_file` with patterns relative to `root`
    pub fn from_file(rule_file: &Path, root: &Path) -> Result<Self, RuleFileError> {
        if !rule_file.is_file() {
            return Err(RuleFileError::NotFound {
                path: rule_file.to_path_buf(),
            });
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(rule_file) {
            return Err(RuleFileError::Parse {
                path: rule_file.to_path_buf(),
                reason: err.to_string(),
            });
        }

        let inner = builder.build().map_err(|e| RuleFileError::Parse {
            path: rule_file.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self { inner })
    }

    /// Build from in-memory lines (used for tests and programmatic rules)
    pub fn from_lines<'a>(
        root: &Path,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, RuleFileError> {
        let mut builder = GitignoreBuilder::new(root);
        for line in lines {
            builder.add_line(None, line).map_err(|e| RuleFileError::Parse {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        let inner = builder.build().map_err(|e| RuleFileError::Parse {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { inner })
    }

    /// Number of ignore (non-whitelist) globs
    pub fn num_ignores(&self) -> u64 {
        self.inner.num_ignores()
    }
}

impl IgnoreMatcher for ScopedGitignore {
    fn is_match(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}
