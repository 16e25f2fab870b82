//! Ignore rules
//!
//! Three layers decide whether an entry is excluded:
//! - a static name pattern, one regex matched against bare entry names
//! - scoped rule files (`.gitignore`), compiled when their directory is visited
//! - an optional global rule file, located once before the walk starts
//!
//! Scoped and global matchers live in an [`IgnoreRuleSet`], a persistent list
//! that is extended by value so concurrent sibling traversals never observe
//! each other's rules.

pub mod global;
pub mod rule_file;
pub mod set;

pub use global::{git_excludes_file, global_ignore_file, home_dir, load_global_rules};
pub use rule_file::{GitignoreLoader, RuleFileLoader, ScopedGitignore};
pub use set::{IgnoreMatcher, IgnoreRuleSet, StaticNamePattern, DEFAULT_IGNORE_PATTERN};
