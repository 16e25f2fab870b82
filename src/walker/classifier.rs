//! Entry classification
//!
//! Decides, for one entry and the rules inherited from its parent, whether
//! to prune, skip, descend or emit. Directories get a chance to extend the
//! inherited rules with their own rule file first; the extension is a new
//! [`IgnoreRuleSet`] handed only to that directory's children.

use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

use super::entry::Entry;
use crate::config::WalkConfig;
use crate::error::RuleFileError;
use crate::rules::{IgnoreRuleSet, RuleFileLoader, StaticNamePattern};

/// Outcome of classifying one entry
#[derive(Debug, Clone)]
pub enum Verdict {
    /// Excluded directory: do not descend, do not emit
    Prune,

    /// Excluded non-directory
    Skip,

    /// Directory to list, with the rules its children inherit
    Descend(IgnoreRuleSet),

    /// File to emit
    Emit,
}

/// Applies the layered exclusion rules to entries
pub struct EntryClassifier {
    static_ignore: StaticNamePattern,
    match_pattern: Option<Regex>,
    use_scoped_ignore_files: bool,
    rule_file_name: String,
    loader: Arc<dyn RuleFileLoader>,
}

impl EntryClassifier {
    /// Build a classifier from a walk configuration
    pub fn new(config: &WalkConfig, loader: Arc<dyn RuleFileLoader>) -> Self {
        Self {
            static_ignore: config.static_ignore.clone(),
            match_pattern: config.match_pattern.clone(),
            use_scoped_ignore_files: config.use_scoped_ignore_files,
            rule_file_name: config.rule_file_name.clone(),
            loader,
        }
    }

    /// Rules for the children of `dir`
    ///
    /// Returns `inherited` unchanged unless scoped rule files are enabled,
    /// `dir` is a real directory and its rule file compiles.
    pub fn extend_context(&self, dir: &Entry, inherited: &IgnoreRuleSet) -> IgnoreRuleSet {
        if !self.use_scoped_ignore_files || !dir.is_listable() {
            return inherited.clone();
        }

        let rule_file = dir.path.join(&self.rule_file_name);
        match self.loader.load(&rule_file, &dir.path) {
            Ok(matcher) => {
                debug!(path = %rule_file.display(), "Loaded rule file");
                inherited.extended(matcher)
            }
            Err(RuleFileError::NotFound { .. }) => inherited.clone(),
            Err(e) => {
                warn!("{}; ignoring it", e);
                inherited.clone()
            }
        }
    }

    /// Classify `entry` under the rules inherited from its parent
    pub fn classify(&self, entry: &Entry, inherited: &IgnoreRuleSet) -> Verdict {
        let extended;
        let context = if entry.is_dir {
            extended = self.extend_context(entry, inherited);
            &extended
        } else {
            inherited
        };

        let excluded = self.static_ignore.is_match(&entry.name)
            || context.matches(&entry.path, entry.is_dir);

        match (excluded, entry.is_dir) {
            (true, true) => Verdict::Prune,
            (true, false) => Verdict::Skip,
            (false, true) => Verdict::Descend(context.clone()),
            (false, false) => Verdict::Emit,
        }
    }

    /// True if an emitted path passes the optional match filter
    pub fn wants(&self, display_path: &str) -> bool {
        self.match_pattern
            .as_ref()
            .map_or(true, |re| re.is_match(display_path))
    }
}
