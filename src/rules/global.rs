//! Global ignore file discovery
//!
//! Git users can name a personal ignore file through `core.excludesfile`.
//! Only its base name is used; the file is looked up in the home directory.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use super::rule_file::RuleFileLoader;
use super::set::IgnoreRuleSet;

/// Current user's home directory
pub fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Ask git for `core.excludesfile`
///
/// Returns `None` when git is not installed, the key is unset, or the
/// output is empty.
pub fn git_excludes_file() -> Option<String> {
    let mut command = Command::new("git");
    command.args(["config", "--get", "core.excludesfile"]);
    excludes_file_from(command)
}

/// Run a prepared `git config --get` query and read its value
fn excludes_file_from(mut command: Command) -> Option<String> {
    let output = command.output().ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Resolve the global ignore file from a home directory and an excludes-file setting
///
/// At most one file: `home` joined with the base name of `excludes_file`.
pub fn global_ignore_file(home: &Path, excludes_file: Option<String>) -> Option<PathBuf> {
    let excludes_file = excludes_file?;
    let name = Path::new(excludes_file.trim()).file_name()?;
    Some(home.join(name))
}

/// Seed rule set for the walk root
///
/// Empty unless a global ignore file is found and compiles.
pub fn load_global_rules(
    root: &Path,
    home: Option<&Path>,
    excludes_file: Option<String>,
    loader: &dyn RuleFileLoader,
) -> IgnoreRuleSet {
    let Some(file) = home.and_then(|h| global_ignore_file(h, excludes_file)) else {
        return IgnoreRuleSet::new();
    };

    match loader.load(&file, root) {
        Ok(matcher) => {
            debug!(path = %file.display(), "Loaded global ignore file");
            IgnoreRuleSet::new().extended(matcher)
        }
        Err(e) => {
            debug!("Global ignore file unavailable: {}", e);
            IgnoreRuleSet::new()
        }
    }
}
