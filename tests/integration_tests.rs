//! Integration tests for files
//!
//! Every test builds a real directory tree in a temp dir and walks it.

use files::config::{MaxResults, WalkConfig};
use files::display::to_slash;
use files::rules::{GitignoreLoader, IgnoreRuleSet, StaticNamePattern};
use files::{ConcurrentWalker, WalkerError};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn tree(files: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for file in files {
        let path = dir.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, file.as_bytes()).unwrap();
    }
    dir
}

fn walk(config: WalkConfig) -> (BTreeSet<String>, Result<files::WalkStats, WalkerError>) {
    let root = config.root.clone();
    let (paths, result) = ConcurrentWalker::new(config).collect();
    (relative(&root, &paths), result)
}

fn relative(root: &Path, paths: &[PathBuf]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| to_slash(p.strip_prefix(root).unwrap_or(p)))
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_default_pattern_prunes_git() {
    let dir = tree(&["a.txt", ".git/config", "sub/b.txt"]);
    let (paths, result) = walk(WalkConfig::new(dir.path()));

    result.unwrap();
    assert_eq!(paths, set(&["a.txt", "sub/b.txt"]));
}

#[test]
fn test_pruned_subtree_is_never_visited() {
    // Children of a pruned directory never appear, even if they would match nothing
    let dir = tree(&["keep.txt", "_darcs/inner/plain.txt", ".svn/x", "nested/.hg/y"]);
    let (paths, result) = walk(WalkConfig::new(dir.path()));

    let stats = result.unwrap();
    assert_eq!(paths, set(&["keep.txt"]));
    assert_eq!(stats.pruned, 3);
}

#[test]
fn test_custom_static_pattern_matches_names_only() {
    let dir = tree(&["src/main.rs", "target/debug/out", "docs/target.md"]);
    let config = WalkConfig::new(dir.path())
        .with_static_ignore(StaticNamePattern::new(r"^target$").unwrap());
    let (paths, result) = walk(config);

    result.unwrap();
    assert_eq!(paths, set(&["src/main.rs", "docs/target.md"]));
}

#[test]
fn test_scoped_gitignore_applies_to_subtree() {
    let dir = tree(&["sub/x.log", "sub/y.txt", "sub/deep/z.log", "top.log", "other/w.log"]);
    fs::write(dir.path().join("sub/.gitignore"), "*.log\n").unwrap();

    let config = WalkConfig::new(dir.path()).with_scoped_ignore_files(true);
    let (paths, result) = walk(config);

    result.unwrap();
    assert_eq!(
        paths,
        set(&["sub/.gitignore", "sub/y.txt", "top.log", "other/w.log"])
    );
}

#[test]
fn test_sibling_rules_do_not_leak() {
    let dir = tree(&["a/one.tmp", "a/one.bak", "b/two.tmp", "b/two.bak"]);
    fs::write(dir.path().join("a/.gitignore"), "*.tmp\n").unwrap();
    fs::write(dir.path().join("b/.gitignore"), "*.bak\n").unwrap();

    let config = WalkConfig::new(dir.path()).with_scoped_ignore_files(true);
    let (paths, result) = walk(config);

    result.unwrap();
    assert_eq!(
        paths,
        set(&["a/.gitignore", "a/one.bak", "b/.gitignore", "b/two.tmp"])
    );
}

#[test]
fn test_scoped_gitignore_prunes_directories() {
    let dir = tree(&["keep.txt", "build/out.o", "src/build/gen.rs", "src/lib.rs"]);
    fs::write(dir.path().join(".gitignore"), "build/\n").unwrap();

    let config = WalkConfig::new(dir.path()).with_scoped_ignore_files(true);
    let (paths, result) = walk(config);

    result.unwrap();
    assert_eq!(paths, set(&[".gitignore", "keep.txt", "src/lib.rs"]));
}

#[test]
fn test_gitignore_disabled_by_default() {
    let dir = tree(&["x.log", "y.txt"]);
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();

    let (paths, result) = walk(WalkConfig::new(dir.path()));

    result.unwrap();
    assert_eq!(paths, set(&[".gitignore", "x.log", "y.txt"]));
}

#[test]
fn test_malformed_gitignore_is_ignored() {
    let dir = tree(&["x.log", "y.txt"]);
    fs::write(dir.path().join(".gitignore"), "*.log\nbad[\n").unwrap();

    let config = WalkConfig::new(dir.path()).with_scoped_ignore_files(true);
    let (paths, result) = walk(config);

    result.unwrap();
    assert_eq!(paths, set(&[".gitignore", "x.log", "y.txt"]));
}

#[test]
fn test_seed_rules_apply_everywhere() {
    let dir = tree(&["a.swp", "sub/b.swp", "sub/c.rs"]);
    let global = dir.path().join("global-ignore");
    fs::write(&global, "*.swp\n").unwrap();

    let seed = IgnoreRuleSet::new().extended(
        files::rules::RuleFileLoader::load(&GitignoreLoader, &global, dir.path()).unwrap(),
    );
    let walker = ConcurrentWalker::new(WalkConfig::new(dir.path())).with_seed_rules(seed);

    let (paths, result) = walker.collect();
    result.unwrap();

    assert_eq!(relative(dir.path(), &paths), set(&["global-ignore", "sub/c.rs"]));
}

#[test]
fn test_max_results_overflow() {
    let dir = tree(&["1", "2", "3", "4", "5"]);
    let config = WalkConfig::new(dir.path()).with_max_results(MaxResults::Limit(2));
    let (paths, result) = walk(config);

    let err = result.unwrap_err();
    assert!(err.is_overflow());
    assert!(paths.len() <= 2);
}

#[test]
fn test_max_results_never_exceeded_under_concurrency() {
    let names: Vec<String> = (0..40)
        .flat_map(|d| (0..10).map(move |f| format!("d{}/f{}", d, f)))
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let dir = tree(&refs);

    for limit in [1u64, 7, 100, 399] {
        let config = WalkConfig::new(dir.path()).with_max_results(MaxResults::Limit(limit));
        let (paths, result) = walk(config);
        assert!(result.unwrap_err().is_overflow());
        assert!(paths.len() as u64 <= limit, "limit {} exceeded", limit);
    }
}

#[test]
fn test_max_results_at_exact_count_succeeds() {
    let dir = tree(&["1", "2", "3"]);
    let config = WalkConfig::new(dir.path()).with_max_results(MaxResults::Limit(3));
    let (paths, result) = walk(config);

    assert_eq!(result.unwrap().files, 3);
    assert_eq!(paths.len(), 3);
}

#[test]
fn test_unbounded_emits_everything() {
    let names: Vec<String> = (0..500).map(|i| format!("d{}/f{}", i % 17, i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let dir = tree(&refs);

    let (paths, result) = walk(WalkConfig::new(dir.path()));
    assert_eq!(result.unwrap().files, 500);
    assert_eq!(paths.len(), 500);
}

#[test]
fn test_repeated_walks_yield_same_set() {
    let names: Vec<String> = (0..200)
        .map(|i| format!("l1_{}/l2_{}/f{}", i % 5, i % 13, i))
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let dir = tree(&refs);

    let (first, r1) = walk(WalkConfig::new(dir.path()));
    let (second, r2) = walk(WalkConfig::new(dir.path()).with_concurrency(1));
    let (third, r3) = walk(WalkConfig::new(dir.path()).with_concurrency(64));

    r1.unwrap();
    r2.unwrap();
    r3.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn test_deep_tree_with_small_pool() {
    let deep: String = (0..60).map(|i| format!("d{}/", i)).collect::<String>() + "leaf.txt";
    let dir = tree(&[deep.as_str(), "top.txt"]);

    let config = WalkConfig::new(dir.path()).with_concurrency(2);
    let (paths, result) = walk(config);

    let stats = result.unwrap();
    assert_eq!(paths, set(&[deep.as_str(), "top.txt"]));
    assert_eq!(stats.dirs, 61);
}

#[test]
fn test_match_filter() {
    let dir = tree(&["src/lib.rs", "src/main.rs", "README.md"]);
    let config = WalkConfig::new(dir.path())
        .with_match_pattern(Some(regex::Regex::new(r"\.rs$").unwrap()));
    let (paths, result) = walk(config);

    let stats = result.unwrap();
    assert_eq!(paths, set(&["src/lib.rs", "src/main.rs"]));
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_empty_root() {
    let dir = tempdir().unwrap();
    let (paths, result) = walk(WalkConfig::new(dir.path()));
    assert!(paths.is_empty());
    assert_eq!(result.unwrap().files, 0);
}

#[test]
fn test_root_not_directory() {
    let dir = tree(&["file.txt"]);
    let (paths, result) = walk(WalkConfig::new(dir.path().join("file.txt")));
    assert!(paths.is_empty());
    assert!(matches!(result, Err(WalkerError::RootNotDirectory { .. })));
}

#[cfg(unix)]
#[test]
fn test_relative_root() {
    let dir = tree(&["sub/a.txt"]);
    let cwd = std::env::current_dir().unwrap();
    let rel = pathdiff(dir.path(), &cwd);

    let (paths, result) = ConcurrentWalker::new(WalkConfig::new(&rel)).collect();
    result.unwrap();
    assert_eq!(paths, vec![rel.join("sub").join("a.txt")]);
}

#[cfg(unix)]
/// Relative path from `base` to `path` via `..` components
fn pathdiff(path: &Path, base: &Path) -> PathBuf {
    let ups = base.components().count().saturating_sub(1);
    let mut rel = PathBuf::new();
    for _ in 0..ups {
        rel.push("..");
    }
    rel.join(path.strip_prefix("/").unwrap_or(path))
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_are_emitted_unchanged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let name = OsStr::from_bytes(b"bad\xff.txt");
    // Some filesystems only accept UTF-8 names
    if fs::write(dir.path().join(name), b"x").is_err() {
        return;
    }

    let (paths, result) = ConcurrentWalker::new(WalkConfig::new(dir.path())).collect();

    result.unwrap();
    assert_eq!(paths, vec![dir.path().join(name)]);
    assert!(paths[0].exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_emitted_not_descended() {
    let dir = tree(&["real/inner.txt"]);
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
    // A cycle back to the root must not hang the walk
    std::os::unix::fs::symlink(dir.path(), dir.path().join("real/loop")).unwrap();

    let (paths, result) = walk(WalkConfig::new(dir.path()));

    result.unwrap();
    assert_eq!(paths, set(&["link", "real/inner.txt", "real/loop"]));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_terminal_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tree(&["ok/a.txt", "locked/b.txt", "z.txt"]);
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores permissions; nothing to check then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (paths, result) = walk(WalkConfig::new(dir.path()));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // Everything readable is still delivered before the error is reported
    assert_eq!(paths, set(&["ok/a.txt", "z.txt"]));
    match result {
        Err(WalkerError::ReadDir { path, .. }) => assert_eq!(path, locked),
        other => panic!("expected ReadDir error, got {:?}", other),
    }
}
