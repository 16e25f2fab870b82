//! Path normalisation for input roots and emitted paths

use std::io::{self, Write};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::error::ConfigError;

/// Render a path with `/` separators
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(MAIN_SEPARATOR, "/")
    }
}

/// Write one emitted path and a newline
///
/// On unix the raw bytes are written, so names that are not UTF-8 still
/// name the file on disk.
#[cfg(unix)]
pub fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;

    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b"\n")
}

/// Write one emitted path and a newline, with `/` separators
#[cfg(not(unix))]
pub fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", to_slash(path))
}

/// Parse a user-supplied path that may use `/` separators
pub fn from_slash(s: &str) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        PathBuf::from(s)
    } else {
        PathBuf::from(s.replace('/', &MAIN_SEPARATOR.to_string()))
    }
}

/// Expand a leading `~` to `home`
pub fn expand_tilde(s: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return from_slash(s);
    };
    if s == "~" {
        return home.to_path_buf();
    }
    match s.strip_prefix("~/").or_else(|| s.strip_prefix("~\\")) {
        Some(rest) => home.join(from_slash(rest)),
        None => from_slash(s),
    }
}

/// Lexically clean a path: drop `.` components and fold `..` where possible
///
/// Never touches the filesystem, so symlinks are not resolved. An empty
/// result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Turn the raw root argument into the path the walk starts from
///
/// With `absolute`, the root is made absolute so every emitted path is too.
/// Otherwise relative roots are only cleaned, and emitted paths stay relative.
pub fn resolve_root(raw: &str, home: Option<&Path>, absolute: bool) -> Result<PathBuf, ConfigError> {
    let root = expand_tilde(raw, home);

    if absolute && !root.is_absolute() {
        let abs = std::path::absolute(&root).map_err(|e| ConfigError::InvalidRoot {
            path: root.clone(),
            reason: e.to_string(),
        })?;
        return Ok(clean(&abs));
    }

    Ok(clean(&root))
}
