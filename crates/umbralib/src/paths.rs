//! Path resolution helpers shared by the formatter and linter front ends.

use std::collections::BTreeSet;
use std::env;
use std::path::{Component, Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

/// Resolve the paths to process from the `stdin-filename` override and the
/// positional source arguments.
///
/// With `stdin_filename` set, the content arrives on standard input but is
/// reported and processed under the given name, so the result is that single
/// path. Otherwise every `src` entry becomes a path, with equal entries
/// collapsing to one. Argument validation guarantees the two inputs are
/// mutually exclusive before this is called; that contract is not
/// re-checked here. No path is canonicalized against the filesystem.
///
/// Returns the path set together with its common root directory.
pub fn resolve_paths(
    stdin_filename: Option<&str>,
    src: &[String],
) -> (BTreeSet<PathBuf>, PathBuf) {
    let paths: BTreeSet<PathBuf> = match stdin_filename {
        Some(name) => BTreeSet::from([PathBuf::from(name)]),
        None => src.iter().map(PathBuf::from).collect(),
    };
    let common_root = get_common_root(&paths);
    (paths, common_root)
}

/// Find the deepest directory which contains every path in `paths`.
///
/// Relative paths are interpreted against the current working directory and
/// folded lexically; symlinks are not resolved. When the common path exists
/// and is a regular file (a single-file input, say), its parent directory is
/// returned instead. An empty set yields the working directory.
pub fn get_common_root(paths: &BTreeSet<PathBuf>) -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut absolute = paths.iter().map(|path| normalize(&cwd.join(path)));
    let Some(mut root) = absolute.next() else {
        return cwd;
    };
    for path in absolute {
        while !path.starts_with(&root) {
            match root.parent() {
                Some(parent) => root = parent.to_path_buf(),
                None => break,
            }
        }
    }
    if root.is_file()
        && let Some(parent) = root.parent()
    {
        return parent.to_path_buf();
    }
    root
}

/// Find the directory to treat as the project root for the given sources.
///
/// Walks up from the common root of `srcs` and returns the first directory
/// carrying an `umbra.toml` file or a `.git` entry. Empty `srcs` stands for
/// the working directory. Without any marker the common root itself is
/// returned.
pub fn find_project_root(srcs: &[String]) -> PathBuf {
    let paths: BTreeSet<PathBuf> = if srcs.is_empty() {
        BTreeSet::from([PathBuf::from(".")])
    } else {
        srcs.iter().map(PathBuf::from).collect()
    };
    let start = get_common_root(&paths);
    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        if dir.join(CONFIG_FILE_NAME).is_file() || dir.join(".git").exists() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }
    start
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
