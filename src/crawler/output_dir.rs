//! Output root preparation

use std::io::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};

/// Ensures `path` exists as an empty directory
///
/// An existing directory is removed together with everything in it and
/// then recreated. A path that exists but is not a directory (a regular
/// file or a symlink) is left untouched and reported as an error, as is
/// any path rejected by [`check_clearable`].
pub fn prepare_output_dir(path: &Path) -> std::io::Result<()> {
    check_clearable(path)?;

    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            tracing::info!("Clearing existing output directory {}", path.display());
            std::fs::remove_dir_all(path)?;
        }
        Ok(_) => {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", path.display()),
            ));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    std::fs::create_dir_all(path)
}

/// Checks that `path` may be wiped recursively
///
/// The last component must be a plain directory name (not `.`, `..` or a
/// root), and the path must not resolve to the current directory or one
/// of its ancestors.
pub fn check_clearable(path: &Path) -> std::io::Result<()> {
    if !matches!(path.components().next_back(), Some(Component::Normal(_))) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("'{}' does not name a directory of its own", path.display()),
        ));
    }

    let cwd = std::env::current_dir()?;
    if cwd.starts_with(resolve_lexically(&cwd, path)) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "'{}' contains the current directory {}",
                path.display(),
                cwd.display()
            ),
        ));
    }

    Ok(())
}

/// Makes `path` absolute against `cwd`, folding `.` and `..` without touching the filesystem
fn resolve_lexically(cwd: &Path, path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
