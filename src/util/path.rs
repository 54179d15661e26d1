use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a user supplied path.
///
/// Returns the input unchanged when a variable is undefined or the path is
/// not valid UTF-8.
pub fn expand_path(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    shellexpand::full(raw)
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}
