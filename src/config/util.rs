//! Config file discovery.

use std::path::{Path, PathBuf};

/// Look for `name` in `start` and then in each of its ancestors.
///
/// An absolute `name` is only checked for existence.
pub fn find_config_file(start: &Path, name: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
