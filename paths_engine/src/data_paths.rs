use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::info;

/// Environment variable that overrides data root detection.
pub const DATA_DIR_ENV: &str = "PATHS_DATA_DIR";

/// Cached path to the directory holding `paths.toml`, stories and saves.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
    let root = detect_data_root(env::var_os(DATA_DIR_ENV).map(PathBuf::from));
    info!("data root: {}", root.display());
    root
});

pub fn data_root() -> &'static Path {
    &DATA_ROOT
}

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve the most likely location of the runtime data directory.
///
/// An explicit override is used as given, even if it does not exist yet.
fn detect_data_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    let mut candidates = vec![PathBuf::from("paths_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("paths_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    let platform = dirs::data_dir().map(|base| base.join("paths_engine"));
    candidates.extend(platform.clone());

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .or(platform)
        .unwrap_or_else(|| PathBuf::from("paths_engine/data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let root = detect_data_root(Some(PathBuf::from("/nonexistent/stories-root")));
        assert_eq!(root, PathBuf::from("/nonexistent/stories-root"));
    }
}
