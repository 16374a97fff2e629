//! Walk directories for MP3 files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::ScanError;

/// Every `.mp3` under `root`, recursively.
///
/// Symlinks are followed. A link back to one of its own ancestors is skipped
/// with a warning instead of being walked again.
pub fn scan_mp3s(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut out = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.loop_ancestor().is_some() => {
                log::warn!("skipping symlink loop: {e}");
                continue;
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                return Err(ScanError::ReadDir { path, source: e });
            }
        };

        if entry.file_type().is_file() && is_mp3(entry.path()) {
            out.push(entry.into_path());
        }
    }

    Ok(out)
}

pub(crate) fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

/// Identity used to spot the same file reached through different paths.
/// Paths that can't be resolved (not on disk) compare as given.
pub(crate) fn file_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
