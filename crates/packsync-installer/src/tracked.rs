use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SyncError;
use crate::layout::safe_relative_path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub files_removed: usize,
    pub dirs_removed: usize,
    pub dirs_kept: usize,
}

/// Deletes the paths an entry recorded when it was installed.
///
/// Files go first. Directories are removed afterwards, deepest first and in
/// reverse recording order among equals; a directory that still holds other
/// content is kept without error. Paths that no longer exist are skipped.
pub fn remove_tracked_files(root: &Path, tracked: &[String]) -> Result<RemovalReport, SyncError> {
    let mut report = RemovalReport::default();
    let mut dirs: Vec<(usize, PathBuf)> = Vec::new();

    for (index, recorded) in tracked.iter().enumerate() {
        let Some(relative) = safe_relative_path(recorded) else {
            warn!(path = %recorded, "skipping tracked path outside the working directory");
            continue;
        };
        let path = root.join(&relative);
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(SyncError::io("inspect", path, err)),
        };

        if metadata.is_dir() {
            dirs.push((index, relative));
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => report.files_removed += 1,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(SyncError::io("remove", path, err)),
        }
    }

    dirs.sort_by(|(left_index, left), (right_index, right)| {
        right
            .components()
            .count()
            .cmp(&left.components().count())
            .then(right_index.cmp(left_index))
    });
    for (_, relative) in dirs {
        let path = root.join(&relative);
        match fs::remove_dir(&path) {
            Ok(()) => report.dirs_removed += 1,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                report.dirs_kept += 1;
                if is_not_empty(&path) {
                    debug!(path = %path.display(), "keeping directory that still has content");
                } else {
                    warn!(path = %path.display(), "failed to remove directory: {err}");
                }
            }
        }
    }

    Ok(report)
}

fn is_not_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
