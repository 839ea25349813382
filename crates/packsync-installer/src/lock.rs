use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::SyncError;
use crate::fs_utils::remove_file_if_exists;
use crate::layout::SyncLayout;

/// Exclusive claim on a working directory, released on drop.
///
/// A lock left behind by a process that no longer exists is reclaimed.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(layout: &SyncLayout) -> Result<Self, SyncError> {
        let root = layout.root();
        fs::create_dir_all(root).map_err(|err| SyncError::io("create", root, err))?;

        let path = layout.lock_path();
        let mut file = match create_lock_file(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                let holder = read_holder(&path);
                match holder {
                    Some(pid) if !process_is_running(pid) => {
                        warn!(path = %path.display(), pid, "reclaiming stale lock");
                        remove_file_if_exists(&path)
                            .map_err(|err| SyncError::io("remove stale lock file", &path, err))?;
                        create_lock_file(&path)
                            .map_err(|err| lock_error(&path, holder, err))?
                    }
                    _ => return Err(locked(path, holder)),
                }
            }
            Err(err) => return Err(SyncError::io("create lock file", path, err)),
        };

        let lock = Self { path };
        file.write_all(format!("{}\n", std::process::id()).as_bytes())
            .map_err(|err| SyncError::io("write lock file", &lock.path, err))?;
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = remove_file_if_exists(&self.path) {
            warn!(path = %self.path.display(), "failed to release lock: {err}");
        }
    }
}

fn create_lock_file(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
}

fn read_holder(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn locked(path: PathBuf, holder: Option<u32>) -> SyncError {
    SyncError::Locked {
        path,
        holder: holder
            .map(|pid| format!("pid {pid}"))
            .unwrap_or_else(|| "unknown holder".to_string()),
    }
}

// Another run won the race for the reclaimed lock.
fn lock_error(path: &Path, holder: Option<u32>, err: io::Error) -> SyncError {
    if err.kind() == io::ErrorKind::AlreadyExists {
        locked(path.to_path_buf(), read_holder(path).or(holder))
    } else {
        SyncError::io("create lock file", path, err)
    }
}

/// Whether `pid` names a live process. Answers `true` where that cannot be
/// determined, so a lock is only reclaimed when its holder is known gone.
#[cfg(target_os = "linux")]
fn process_is_running(pid: u32) -> bool {
    let proc_root = Path::new("/proc");
    if !proc_root.join("self").exists() {
        return true;
    }
    proc_root.join(pid.to_string()).exists()
}

#[cfg(not(target_os = "linux"))]
fn process_is_running(_pid: u32) -> bool {
    true
}
