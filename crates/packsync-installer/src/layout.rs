use std::path::{Component, Path, PathBuf};

pub const STATE_FILE_NAME: &str = ".mod_status.json";
pub const LOCK_FILE_NAME: &str = ".packsync.lock";

/// Paths inside the working directory a run converges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
    root: PathBuf,
}

impl SyncLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE_NAME)
    }

    pub fn state_tmp_path(&self) -> PathBuf {
        self.root
            .join(format!("{STATE_FILE_NAME}.{}.tmp", std::process::id()))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE_NAME)
    }

    /// Absolute location of a tracked path, or `None` when it would escape
    /// the root.
    pub fn resolve_tracked(&self, tracked: &str) -> Option<PathBuf> {
        safe_relative_path(tracked).map(|relative| self.root.join(relative))
    }
}

/// Normalizes a `/`-separated relative path, rejecting anything absolute or
/// containing `..`.
pub fn safe_relative_path(path: &str) -> Option<PathBuf> {
    if path.contains('\0') {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    let mut normalized = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if normalized.as_os_str().is_empty() {
        return None;
    }
    Some(normalized)
}
