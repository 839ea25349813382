use std::collections::HashSet;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use zip::ZipArchive;

use crate::layout::safe_relative_path;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// Unpacks a zip payload under `root` and returns every path it wrote, in
/// archive order, as `/`-separated paths relative to `root`.
///
/// Directories named by the archive are recorded too; parents that only
/// exist implicitly are created but not recorded.
pub fn extract_archive(root: &Path, payload: &[u8]) -> Result<Vec<String>> {
    let mut archive =
        ZipArchive::new(Cursor::new(payload)).context("payload is not a zip archive")?;
    let mut written: Vec<String> = Vec::with_capacity(archive.len());
    let mut seen = HashSet::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .with_context(|| format!("failed to read archive member #{index}"))?;
        let name = file.name().to_string();
        let relative = safe_relative_path(&name)
            .ok_or_else(|| anyhow!("archive member '{name}' escapes the working directory"))?;
        let dest = root.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("failed to create {}", dest.display()))?;
            set_mode(&dest, DIR_MODE)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let mut out = fs::File::create(&dest)
                .with_context(|| format!("failed to create {}", dest.display()))?;
            io::copy(&mut file, &mut out)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            set_mode(&dest, FILE_MODE)?;
        }

        let tracked = tracked_name(&relative);
        if seen.insert(tracked.clone()) {
            written.push(tracked);
        }
    }

    Ok(written)
}

fn tracked_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
