use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::SyncError;

pub const PLATFORM_VERSION_PLACEHOLDER: &str = "%MCVERSION%";

/// Copies a per-platform-version file (typically the server jar) next to the
/// converged mods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCopy {
    source_template: String,
    destination: PathBuf,
}

impl ArtifactCopy {
    pub fn new(source_template: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_template: source_template.into(),
            destination: destination.into(),
        }
    }

    /// Both halves must be configured for the copy to happen.
    pub fn from_parts(source_template: Option<String>, destination: Option<PathBuf>) -> Option<Self> {
        let source_template = source_template.filter(|source| !source.trim().is_empty())?;
        let destination = destination.filter(|dest| !dest.as_os_str().is_empty())?;
        Some(Self::new(source_template, destination))
    }

    pub fn source_for(&self, platform_version: &str) -> PathBuf {
        PathBuf::from(
            self.source_template
                .replace(PLATFORM_VERSION_PLACEHOLDER, platform_version),
        )
    }

    /// Returns the destination when something was copied.
    pub fn copy(
        &self,
        package_id: &str,
        platform_version: Option<&str>,
    ) -> Result<Option<PathBuf>, SyncError> {
        let source = match platform_version {
            Some(version) => self.source_for(version),
            None if self.source_template.contains(PLATFORM_VERSION_PLACEHOLDER) => {
                warn!(
                    package = package_id,
                    "no platform version recorded; skipping artifact copy"
                );
                return Ok(None);
            }
            None => PathBuf::from(&self.source_template),
        };

        if let Some(parent) = self.destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| SyncError::ArtifactCopy {
                    from: source.clone(),
                    to: self.destination.clone(),
                    source: err,
                })?;
            }
        }
        fs::copy(&source, &self.destination).map_err(|err| SyncError::ArtifactCopy {
            from: source.clone(),
            to: self.destination.clone(),
            source: err,
        })?;

        info!(
            package = package_id,
            from = %source.display(),
            to = %self.destination.display(),
            "copied platform artifact"
        );
        Ok(Some(self.destination.clone()))
    }
}
