use std::collections::HashSet;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::entry::ModEntry;

/// Desired state for one build of a package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildManifest {
    pub package_id: String,
    pub build_id: String,
    pub target_platform_version: String,
    #[serde(default)]
    pub entries: Vec<ModEntry>,
}

impl BuildManifest {
    pub fn new(
        package_id: impl Into<String>,
        build_id: impl Into<String>,
        target_platform_version: impl Into<String>,
        entries: Vec<ModEntry>,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            build_id: build_id.into(),
            target_platform_version: target_platform_version.into(),
            entries,
        }
    }

    /// First entry name that appears more than once, in manifest order.
    pub fn duplicate_entry_name(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .map(|entry| entry.name.as_str())
            .find(|name| !seen.insert(*name))
    }

    pub fn entry(&self, name: &str) -> Option<&ModEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn validate_entries(&self) -> anyhow::Result<()> {
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(anyhow!(
                    "build '{}' of '{}' contains an entry without a name",
                    self.build_id,
                    self.package_id
                ));
            }
            if entry.url.trim().is_empty() {
                return Err(anyhow!(
                    "entry '{}' in build '{}' has no download url",
                    entry.name,
                    self.build_id
                ));
            }
            if entry.checksum.trim().is_empty() {
                return Err(anyhow!(
                    "entry '{}' in build '{}' has no checksum",
                    entry.name,
                    self.build_id
                ));
            }
        }
        Ok(())
    }
}
