use std::collections::BTreeMap;

use packsync_core::{BuildManifest, ModEntry};
use serde::{Deserialize, Deserializer, Serialize};

pub const LEDGER_VERSION: u32 = 1;

// Older state files spell "nothing installed yet" as "N/A".
const LEGACY_UNSET: &str = "N/A";

/// Persisted record of what the last committed run installed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    #[serde(default = "ledger_version")]
    pub version: u32,
    #[serde(default, alias = "modpack", deserialize_with = "unset_as_none")]
    pub package_id: Option<String>,
    #[serde(default, alias = "build", deserialize_with = "unset_as_none")]
    pub build_id: Option<String>,
    #[serde(
        default,
        alias = "mcversion",
        deserialize_with = "unset_as_none"
    )]
    pub target_platform_version: Option<String>,
    #[serde(default, alias = "buildInfo")]
    pub entries: BTreeMap<String, ModEntry>,
    #[serde(default, alias = "trackedFiles")]
    pub tracked_files: BTreeMap<String, Vec<String>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION,
            package_id: None,
            build_id: None,
            target_platform_version: None,
            entries: BTreeMap::new(),
            tracked_files: BTreeMap::new(),
        }
    }
}

impl Ledger {
    /// True when the last committed run installed exactly this package and build.
    pub fn is_converged_to(&self, manifest: &BuildManifest) -> bool {
        self.package_id.as_deref() == Some(manifest.package_id.as_str())
            && self.build_id.as_deref() == Some(manifest.build_id.as_str())
    }

    pub fn entry(&self, name: &str) -> Option<&ModEntry> {
        self.entries.get(name)
    }

    pub fn tracked_files(&self, name: &str) -> &[String] {
        self.tracked_files
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn forget_entry(&mut self, name: &str) {
        self.entries.remove(name);
        self.tracked_files.remove(name);
    }

    pub fn forget_tracked_files(&mut self, name: &str) {
        self.tracked_files.remove(name);
    }

    pub fn record_install(&mut self, entry: &ModEntry, paths: Vec<String>) {
        self.tracked_files.insert(entry.name.clone(), paths);
    }

    /// Adopts the manifest's identity and entry table. Tracked files are left
    /// as recorded by the installs of this run.
    pub fn converge_to(&mut self, manifest: &BuildManifest) {
        self.version = LEDGER_VERSION;
        self.package_id = Some(manifest.package_id.clone());
        self.build_id = Some(manifest.build_id.clone());
        self.target_platform_version = Some(manifest.target_platform_version.clone())
            .filter(|version| !version.is_empty());
        self.entries = manifest
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.clone()))
            .collect();
    }

    pub fn package_label(&self) -> &str {
        self.package_id.as_deref().unwrap_or(LEGACY_UNSET)
    }

    pub fn build_label(&self) -> &str {
        self.build_id.as_deref().unwrap_or(LEGACY_UNSET)
    }
}

fn ledger_version() -> u32 {
    LEDGER_VERSION
}

fn unset_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.is_empty() && value != LEGACY_UNSET))
}
