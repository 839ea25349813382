use packsync_core::{BuildManifest, ModEntry};

use crate::error::SyncError;
use crate::ledger::Ledger;

/// Disjoint split of entry names between the ledger and a manifest.
///
/// `unchanged` and `to_install` follow manifest order; `obsolete` follows
/// ledger order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub unchanged: Vec<String>,
    pub to_install: Vec<ModEntry>,
    pub obsolete: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.to_install.is_empty() && self.obsolete.is_empty()
    }

    /// Completions the barrier waits for: one per manifest entry.
    pub fn expected_completions(&self) -> usize {
        self.unchanged.len() + self.to_install.len()
    }
}

pub fn plan_reconcile(ledger: &Ledger, manifest: &BuildManifest) -> Result<ReconcilePlan, SyncError> {
    if let Some(name) = manifest.duplicate_entry_name() {
        return Err(SyncError::DuplicateEntry {
            name: name.to_string(),
        });
    }

    let mut plan = ReconcilePlan::default();
    for entry in &manifest.entries {
        match ledger.entry(&entry.name) {
            Some(installed) if installed.same_version_as(entry) => {
                plan.unchanged.push(entry.name.clone())
            }
            _ => plan.to_install.push(entry.clone()),
        }
    }
    plan.obsolete = ledger
        .entries
        .keys()
        .filter(|name| manifest.entry(name).is_none())
        .cloned()
        .collect();
    Ok(plan)
}
