use std::fs;
use std::io;

use tracing::debug;

use crate::error::SyncError;
use crate::fs_utils::write_atomically;
use crate::layout::SyncLayout;
use crate::ledger::{Ledger, LEDGER_VERSION};

/// Loads and atomically replaces the ledger file.
#[derive(Debug, Clone)]
pub struct StateStore {
    layout: SyncLayout,
}

impl StateStore {
    pub fn new(layout: SyncLayout) -> Self {
        Self { layout }
    }

    /// A missing or empty file is an empty ledger.
    pub fn load(&self) -> Result<Ledger, SyncError> {
        let path = self.layout.state_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Ledger::default()),
            Err(err) => return Err(SyncError::io("read state file", path, err)),
        };
        if raw.trim().is_empty() {
            return Ok(Ledger::default());
        }

        let ledger: Ledger = serde_json::from_str(&raw).map_err(|err| SyncError::State {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        if ledger.version > LEDGER_VERSION {
            return Err(SyncError::State {
                path,
                reason: format!(
                    "state file version {} is newer than supported version {LEDGER_VERSION}",
                    ledger.version
                ),
            });
        }
        debug!(
            path = %path.display(),
            package = ledger.package_label(),
            build = ledger.build_label(),
            entries = ledger.entries.len(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Replaces the state file so readers see either the old or the new ledger.
    pub fn commit(&self, ledger: &Ledger) -> Result<(), SyncError> {
        let path = self.layout.state_path();
        let mut bytes = serde_json::to_vec_pretty(ledger).map_err(|err| SyncError::State {
            path: path.clone(),
            reason: format!("failed to encode ledger: {err}"),
        })?;
        bytes.push(b'\n');

        let tmp = self.layout.state_tmp_path();
        write_atomically(&tmp, &path, &bytes)
            .map_err(|err| SyncError::io("write state file", &path, err))?;
        debug!(path = %path.display(), "committed ledger");
        Ok(())
    }
}
