use packsync_core::BuildManifest;
use tracing::{error, warn};

use crate::error::SyncError;
use crate::ledger::Ledger;
use crate::state_store::StateStore;
use crate::worker::EntryOutcome;

/// Counts entry completions for one run and folds successful installs into
/// the in-memory ledger.
///
/// Only the coordinating task touches the barrier, so completions are plain
/// `&mut self` calls.
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: usize,
    failed: Vec<String>,
    ledger: Ledger,
}

impl CompletionBarrier {
    pub fn new(ledger: Ledger, expected: usize) -> Self {
        Self {
            remaining: expected,
            failed: Vec::new(),
            ledger,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Accounts for an entry that needed no work.
    pub fn complete_unchanged(&mut self, name: &str) {
        self.count_down(name);
    }

    pub fn complete(&mut self, outcome: EntryOutcome) {
        self.count_down(&outcome.entry.name);
        match outcome.result {
            Ok(paths) => self.ledger.record_install(&outcome.entry, paths),
            Err(err) => {
                error!(entry = %outcome.entry.name, "{err}");
                self.failed.push(outcome.entry.name);
            }
        }
    }

    fn count_down(&mut self, name: &str) {
        match self.remaining.checked_sub(1) {
            Some(remaining) => self.remaining = remaining,
            None => warn!(entry = name, "completion reported past the expected total"),
        }
    }

    /// Closes the batch. The ledger is only handed out for commit when every
    /// expected completion arrived and none failed.
    pub fn finish(self, manifest: &BuildManifest) -> Result<PendingCommit, SyncError> {
        if self.remaining > 0 {
            return Err(SyncError::IncompleteBatch {
                remaining: self.remaining,
            });
        }
        if !self.failed.is_empty() {
            return Err(SyncError::AggregateFailure {
                failed: self.failed,
            });
        }

        let mut ledger = self.ledger;
        ledger.converge_to(manifest);
        Ok(PendingCommit { ledger })
    }
}

/// A converged ledger that has not been written yet. Committing consumes it.
#[derive(Debug)]
pub struct PendingCommit {
    ledger: Ledger,
}

impl PendingCommit {
    pub fn commit(self, store: &StateStore) -> Result<Ledger, SyncError> {
        store.commit(&self.ledger)?;
        Ok(self.ledger)
    }
}
