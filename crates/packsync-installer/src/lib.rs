//! Converges a working directory to a build manifest.
//!
//! [`reconcile`] is the entry point: it loads the [`Ledger`], plans the diff,
//! removes what is obsolete, installs what changed through concurrent
//! [`EntryInstaller`]s and commits the new ledger once every entry reported.

mod artifact;
mod barrier;
mod error;
mod extract;
mod fs_utils;
mod layout;
mod ledger;
mod lock;
mod planner;
mod progress;
mod reconcile;
mod state_store;
mod tracked;
mod worker;

pub use artifact::{ArtifactCopy, PLATFORM_VERSION_PLACEHOLDER};
pub use barrier::{CompletionBarrier, PendingCommit};
pub use error::SyncError;
pub use extract::extract_archive;
pub use layout::{safe_relative_path, SyncLayout, LOCK_FILE_NAME, STATE_FILE_NAME};
pub use ledger::{Ledger, LEDGER_VERSION};
pub use lock::RunLock;
pub use planner::{plan_reconcile, ReconcilePlan};
pub use progress::{NoopProgress, ProgressObserver};
pub use reconcile::{reconcile, ReconcileOptions, ReconcileReport, ReconcileStatus};
pub use state_store::StateStore;
pub use tracked::{remove_tracked_files, RemovalReport};
pub use worker::{EntryInstaller, EntryOutcome, MAX_CHECKSUM_RETRIES};
