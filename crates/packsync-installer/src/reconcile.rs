use std::path::PathBuf;

use futures::stream::{FuturesUnordered, StreamExt};
use packsync_core::BuildManifest;
use packsync_transport::Transport;
use tracing::{debug, info};

use crate::artifact::ArtifactCopy;
use crate::barrier::CompletionBarrier;
use crate::error::SyncError;
use crate::layout::SyncLayout;
use crate::lock::RunLock;
use crate::planner::plan_reconcile;
use crate::progress::ProgressObserver;
use crate::state_store::StateStore;
use crate::tracked::remove_tracked_files;
use crate::worker::{EntryInstaller, MAX_CHECKSUM_RETRIES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub artifact: Option<ArtifactCopy>,
    /// Fetches per entry before a checksum mismatch becomes fatal.
    pub max_attempts: u32,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            artifact: None,
            max_attempts: MAX_CHECKSUM_RETRIES + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStatus {
    /// The ledger already recorded this package and build; nothing was touched.
    UpToDate,
    Converged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub status: ReconcileStatus,
    pub package_id: String,
    pub build_id: String,
    pub installed: Vec<String>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
    pub artifact: Option<PathBuf>,
}

/// Converges `layout`'s working directory to `manifest`.
///
/// The new ledger is committed only when every entry installed; on any
/// failure the previous state file stays authoritative.
pub async fn reconcile<T>(
    layout: &SyncLayout,
    transport: &T,
    manifest: &BuildManifest,
    options: &ReconcileOptions,
    observer: &dyn ProgressObserver,
) -> Result<ReconcileReport, SyncError>
where
    T: Transport + ?Sized,
{
    let _lock = RunLock::acquire(layout)?;
    let store = StateStore::new(layout.clone());
    let mut ledger = store.load()?;

    if ledger.is_converged_to(manifest) {
        info!(
            package = %manifest.package_id,
            build = %manifest.build_id,
            "already up to date"
        );
        let artifact = copy_artifact(
            options,
            &manifest.package_id,
            ledger.target_platform_version.as_deref(),
        )?;
        return Ok(ReconcileReport {
            status: ReconcileStatus::UpToDate,
            package_id: manifest.package_id.clone(),
            build_id: manifest.build_id.clone(),
            installed: Vec::new(),
            removed: Vec::new(),
            unchanged: ledger.entries.keys().cloned().collect(),
            artifact,
        });
    }

    if ledger.package_id.as_deref() != Some(manifest.package_id.as_str()) {
        info!(
            "switching from [{} / {}] to [{} / {}]",
            ledger.package_label(),
            ledger.build_label(),
            manifest.package_id,
            manifest.build_id
        );
    } else {
        info!(
            package = %manifest.package_id,
            "updating build from [{}] to [{}]",
            ledger.build_label(),
            manifest.build_id
        );
    }

    let plan = plan_reconcile(&ledger, manifest)?;
    debug!(
        unchanged = plan.unchanged.len(),
        install = plan.to_install.len(),
        obsolete = plan.obsolete.len(),
        "planned reconcile"
    );

    for name in &plan.obsolete {
        info!(entry = %name, "removing obsolete entry");
        let removal = remove_tracked_files(layout.root(), ledger.tracked_files(name))?;
        debug!(entry = %name, ?removal, "removed tracked files");
        ledger.forget_entry(name);
    }

    let installer =
        EntryInstaller::new(transport, layout.root()).with_max_attempts(options.max_attempts);
    let mut pending = FuturesUnordered::new();
    for entry in &plan.to_install {
        let previous = ledger
            .entry(&entry.name)
            .map(|installed| installed.version.as_str())
            .unwrap_or("N/A");
        info!(
            entry = %entry.name,
            "updating from version [{previous}] to [{}]",
            entry.version
        );
        remove_tracked_files(layout.root(), ledger.tracked_files(&entry.name))?;
        ledger.forget_tracked_files(&entry.name);
        pending.push(installer.install(entry.clone()));
    }

    observer.install_started(plan.to_install.len());
    let mut barrier = CompletionBarrier::new(ledger, plan.expected_completions());
    for name in &plan.unchanged {
        barrier.complete_unchanged(name);
    }
    while let Some(outcome) = pending.next().await {
        let succeeded = outcome.is_success();
        if succeeded {
            debug!(entry = %outcome.entry.name, version = %outcome.entry.version, "installed entry");
        }
        observer.entry_finished(&outcome.entry.name, succeeded);
        barrier.complete(outcome);
    }
    observer.install_finished();

    let committed = barrier.finish(manifest)?.commit(&store)?;
    info!(
        package = %manifest.package_id,
        build = %manifest.build_id,
        installed = plan.to_install.len(),
        removed = plan.obsolete.len(),
        "committed state"
    );

    let artifact = copy_artifact(
        options,
        &manifest.package_id,
        committed.target_platform_version.as_deref(),
    )?;
    Ok(ReconcileReport {
        status: ReconcileStatus::Converged,
        package_id: manifest.package_id.clone(),
        build_id: manifest.build_id.clone(),
        installed: plan
            .to_install
            .iter()
            .map(|entry| entry.name.clone())
            .collect(),
        removed: plan.obsolete,
        unchanged: plan.unchanged,
        artifact,
    })
}

fn copy_artifact(
    options: &ReconcileOptions,
    package_id: &str,
    platform_version: Option<&str>,
) -> Result<Option<PathBuf>, SyncError> {
    match &options.artifact {
        Some(artifact) => artifact.copy(package_id, platform_version),
        None => Ok(None),
    }
}
