use anyhow::{Context, Result};
use packsync_core::{BuildManifest, BuildSelector};
use packsync_installer::{
    reconcile, ProgressObserver, ReconcileOptions, ReconcileReport, SyncLayout,
};
use packsync_solder::{locate_manifest, validate_package_id, SolderClient, SolderEndpoints};
use packsync_transport::{HttpTransport, Transport, TransportSettings};
use tracing::info;

use crate::config::Settings;

/// Fetches the requested build and converges the working directory to it.
pub(crate) async fn run_sync(
    package: &str,
    build: &str,
    settings: &Settings,
    observer: &dyn ProgressObserver,
) -> Result<ReconcileReport> {
    validate_package_id(package)?;
    let selector = BuildSelector::parse(build)?;

    let transport = HttpTransport::new(TransportSettings {
        max_connections: settings.max_connections,
        stall_timeout: settings.stall_timeout,
        ..TransportSettings::default()
    })
    .context("failed to initialize http transport")?;
    let client = SolderClient::new(
        transport,
        SolderEndpoints {
            default_solder: settings.solder.clone(),
            platform_api: settings.platform_api.clone(),
        },
    );

    let located = locate_manifest(&client, &settings.solder, package, &selector)
        .await
        .with_context(|| format!("failed to fetch build '{selector}' of '{package}'"))?;
    info!(
        package,
        build = %located.manifest.build_id,
        provider = %located.base_url,
        entries = located.manifest.entries.len(),
        "fetched build manifest"
    );

    sync_manifest(client.transport(), &located.manifest, settings, observer).await
}

pub(crate) async fn sync_manifest<T>(
    transport: &T,
    manifest: &BuildManifest,
    settings: &Settings,
    observer: &dyn ProgressObserver,
) -> Result<ReconcileReport>
where
    T: Transport + ?Sized,
{
    let layout = SyncLayout::new(&settings.root);
    let options = ReconcileOptions {
        artifact: settings.artifact.clone(),
        ..ReconcileOptions::default()
    };
    reconcile(&layout, transport, manifest, &options, observer)
        .await
        .with_context(|| {
            format!(
                "failed to sync '{}' to build '{}' in {}",
                manifest.package_id,
                manifest.build_id,
                settings.root.display()
            )
        })
}
