use packsync_core::{BuildManifest, BuildSelector};
use tracing::{info, warn};

use crate::client::ManifestSource;
use crate::error::SourceError;
use crate::urls::normalize_base_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedManifest {
    pub base_url: String,
    pub manifest: BuildManifest,
}

/// Fetches a manifest from `default_base`, falling back to the package's own
/// provider when the default one does not know the package.
///
/// Transport failures are returned as-is; only a provider rejection triggers
/// the fallback lookup.
pub async fn locate_manifest<S>(
    source: &S,
    default_base: &str,
    package_id: &str,
    selector: &BuildSelector,
) -> Result<LocatedManifest, SourceError>
where
    S: ManifestSource + ?Sized,
{
    let default_base = normalize_base_url(default_base);
    let rejection = match source
        .fetch_manifest(&default_base, package_id, selector)
        .await
    {
        Ok(manifest) => {
            return Ok(LocatedManifest {
                base_url: default_base,
                manifest,
            })
        }
        Err(err @ SourceError::Manifest { .. }) => err,
        Err(err) => return Err(err),
    };

    warn!(
        package = package_id,
        provider = %default_base,
        "default provider rejected package ({rejection}); resolving its own provider"
    );

    let resolved_base = source.resolve_manifest_location(package_id).await?;
    if resolved_base == default_base {
        return Err(rejection);
    }

    info!(package = package_id, provider = %resolved_base, "using resolved provider");
    let manifest = source
        .fetch_manifest(&resolved_base, package_id, selector)
        .await?;
    Ok(LocatedManifest {
        base_url: resolved_base,
        manifest,
    })
}
