use async_trait::async_trait;
use packsync_core::{BuildManifest, BuildSelector};
use packsync_transport::{fetch_json, Transport, TransportError};
use tracing::debug;

use crate::error::SourceError;
use crate::urls::{
    build_manifest_url, normalize_base_url, package_info_url, platform_package_url,
    DEFAULT_PLATFORM_API_URL, DEFAULT_SOLDER_URL,
};
use crate::wire::{PlatformPackageInfo, SolderBuild, SolderPackageInfo};

/// Where build manifests come from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Base URL of the manifest provider that publishes `package_id`.
    async fn resolve_manifest_location(&self, package_id: &str) -> Result<String, SourceError>;

    /// Resolves `selector` to a concrete build and returns its manifest.
    async fn fetch_manifest(
        &self,
        base_url: &str,
        package_id: &str,
        selector: &BuildSelector,
    ) -> Result<BuildManifest, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolderEndpoints {
    pub default_solder: String,
    pub platform_api: String,
}

impl Default for SolderEndpoints {
    fn default() -> Self {
        Self {
            default_solder: DEFAULT_SOLDER_URL.to_string(),
            platform_api: DEFAULT_PLATFORM_API_URL.to_string(),
        }
    }
}

/// Solder API client; the platform API is only consulted to find a
/// package's own Solder instance.
#[derive(Debug, Clone)]
pub struct SolderClient<T> {
    transport: T,
    endpoints: SolderEndpoints,
}

impl<T: Transport> SolderClient<T> {
    pub fn new(transport: T, endpoints: SolderEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &SolderEndpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn fetch_package_info(
        &self,
        base_url: &str,
        package_id: &str,
    ) -> Result<SolderPackageInfo, SourceError> {
        let url = package_info_url(base_url, package_id);
        let info: SolderPackageInfo = fetch_json(&self.transport, &url)
            .await
            .map_err(|err| provider_rejection(err, base_url, package_id))?;
        if let Some(message) = info.error {
            return Err(manifest_error(base_url, package_id, message));
        }
        Ok(info)
    }
}

#[async_trait]
impl<T: Transport> ManifestSource for SolderClient<T> {
    async fn resolve_manifest_location(&self, package_id: &str) -> Result<String, SourceError> {
        let url = platform_package_url(&self.endpoints.platform_api, package_id);
        let info: PlatformPackageInfo =
            fetch_json(&self.transport, &url)
                .await
                .map_err(|err| match err {
                    TransportError::Status { status: 404, .. } => SourceError::Resolution {
                        package_id: package_id.to_string(),
                        reason: "package is not published on the platform".to_string(),
                    },
                    other => SourceError::Transport(other),
                })?;

        if let Some(message) = info.error {
            return Err(SourceError::Resolution {
                package_id: package_id.to_string(),
                reason: message,
            });
        }

        match info.solder.filter(|solder| !solder.trim().is_empty()) {
            Some(solder) => Ok(normalize_base_url(&solder)),
            None => Err(SourceError::Resolution {
                package_id: package_id.to_string(),
                reason: "Could not find solder".to_string(),
            }),
        }
    }

    async fn fetch_manifest(
        &self,
        base_url: &str,
        package_id: &str,
        selector: &BuildSelector,
    ) -> Result<BuildManifest, SourceError> {
        let info = self.fetch_package_info(base_url, package_id).await?;
        let build_id = resolve_build_id(&info, selector)
            .map_err(|message| manifest_error(base_url, package_id, message))?;
        debug!(package = package_id, %selector, build = %build_id, "resolved build");

        let url = build_manifest_url(base_url, package_id, &build_id);
        let build: SolderBuild = fetch_json(&self.transport, &url)
            .await
            .map_err(|err| provider_rejection(err, base_url, package_id))?;
        if let Some(message) = build.error {
            return Err(manifest_error(base_url, package_id, message));
        }

        let manifest = BuildManifest::new(
            package_id,
            build_id,
            build.minecraft.unwrap_or_default(),
            build.mods,
        );
        manifest
            .validate_entries()
            .map_err(|err| manifest_error(base_url, package_id, format!("{err:#}")))?;
        Ok(manifest)
    }
}

fn resolve_build_id(info: &SolderPackageInfo, selector: &BuildSelector) -> Result<String, String> {
    let resolved = match selector {
        BuildSelector::Latest => info.latest.clone(),
        BuildSelector::Recommended => info.recommended.clone(),
        BuildSelector::Build(build) => {
            if !info.builds.is_empty() && !info.builds.iter().any(|known| known == build) {
                return Err(format!("build '{build}' is not published"));
            }
            Some(build.clone())
        }
    };

    resolved
        .filter(|build| !build.trim().is_empty())
        .ok_or_else(|| format!("package has no {selector} build"))
}

fn manifest_error(base_url: &str, package_id: &str, message: impl Into<String>) -> SourceError {
    SourceError::Manifest {
        base_url: normalize_base_url(base_url),
        package_id: package_id.to_string(),
        message: message.into(),
    }
}

// Solder answers unknown packages and builds with 404; that is a provider
// verdict, not a transport failure.
fn provider_rejection(err: TransportError, base_url: &str, package_id: &str) -> SourceError {
    match err {
        TransportError::Status { status: 404, url } => {
            manifest_error(base_url, package_id, format!("not found: {url}"))
        }
        other => SourceError::Transport(other),
    }
}
