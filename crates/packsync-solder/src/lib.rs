mod client;
mod error;
mod locate;
mod urls;
mod wire;

pub use client::{ManifestSource, SolderClient, SolderEndpoints};
pub use error::SourceError;
pub use locate::{locate_manifest, LocatedManifest};
pub use urls::{
    build_manifest_url, normalize_base_url, package_info_url, platform_package_url,
    validate_package_id, DEFAULT_PLATFORM_API_URL, DEFAULT_SOLDER_URL,
};
