use packsync_transport::TransportError;

/// Why a build manifest could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No manifest provider is published for the package.
    #[error("could not resolve a manifest source for '{package_id}': {reason}")]
    Resolution { package_id: String, reason: String },

    /// The provider answered, but with an error instead of a manifest.
    #[error("manifest provider {base_url} rejected '{package_id}': {message}")]
    Manifest {
        base_url: String,
        package_id: String,
        message: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}
