use std::path::PathBuf;

use packsync_core::ModEntry;
use packsync_security::{ChecksumAlgorithm, ChecksumHasher};
use packsync_transport::Transport;
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::extract::extract_archive;

/// Checksum mismatches tolerated before an entry fails; four fetches in total.
pub const MAX_CHECKSUM_RETRIES: u32 = 3;

/// Result of one entry's fetch, verify and extract.
#[derive(Debug)]
pub struct EntryOutcome {
    pub entry: ModEntry,
    pub result: Result<Vec<String>, SyncError>,
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Installs single entries into a working directory.
pub struct EntryInstaller<'a, T: ?Sized> {
    transport: &'a T,
    root: PathBuf,
    max_attempts: u32,
}

impl<'a, T> EntryInstaller<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T, root: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            root: root.into(),
            max_attempts: MAX_CHECKSUM_RETRIES + 1,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn install(&self, entry: ModEntry) -> EntryOutcome {
        let result = self.fetch_and_extract(&entry).await;
        EntryOutcome { entry, result }
    }

    async fn fetch_and_extract(&self, entry: &ModEntry) -> Result<Vec<String>, SyncError> {
        let Some(algorithm) = ChecksumAlgorithm::infer(&entry.checksum) else {
            return Err(SyncError::UnsupportedChecksum {
                entry: entry.name.clone(),
                checksum: entry.checksum.clone(),
            });
        };

        let payload = self.fetch_verified(entry, algorithm).await?;
        let root = self.root.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_archive(&root, &payload))
            .await
            .map_err(|err| SyncError::Extraction {
                entry: entry.name.clone(),
                reason: format!("extraction task failed: {err}"),
            })?;
        let paths = extracted.map_err(|err| SyncError::Extraction {
            entry: entry.name.clone(),
            reason: format!("{err:#}"),
        })?;
        debug!(entry = %entry.name, paths = paths.len(), "extracted archive");
        Ok(paths)
    }

    /// Fetches until the digest of the streamed body matches the entry.
    async fn fetch_verified(
        &self,
        entry: &ModEntry,
        algorithm: ChecksumAlgorithm,
    ) -> Result<Vec<u8>, SyncError> {
        let mut last_actual = String::new();
        for attempt in 1..=self.max_attempts {
            let mut hasher = ChecksumHasher::new(algorithm);
            let mut payload = Vec::new();
            self.transport
                .fetch_chunks(&entry.url, &mut |chunk: &[u8]| {
                    hasher.update(chunk);
                    payload.extend_from_slice(chunk);
                })
                .await
                .map_err(|source| SyncError::Transport {
                    entry: entry.name.clone(),
                    source,
                })?;

            let outcome = hasher.finish(&entry.checksum);
            if outcome.matched {
                debug!(
                    entry = %entry.name,
                    attempt,
                    algorithm = outcome.algorithm.as_str(),
                    "checksum verified"
                );
                return Ok(payload);
            }

            warn!(
                entry = %entry.name,
                url = %entry.url,
                attempt,
                max_attempts = self.max_attempts,
                expected = %entry.checksum,
                actual = %outcome.actual,
                "checksum mismatch"
            );
            last_actual = outcome.actual;
        }

        Err(SyncError::ChecksumExhausted {
            entry: entry.name.clone(),
            attempts: self.max_attempts,
            expected: entry.checksum.clone(),
            actual: last_actual,
        })
    }
}
