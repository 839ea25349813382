use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use packsync_installer::ArtifactCopy;
use packsync_solder::{DEFAULT_PLATFORM_API_URL, DEFAULT_SOLDER_URL};
use packsync_transport::{DEFAULT_MAX_CONNECTIONS, DEFAULT_STALL_TIMEOUT_SECS};
use serde::Deserialize;

pub(crate) const CONFIG_FILE_NAME: &str = "packsync.toml";

/// Optional `packsync.toml` in the working directory.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    #[serde(default = "config_file_version")]
    pub(crate) version: u32,
    pub(crate) solder: Option<String>,
    pub(crate) platform_api: Option<String>,
    #[serde(default)]
    pub(crate) artifact: ArtifactSection,
    pub(crate) max_connections: Option<usize>,
    pub(crate) stall_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct ArtifactSection {
    pub(crate) source: Option<String>,
    pub(crate) destination: Option<PathBuf>,
}

/// Values given on the command line or through the environment; these win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigOverrides {
    pub(crate) root: Option<PathBuf>,
    pub(crate) solder: Option<String>,
    pub(crate) platform_api: Option<String>,
    pub(crate) artifact_source: Option<String>,
    pub(crate) artifact_dest: Option<PathBuf>,
    pub(crate) max_connections: Option<usize>,
    pub(crate) stall_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) root: PathBuf,
    pub(crate) solder: String,
    pub(crate) platform_api: String,
    pub(crate) artifact: Option<ArtifactCopy>,
    pub(crate) max_connections: usize,
    pub(crate) stall_timeout: Duration,
}

pub(crate) fn config_file_version() -> u32 {
    1
}

pub(crate) fn parse_file_config(content: &str) -> Result<FileConfig> {
    let config: FileConfig =
        toml::from_str(content).context("failed parsing packsync config")?;
    let expected = config_file_version();
    if config.version != expected {
        anyhow::bail!(
            "unsupported config version {} (expected {}): update {CONFIG_FILE_NAME} to version {}",
            config.version,
            expected,
            expected
        );
    }
    Ok(config)
}

pub(crate) fn load_file_config(root: &Path) -> Result<FileConfig> {
    let path = root.join(CONFIG_FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    parse_file_config(&content).with_context(|| format!("invalid config {}", path.display()))
}

/// Merges overrides, file values and defaults into the settings of one run.
pub(crate) fn resolve_settings(overrides: ConfigOverrides, file: FileConfig) -> Result<Settings> {
    let root = overrides.root.unwrap_or_else(|| PathBuf::from("."));

    let max_connections = overrides
        .max_connections
        .or(file.max_connections)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);
    if max_connections == 0 {
        anyhow::bail!("max connections must be at least 1");
    }
    let stall_timeout_secs = overrides
        .stall_timeout_secs
        .or(file.stall_timeout_secs)
        .unwrap_or(DEFAULT_STALL_TIMEOUT_SECS);
    if stall_timeout_secs == 0 {
        anyhow::bail!("stall timeout must be at least 1 second");
    }

    let artifact_source = overrides.artifact_source.or(file.artifact.source);
    let artifact_dest = overrides.artifact_dest.or(file.artifact.destination);
    let artifact = ArtifactCopy::from_parts(
        artifact_source.map(|source| anchor_template(&root, &source)),
        artifact_dest.map(|dest| root.join(dest)),
    );

    Ok(Settings {
        solder: overrides
            .solder
            .or(file.solder)
            .unwrap_or_else(|| DEFAULT_SOLDER_URL.to_string()),
        platform_api: overrides
            .platform_api
            .or(file.platform_api)
            .unwrap_or_else(|| DEFAULT_PLATFORM_API_URL.to_string()),
        artifact,
        max_connections,
        stall_timeout: Duration::from_secs(stall_timeout_secs),
        root,
    })
}

// Relative artifact paths are relative to the working directory, like the
// tracked files.
fn anchor_template(root: &Path, template: &str) -> String {
    if template.trim().is_empty() || Path::new(template).is_absolute() {
        return template.to_string();
    }
    root.join(template).to_string_lossy().into_owned()
}
