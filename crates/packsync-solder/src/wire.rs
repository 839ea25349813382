use packsync_core::ModEntry;
use serde::Deserialize;

/// `GET {solder}/modpack/{package}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct SolderPackageInfo {
    #[serde(default)]
    pub(crate) latest: Option<String>,
    #[serde(default)]
    pub(crate) recommended: Option<String>,
    #[serde(default)]
    pub(crate) builds: Vec<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// `GET {solder}/modpack/{package}/{build}?side=server`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct SolderBuild {
    #[serde(default)]
    pub(crate) minecraft: Option<String>,
    #[serde(default)]
    pub(crate) mods: Vec<ModEntry>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// `GET {platform}/modpack/{package}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct PlatformPackageInfo {
    #[serde(default)]
    pub(crate) solder: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}
