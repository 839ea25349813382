use serde::{Deserialize, Serialize};

/// One installable archive within a build.
///
/// `version` is an opaque token: two entries are the same installation when
/// their tokens compare equal, nothing more is inferred from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModEntry {
    pub name: String,
    pub version: String,
    pub url: String,
    #[serde(alias = "md5")]
    pub checksum: String,
}

impl ModEntry {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
            checksum: checksum.into(),
        }
    }

    pub fn same_version_as(&self, other: &ModEntry) -> bool {
        self.version == other.version
    }
}
