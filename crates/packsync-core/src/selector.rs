use std::fmt;

use anyhow::anyhow;

/// Which build of a package to converge to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSelector {
    Latest,
    Recommended,
    Build(String),
}

impl BuildSelector {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("build selector must not be empty"));
        }
        if trimmed.contains('/') {
            return Err(anyhow!(
                "build selector must not contain '/': {trimmed}"
            ));
        }

        Ok(match trimmed {
            "latest" => Self::Latest,
            "recommended" => Self::Recommended,
            literal => Self::Build(literal.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => "latest",
            Self::Recommended => "recommended",
            Self::Build(build) => build,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Self::Build(_))
    }
}

impl fmt::Display for BuildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
