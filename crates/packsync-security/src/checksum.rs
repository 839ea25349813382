use md5::Md5;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha256,
}

impl ChecksumAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Picks the algorithm from the shape of an expected hex digest.
    pub fn infer(expected: &str) -> Option<Self> {
        let trimmed = expected.trim();
        if !trimmed.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        match trimmed.len() {
            32 => Some(Self::Md5),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Incremental digest over a byte stream.
pub enum ChecksumHasher {
    Md5(Md5),
    Sha256(Sha256),
}

impl ChecksumHasher {
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Md5 => Self::Md5(Md5::new()),
            ChecksumAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(chunk),
            Self::Sha256(hasher) => hasher.update(chunk),
        }
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        match self {
            Self::Md5(_) => ChecksumAlgorithm::Md5,
            Self::Sha256(_) => ChecksumAlgorithm::Sha256,
        }
    }

    pub fn finalize_hex(self) -> String {
        match self {
            Self::Md5(hasher) => hex::encode(hasher.finalize()),
            Self::Sha256(hasher) => hex::encode(hasher.finalize()),
        }
    }

    /// Finishes the digest and compares it with `expected`, ignoring case.
    pub fn finish(self, expected: &str) -> ChecksumOutcome {
        let algorithm = self.algorithm();
        let actual = self.finalize_hex();
        let matched = actual.eq_ignore_ascii_case(expected.trim());
        ChecksumOutcome {
            algorithm,
            actual,
            matched,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumOutcome {
    pub algorithm: ChecksumAlgorithm,
    pub actual: String,
    pub matched: bool,
}

pub fn md5_hex(payload: &[u8]) -> String {
    hex::encode(Md5::digest(payload))
}

pub fn sha256_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}
