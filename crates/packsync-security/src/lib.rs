mod checksum;

pub use checksum::{md5_hex, sha256_hex, ChecksumAlgorithm, ChecksumHasher, ChecksumOutcome};
