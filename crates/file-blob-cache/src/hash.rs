//! Key hashing: lookup key -> filesystem-safe content address

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Suffix appended to every content address to form the entry filename.
pub const ENTRY_SUFFIX: &str = ".cache";

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash algorithm requested by configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    #[default]
    Sha256,
    /// 64-bit FNV-1a. Deterministic across runs, but with far weaker
    /// collision resistance than SHA-256.
    Weak,
}

impl FromStr for HashMode {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashMode::Sha256),
            "weak" | "fnv" => Ok(HashMode::Weak),
            other => Err(CacheError::Config(format!("unknown hash mode: {}", other))),
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashMode::Sha256 => write!(f, "sha256"),
            HashMode::Weak => write!(f, "weak"),
        }
    }
}

/// Hashing strategy resolved once when a store is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHasher {
    Sha256,
    Weak,
}

impl KeyHasher {
    pub fn for_mode(mode: HashMode) -> Self {
        match mode {
            HashMode::Sha256 => KeyHasher::Sha256,
            HashMode::Weak => KeyHasher::Weak,
        }
    }

    pub fn is_weak(&self) -> bool {
        matches!(self, KeyHasher::Weak)
    }

    /// Lowercase hex digest of the key's UTF-8 bytes
    pub fn digest(&self, key: &str) -> String {
        match self {
            KeyHasher::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(key.as_bytes());
                hex::encode(hasher.finalize())
            }
            KeyHasher::Weak => format!("{:016x}", fnv1a_64(key.as_bytes())),
        }
    }

    /// Entry filename (`<digest>.cache`) for a key
    pub fn file_name(&self, key: &str) -> String {
        format!("{}{}", self.digest(key), ENTRY_SUFFIX)
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
