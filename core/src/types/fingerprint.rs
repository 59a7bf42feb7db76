use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Collision-tolerant digest of paste content, used as the paste cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(content: &str) -> Self {
        Self(xxh64(content.as_bytes(), 0))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
