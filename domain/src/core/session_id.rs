//! Session identifier value object

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static GENERATED: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of a debate session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new unique SessionId using a UUID-like format.
    pub fn generate() -> Self {
        Self(uuid_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a UUID-v4-shaped identifier from the clock and a process counter.
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let counter = GENERATED.fetch_add(1, Ordering::Relaxed) as u128;
    let mixed = nanos ^ (counter << 64) ^ counter.wrapping_mul(0x9e37_79b9_7f4a_7c15);

    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (mixed >> 96) as u32,
        (mixed >> 80) as u16,
        (mixed >> 64) as u16 & 0x0fff,
        ((mixed >> 48) as u16 & 0x3fff) | 0x8000,
        (mixed & 0xffff_ffff_ffff) as u64
    )
}
