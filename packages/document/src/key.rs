use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque node identifier, unique within one tree instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(u64);

impl NodeKey {
    /// Raw counter value (diagnostics only; keys carry no meaning across trees)
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Sequential key generator owned by a single tree
///
/// The counter only moves forward, so a key handed out once is never
/// issued again for the same tree, even after its node is dropped or the
/// tree contents are restored from a snapshot.
#[derive(Debug, Clone, Default)]
pub struct KeyGenerator {
    count: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    /// Generate next sequential key
    pub fn next_key(&mut self) -> NodeKey {
        self.count += 1;
        NodeKey(self.count)
    }

    /// Number of keys issued so far
    pub fn issued(&self) -> u64 {
        self.count
    }
}
