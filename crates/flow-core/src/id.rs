use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by node and connection IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter for generated IDs (`task_0`, `conn_1`, ...).
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_generated(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

/// Interned identifier of a placed node.
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate an ID with a kind prefix (e.g. `task_4`).
    ///
    /// Unique within the process; callers that hold externally-loaded IDs
    /// must still check for collisions against their own registry.
    pub fn with_prefix(prefix: &str) -> Self {
        NodeId(next_generated(prefix))
    }
}

/// Interned identifier of a connection between two nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Spur);

impl ConnectionId {
    pub fn intern(s: &str) -> Self {
        ConnectionId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh `conn_N` ID.
    pub fn generate() -> Self {
        ConnectionId(next_generated("conn"))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.as_str())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

impl Serialize for ConnectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConnectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ConnectionId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("approve_invoice");
        let b = NodeId::intern("approve_invoice");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "approve_invoice");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NodeId::with_prefix("task");
        let b = NodeId::with_prefix("task");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("task_"));

        let c = ConnectionId::generate();
        let d = ConnectionId::generate();
        assert_ne!(c, d);
        assert!(c.as_str().starts_with("conn_"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NodeId::intern("start_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"start_1\"");
        let back: NodeId = serde_json::from_str("\"start_1\"").unwrap();
        assert_eq!(back, id);
    }
}
