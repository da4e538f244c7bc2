use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element, page and cell ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for pages, elements and table cells.
/// Internally a `Spur` index: 4 bytes, `Copy`, O(1) hashing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a new string as a NodeId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique ID with a type prefix (e.g. `tbl_1`, `page_2`).
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }

    /// Derive the id of the cell anchored at `(row, col)` of `table`.
    ///
    /// Deterministic and collision-free within one table: `{table}_{row}x{col}`.
    pub fn cell(table: NodeId, row: usize, col: usize) -> Self {
        Self::intern(&format!("{}_{row}x{col}", table.as_str()))
    }

    /// Split a derived cell id back into `(row, col)` if it belongs to `table`.
    pub fn cell_position(&self, table: NodeId) -> Option<(usize, usize)> {
        let rest = self
            .as_str()
            .strip_prefix(table.as_str())?
            .strip_prefix('_')?;
        let (r, c) = rest.split_once('x')?;
        Some((r.parse().ok()?, c.parse().ok()?))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("tbl_hero");
        let b = NodeId::intern("tbl_hero");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "tbl_hero");
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = NodeId::with_prefix("tbl");
        let b = NodeId::with_prefix("tbl");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("tbl_"));
    }

    #[test]
    fn cell_ids_are_derived_from_anchor() {
        let t = NodeId::intern("tbl_7");
        let id = NodeId::cell(t, 2, 11);
        assert_eq!(id.as_str(), "tbl_7_2x11");
        assert_eq!(id, NodeId::cell(t, 2, 11));
        assert_eq!(id.cell_position(t), Some((2, 11)));
        assert_eq!(id.cell_position(NodeId::intern("tbl_8")), None);
    }

    #[test]
    fn cell_ids_do_not_collide_across_positions() {
        let t = NodeId::intern("tbl_9");
        // 1x11 vs 11x1 must stay distinct
        assert_ne!(NodeId::cell(t, 1, 11), NodeId::cell(t, 11, 1));
    }
}
