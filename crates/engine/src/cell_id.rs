//! Cell identity.
//!
//! A `CellId` is an opaque string that names one cell for the lifetime of a
//! session. It is not derived from the cell's position: rows shift when a row
//! above them is removed, but their cells keep their ids.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a single cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    /// Wrap an existing identifier string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh cell identifiers.
///
/// Every cell created by `generate` or `add_row` draws one id from here.
/// Implementations only need to make collisions practically unlikely within
/// one session.
pub trait IdGenerator {
    fn next_id(&mut self) -> CellId;
}

/// Random UUID v4 identifiers. The default for interactive sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> CellId {
        CellId(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Deterministic identifiers `c0`, `c1`, ... for scripted runs and tests.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> CellId {
        let id = CellId(format!("c{}", self.next));
        self.next += 1;
        id
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> CellId {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id().as_str(), "c0");
        assert_eq!(ids.next_id().as_str(), "c1");
        assert_eq!(ids.next_id().as_str(), "c2");
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_random_ids_distinct() {
        let mut ids = RandomIds;
        let set: HashSet<CellId> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn test_boxed_generator() {
        let mut ids: Box<dyn IdGenerator> = Box::new(SequentialIds::new());
        assert_eq!(ids.next_id(), CellId::from_raw("c0"));
    }

    #[test]
    fn test_display_and_serde() {
        let id = CellId::from_raw("abc");
        assert_eq!(format!("{}", id), "abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
