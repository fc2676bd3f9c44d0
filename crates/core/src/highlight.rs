use rustc_hash::FxHashSet;
use tallygrid_engine::{CellId, Grid};

/// Cells marked by the latest proximity query.
///
/// Keeps the query's order for display and a hash set for per-cell lookups
/// while rendering.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    order: Vec<CellId>,
    members: FxHashSet<CellId>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<CellId>) -> Self {
        let members = ids.iter().cloned().collect();
        Self { order: ids, members }
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.members.contains(id)
    }

    pub fn ids(&self) -> &[CellId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Drop ids whose cells are no longer in `grid`. Returns true if any were
    /// removed.
    pub fn retain_present(&mut self, grid: &Grid) -> bool {
        let before = self.order.len();
        let present: FxHashSet<&CellId> = grid.cells().map(|c| c.id()).collect();
        self.order.retain(|id| present.contains(id));
        if self.order.len() == before {
            return false;
        }
        self.members = self.order.iter().cloned().collect();
        true
    }
}

impl PartialEq for HighlightSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallygrid_engine::SequentialIds;

    #[test]
    fn test_membership_and_order() {
        let set = HighlightSet::from_ids(vec![CellId::from_raw("b"), CellId::from_raw("a")]);
        assert!(set.contains(&CellId::from_raw("a")));
        assert!(!set.contains(&CellId::from_raw("c")));
        assert_eq!(set.ids()[0].as_str(), "b");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_retain_present() {
        let grid = Grid::generate(2, 2, &mut SequentialIds::new());
        let mut set = HighlightSet::from_ids(vec![CellId::from_raw("c0"), CellId::from_raw("c3")]);

        assert!(!set.retain_present(&grid));

        let smaller = grid.remove_row(1).unwrap();
        assert!(set.retain_present(&smaller));
        assert_eq!(set.ids(), &[CellId::from_raw("c0")]);
        assert!(!set.contains(&CellId::from_raw("c3")));
    }

    #[test]
    fn test_clear() {
        let mut set = HighlightSet::from_ids(vec![CellId::from_raw("a")]);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&CellId::from_raw("a")));
    }
}
