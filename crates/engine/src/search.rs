//! Proximity search: which cells hold amounts closest to a target value.
//!
//! The grid is flattened row-major and stable-sorted by `|target - amount|`,
//! so equidistant cells keep their row-major order. The result is the first
//! `requested` cells, plus one more when the runner-up window (sorted
//! positions 1, 2 and 3) is not fully tied on amount.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::cell::Amount;
use crate::cell_id::CellId;
use crate::error::GridError;
use crate::grid::Grid;

/// Sorted positions compared by the tie adjustment.
const TIE_WINDOW: [usize; 3] = [1, 2, 3];

/// Cells the tie window needs to exist in full.
pub const MIN_SEARCH_CELLS: usize = 4;

/// What to do when the grid has fewer than [`MIN_SEARCH_CELLS`] cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortGridPolicy {
    /// Fail with `UnderflowWindow`.
    #[default]
    Reject,
    /// Missing window positions compare unequal to everything, so the
    /// adjustment always adds one. The result is still clamped to the cell
    /// count.
    TreatMissingAsDifferent,
}

/// One cell in proximity order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub id: CellId,
    pub row: usize,
    pub col: usize,
    pub amount: Amount,
    pub distance: f64,
}

/// Every cell of `grid` ordered by distance to `target`, ties in row-major
/// order.
///
/// A NaN target makes every distance NaN; those compare equal under
/// `OrderedFloat`, so the order is plain row-major.
pub fn rank(grid: &Grid, target: f64) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = grid
        .positioned_cells()
        .map(|(row, col, cell)| Ranked {
            id: cell.id().clone(),
            row,
            col,
            amount: cell.amount(),
            distance: (target - cell.amount() as f64).abs(),
        })
        .collect();

    // `sort_by_key` is stable; the tie order is part of the result.
    ranked.sort_by_key(|r| OrderedFloat(r.distance));
    ranked
}

/// Extra cells granted by the runner-up window: 1 if positions 1..=3 are not
/// all the same amount, else 0.
pub fn tie_extra(ranked: &[Ranked], policy: ShortGridPolicy) -> Result<usize, GridError> {
    if ranked.len() < MIN_SEARCH_CELLS {
        return match policy {
            ShortGridPolicy::Reject => Err(GridError::UnderflowWindow { cells: ranked.len() }),
            ShortGridPolicy::TreatMissingAsDifferent => Ok(1),
        };
    }

    let [a, b, c] = TIE_WINDOW.map(|i| ranked[i].amount);
    Ok(if a != b || b != c { 1 } else { 0 })
}

/// Result of a proximity query, with the ranking it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub ranked: Vec<Ranked>,
    pub extra: usize,
    /// Number of leading entries of `ranked` that were selected.
    pub selected: usize,
}

impl SearchOutcome {
    pub fn ids(&self) -> Vec<CellId> {
        self.ranked[..self.selected]
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn selected(&self) -> &[Ranked] {
        &self.ranked[..self.selected]
    }
}

/// Full query: rank, adjust, cut.
pub fn search_detailed(
    grid: &Grid,
    target: f64,
    requested: usize,
    policy: ShortGridPolicy,
) -> Result<SearchOutcome, GridError> {
    let ranked = rank(grid, target);
    let extra = tie_extra(&ranked, policy)?;
    let selected = requested.saturating_add(extra).min(ranked.len());

    log::debug!(
        "proximity search: target={} requested={} extra={} selected={}/{}",
        target,
        requested,
        extra,
        selected,
        ranked.len()
    );

    Ok(SearchOutcome { ranked, extra, selected })
}

/// Ids of the cells closest to `target`: `requested` of them, plus the tie
/// adjustment, clamped to the cell count.
pub fn search(
    grid: &Grid,
    target: f64,
    requested: usize,
    policy: ShortGridPolicy,
) -> Result<Vec<CellId>, GridError> {
    search_detailed(grid, target, requested, policy).map(|outcome| outcome.ids())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_id::SequentialIds;

    fn grid(columns: usize, amounts: &[Amount]) -> Grid {
        Grid::from_amounts(columns, amounts, &mut SequentialIds::new())
    }

    fn selected_amounts(grid: &Grid, ids: &[CellId]) -> Vec<Amount> {
        ids.iter()
            .map(|id| {
                let (r, c) = grid.position_of(id).unwrap();
                grid.cell(r, c).unwrap().amount()
            })
            .collect()
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let g = grid(5, &[0, 1, 2, 3, 4]);
        let order: Vec<Amount> = rank(&g, 2.0).iter().map(|r| r.amount).collect();
        assert_eq!(order, vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn test_rank_ties_keep_row_major() {
        // Same amount everywhere: order is exactly row-major
        let g = grid(2, &[3, 3, 3, 3]);
        let positions: Vec<(usize, usize)> = rank(&g, 0.0).iter().map(|r| (r.row, r.col)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_search_all_tied_no_extra() {
        let g = grid(5, &[5, 5, 5, 5, 5]);
        let outcome = search_detailed(&g, 5.0, 2, ShortGridPolicy::Reject).unwrap();
        assert_eq!(outcome.extra, 0);
        assert_eq!(outcome.ids().len(), 2);
        assert_eq!(outcome.ids(), vec![CellId::from_raw("c0"), CellId::from_raw("c1")]);
    }

    #[test]
    fn test_search_distinct_window_adds_one() {
        let g = grid(5, &[0, 1, 2, 3, 4]);
        let ids = search(&g, 2.0, 1, ShortGridPolicy::Reject).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(selected_amounts(&g, &ids), vec![2, 1]);
    }

    #[test]
    fn test_search_window_starts_at_second() {
        // Positions 0 differs, 1..=3 tied -> no extra
        let g = grid(5, &[9, 4, 4, 4, 0]);
        let outcome = search_detailed(&g, 9.0, 1, ShortGridPolicy::Reject).unwrap();
        let order: Vec<Amount> = outcome.ranked.iter().map(|r| r.amount).collect();
        assert_eq!(order, vec![9, 4, 4, 4, 0]);
        assert_eq!(outcome.extra, 0);
        assert_eq!(outcome.selected, 1);
    }

    #[test]
    fn test_search_partial_tie_in_window() {
        // Window 1,2 tied but 2,3 differ -> extra
        let g = grid(4, &[5, 6, 6, 8]);
        let outcome = search_detailed(&g, 5.0, 0, ShortGridPolicy::Reject).unwrap();
        assert_eq!(outcome.extra, 1);
        assert_eq!(outcome.selected, 1);
    }

    #[test]
    fn test_search_clamps_to_len() {
        let g = grid(2, &[0, 1, 2, 3]);
        let ids = search(&g, 0.0, 10, ShortGridPolicy::Reject).unwrap();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_search_zero_requested() {
        let g = grid(4, &[1, 1, 1, 1]);
        assert!(search(&g, 1.0, 0, ShortGridPolicy::Reject).unwrap().is_empty());
    }

    #[test]
    fn test_search_fractional_target() {
        // 2.5 is equidistant from 3 and 2; 3 comes first row-major
        let g = grid(4, &[3, 2, 0, 9]);
        let order: Vec<Amount> = rank(&g, 2.5).iter().map(|r| r.amount).collect();
        assert_eq!(order, vec![3, 2, 0, 9]);
    }

    #[test]
    fn test_search_underflow_rejected() {
        let g = grid(3, &[0, 1, 2]);
        assert_eq!(
            search(&g, 1.0, 1, ShortGridPolicy::Reject),
            Err(GridError::UnderflowWindow { cells: 3 })
        );
        assert_eq!(
            search(&Grid::empty(), 1.0, 0, ShortGridPolicy::Reject),
            Err(GridError::UnderflowWindow { cells: 0 })
        );
    }

    #[test]
    fn test_search_underflow_treated_as_different() {
        let g = grid(3, &[7, 7, 7]);
        let outcome = search_detailed(&g, 7.0, 1, ShortGridPolicy::TreatMissingAsDifferent).unwrap();
        assert_eq!(outcome.extra, 1);
        assert_eq!(outcome.selected, 2);

        let empty = search(&Grid::empty(), 0.0, 3, ShortGridPolicy::TreatMissingAsDifferent).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_search_deterministic() {
        let g = grid(3, &[4, 1, 4, 2, 2, 9]);
        let first = search(&g, 3.0, 2, ShortGridPolicy::Reject).unwrap();
        for _ in 0..10 {
            assert_eq!(search(&g, 3.0, 2, ShortGridPolicy::Reject).unwrap(), first);
        }
    }

    #[test]
    fn test_nan_target_is_row_major() {
        let g = grid(2, &[4, 1, 0, 2]);
        let positions: Vec<(usize, usize)> = rank(&g, f64::NAN).iter().map(|r| (r.row, r.col)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_policy_serde() {
        assert_eq!(
            serde_json::to_string(&ShortGridPolicy::TreatMissingAsDifferent).unwrap(),
            "\"treat_missing_as_different\""
        );
        let p: ShortGridPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(p, ShortGridPolicy::Reject);
    }
}
