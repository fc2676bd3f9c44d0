use serde::{Deserialize, Serialize};

use crate::cell_id::CellId;

/// Cell amount. Counters never go below zero.
pub type Amount = u64;

/// A single countable cell.
///
/// The id is fixed at creation. The amount changes only through
/// [`crate::grid::Grid::increment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    id: CellId,
    amount: Amount,
}

impl Cell {
    /// New cell with amount 0.
    pub fn new(id: CellId) -> Self {
        Self { id, amount: 0 }
    }

    pub fn with_amount(id: CellId, amount: Amount) -> Self {
        Self { id, amount }
    }

    #[inline]
    pub fn id(&self) -> &CellId {
        &self.id
    }

    #[inline]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Same cell, one more count. `None` on overflow.
    pub(crate) fn incremented(&self) -> Option<Self> {
        self.amount.checked_add(1).map(|amount| Self {
            id: self.id.clone(),
            amount,
        })
    }
}
