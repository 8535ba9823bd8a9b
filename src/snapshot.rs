//! Named full-state snapshots.
//!
//! Generation and uniqueness checks constantly save and roll back the
//! whole grid, so snapshots are plain structural clones of the cell
//! arena. Restoring one leaves the grid bit-for-bit equal to the state
//! at save time. The same clone type doubles as the per-rule solve trace
//! handed to rendering collaborators.

use std::collections::HashMap;

use crate::board::{CellId, Grid, ValueSet};

/// Deep copy of one cell's complete state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellState {
    /// Authored or generated fixed value.
    pub given: Option<u8>,
    /// Solver-assigned value.
    pub value: Option<u8>,
    /// Remaining candidate values.
    pub candidates: ValueSet,
    /// Cells this cell must be lesser than.
    pub less_than: Vec<CellId>,
    /// Cells this cell must be greater than.
    pub greater_than: Vec<CellId>,
}

/// Deep copy of a whole grid, in row-major cell order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridState(Vec<CellState>);

impl GridState {
    /// Returns the captured cells in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.0
    }

    pub(crate) fn capture(grid: &Grid) -> GridState {
        GridState(
            grid.cells()
                .iter()
                .map(|cell| CellState {
                    given: cell.given(),
                    value: cell.solved,
                    candidates: cell.candidates(),
                    less_than: cell.less_than().to_vec(),
                    greater_than: cell.greater_than().to_vec(),
                })
                .collect(),
        )
    }

    pub(crate) fn restore_into(&self, grid: &mut Grid) {
        for (cell, state) in grid.cells.iter_mut().zip(&self.0) {
            cell.given = state.given;
            cell.solved = state.value;
            cell.candidates = state.candidates;
            cell.less_than = state.less_than.clone();
            cell.greater_than = state.greater_than.clone();
        }
    }
}

/// Table of named snapshots. Saving to an existing name overwrites it;
/// temporary snapshots are removed explicitly by their creators.
#[derive(Debug, Clone, Default)]
pub(crate) struct SnapshotStore {
    saves: HashMap<String, GridState>,
}

impl SnapshotStore {
    pub(crate) fn new() -> SnapshotStore {
        SnapshotStore::default()
    }

    pub(crate) fn save(&mut self, name: &str, grid: &Grid) {
        self.saves.insert(name.to_owned(), GridState::capture(grid));
    }

    /// Restores a snapshot into the grid. Returns `false` if no snapshot
    /// with that name exists (the grid is left untouched).
    pub(crate) fn restore(&self, name: &str, grid: &mut Grid) -> bool {
        match self.saves.get(name) {
            Some(state) => {
                state.restore_into(grid);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.saves.remove(name).is_some()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&GridState> {
        self.saves.get(name)
    }
}
