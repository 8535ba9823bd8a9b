//! Cells and their dense arena indices.

use crate::board::set::ValueSet;

/// Dense index of a cell within its grid's arena, `row * size + col`.
///
/// Relations between cells are stored as `CellId`s so that following a
/// relation during propagation is an array lookup, not a key hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub(crate) u16);

impl CellId {
    /// Returns the arena index of this cell.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single cell of a [`Grid`](crate::Grid).
///
/// A cell carries two distinct value slots: `given` is fixed by puzzle
/// authoring or generation and overrides everything, while the solved
/// value is assigned by the solver. The candidate set is empty as soon as
/// either one is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    col: u8,
    row: u8,
    pub(crate) given: Option<u8>,
    pub(crate) solved: Option<u8>,
    pub(crate) candidates: ValueSet,
    pub(crate) less_than: Vec<CellId>,
    pub(crate) greater_than: Vec<CellId>,
}

impl Cell {
    pub(crate) fn new(col: u8, row: u8) -> Cell {
        Cell {
            col,
            row,
            given: None,
            solved: None,
            candidates: ValueSet::NONE,
            less_than: Vec::new(),
            greater_than: Vec::new(),
        }
    }

    /// Returns the column of this cell.
    pub fn col(&self) -> u8 {
        self.col
    }

    /// Returns the row of this cell.
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Returns the given value, if the cell has one.
    pub fn given(&self) -> Option<u8> {
        self.given
    }

    /// Returns the effective value: the given if present, else the value
    /// assigned by the solver.
    pub fn value(&self) -> Option<u8> {
        self.given.or(self.solved)
    }

    /// Returns the remaining candidate values.
    pub fn candidates(&self) -> ValueSet {
        self.candidates
    }

    /// Returns the cells this cell is constrained to be lesser than.
    pub fn less_than(&self) -> &[CellId] {
        &self.less_than
    }

    /// Returns the cells this cell is constrained to be greater than.
    pub fn greater_than(&self) -> &[CellId] {
        &self.greater_than
    }

    /// Assigns a solved value, emptying the candidate set.
    pub(crate) fn assign(&mut self, value: u8) {
        self.solved = Some(value);
        self.candidates = ValueSet::NONE;
    }

    /// Promotes a single remaining candidate to the solved value.
    pub(crate) fn simplify(&mut self) {
        if let Some(value) = self.candidates.unique() {
            self.assign(value);
        }
    }

    /// The largest value this cell could still take: its effective value
    /// if solved, else its greatest candidate.
    pub(crate) fn greatest_possible(&self) -> Option<u8> {
        self.value().or_else(|| self.candidates.max())
    }

    /// The smallest value this cell could still take.
    pub(crate) fn least_possible(&self) -> Option<u8> {
        self.value().or_else(|| self.candidates.min())
    }

    pub(crate) fn reset(&mut self) {
        self.given = None;
        self.solved = None;
        self.candidates = ValueSet::NONE;
        self.less_than.clear();
        self.greater_than.clear();
    }
}
