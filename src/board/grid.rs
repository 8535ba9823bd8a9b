//! The grid arena and its relation store.

use crate::board::cell::{Cell, CellId};
use crate::board::set::ValueSet;
use crate::errors::{Contradiction, OutOfRange, Violation};

/// How two cells relate under the recorded inequality constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// The first cell must hold a smaller value than the second.
    Less,
    /// The first cell must hold a larger value than the second.
    Greater,
    /// No inequality is recorded between the two cells.
    None,
}

/// An `N×N` futoshiki grid.
///
/// All cells are created once at construction and live in a dense arena
/// for the lifetime of the grid; solving and generation mutate them in
/// place. Rows and columns are derived views over the same cells.
#[derive(Debug, Clone)]
pub struct Grid {
    size: u8,
    pub(crate) cells: Vec<Cell>,
}

impl Grid {
    /// Constructs an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or greater than 16.
    pub fn new(size: u8) -> Grid {
        assert!(size >= 1 && size <= 16, "grid size must be in 1..=16");
        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell::new(col, row));
            }
        }
        Grid { size, cells }
    }

    /// Returns the side length of the grid.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `(col, row)`.
    pub fn cell(&self, col: u8, row: u8) -> Result<&Cell, OutOfRange> {
        let id = self.check_coord(col, row)?;
        Ok(&self.cells[id.index()])
    }

    /// Returns the rows of the grid, top to bottom.
    pub fn rows(&self) -> Vec<Vec<&Cell>> {
        (0..self.size)
            .map(|row| self.row_ids(row).map(|id| &self.cells[id.index()]).collect())
            .collect()
    }

    /// Returns the columns of the grid, left to right.
    pub fn columns(&self) -> Vec<Vec<&Cell>> {
        (0..self.size)
            .map(|col| self.col_ids(col).map(|id| &self.cells[id.index()]).collect())
            .collect()
    }

    /// Fixes a given value at `(col, row)`. Givens override solved values
    /// and survive candidate initialization.
    pub fn set_given(&mut self, col: u8, row: u8, value: u8) -> Result<(), OutOfRange> {
        let id = self.check_coord(col, row)?;
        let value = self.check_value(value)?;
        self.cells[id.index()].given = Some(value);
        Ok(())
    }

    /// Removes the given value at `(col, row)`, if any.
    pub fn clear_given(&mut self, col: u8, row: u8) -> Result<(), OutOfRange> {
        let id = self.check_coord(col, row)?;
        self.cells[id.index()].given = None;
        Ok(())
    }

    /// Assigns a solved value at `(col, row)`, as the solver would.
    pub fn set_value(&mut self, col: u8, row: u8, value: u8) -> Result<(), OutOfRange> {
        let id = self.check_coord(col, row)?;
        let value = self.check_value(value)?;
        self.cells[id.index()].assign(value);
        Ok(())
    }

    /// Records the inequality `a < b` between two adjacent cells.
    ///
    /// The relation is stored mutually: `a` is marked lesser-than `b` and
    /// `b` greater-than `a`. Registering the same relation twice is a
    /// no-op. Fails if the cells are not orthogonal neighbours.
    pub fn add_constraint(&mut self, a: (u8, u8), b: (u8, u8)) -> Result<(), OutOfRange> {
        let id_a = self.check_coord(a.0, a.1)?;
        let id_b = self.check_coord(b.0, b.1)?;
        if !Self::adjacent(a, b) {
            return Err(OutOfRange::NotAdjacent { a, b });
        }
        self.add_relation(id_a, id_b);
        Ok(())
    }

    /// Records a batch of inequalities, each as `(lesser, greater)`.
    pub fn add_constraints(&mut self, pairs: &[((u8, u8), (u8, u8))]) -> Result<(), OutOfRange> {
        for &(a, b) in pairs {
            self.add_constraint(a, b)?;
        }
        Ok(())
    }

    /// Removes the inequality `a < b`, if recorded.
    pub fn remove_constraint(&mut self, a: (u8, u8), b: (u8, u8)) -> Result<(), OutOfRange> {
        let id_a = self.check_coord(a.0, a.1)?;
        let id_b = self.check_coord(b.0, b.1)?;
        self.remove_relation(id_a, id_b);
        Ok(())
    }

    /// Returns how cell `a` relates to cell `b`.
    ///
    /// Symmetry invariant: `relation_of(a, b) == Relation::Less` exactly
    /// when `relation_of(b, a) == Relation::Greater`.
    pub fn relation_of(&self, a: (u8, u8), b: (u8, u8)) -> Result<Relation, OutOfRange> {
        let id_a = self.check_coord(a.0, a.1)?;
        let id_b = self.check_coord(b.0, b.1)?;
        let cell = &self.cells[id_a.index()];
        if cell.less_than.contains(&id_b) {
            Ok(Relation::Less)
        } else if cell.greater_than.contains(&id_b) {
            Ok(Relation::Greater)
        } else {
            Ok(Relation::None)
        }
    }

    /// Returns the `(col, row)` coordinate of an arena index.
    pub fn coord_of(&self, id: CellId) -> (u8, u8) {
        let size = self.size as u16;
        ((id.0 % size) as u8, (id.0 / size) as u8)
    }

    /// Checks whether every cell has an effective value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.value().is_some())
    }

    /// Returns every broken invariant in the current state: duplicate
    /// values per row and column, cells with no possible value, and
    /// solved values violating a recorded inequality.
    pub fn contradictions(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for row in 0..self.size {
            if self.line_has_duplicate(self.row_ids(row)) {
                violations.push(Violation::DuplicateInRow(row));
            }
        }
        for col in 0..self.size {
            if self.line_has_duplicate(self.col_ids(col)) {
                violations.push(Violation::DuplicateInColumn(col));
            }
        }

        for cell in &self.cells {
            if cell.value().is_none() && cell.candidates.is_empty() {
                violations.push(Violation::EmptyCandidateCell {
                    col: cell.col(),
                    row: cell.row(),
                });
            }
        }

        for (index, cell) in self.cells.iter().enumerate() {
            for &greater in &cell.less_than {
                let (a, b) = (cell.value(), self.cells[greater.index()].value());
                if let (Some(a), Some(b)) = (a, b) {
                    if a > b {
                        violations.push(Violation::InequalityViolation {
                            lesser: self.coord_of(CellId(index as u16)),
                            greater: self.coord_of(greater),
                        });
                    }
                }
            }
        }

        violations
    }

    fn line_has_duplicate(&self, line: impl Iterator<Item = CellId>) -> bool {
        let mut seen = ValueSet::NONE;
        for id in line {
            if let Some(value) = self.cells[id.index()].value() {
                if seen.contains(value) {
                    return true;
                }
                seen.insert(value);
            }
        }
        false
    }

    pub(crate) fn check_contradictions(&self) -> Result<(), Contradiction> {
        let violations = self.contradictions();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Contradiction { violations })
        }
    }

    /// Gives every unsolved cell the full candidate set and every solved
    /// cell the empty one.
    pub(crate) fn fill_candidates(&mut self) {
        let full = ValueSet::full(self.size);
        for cell in &mut self.cells {
            cell.candidates = if cell.value().is_none() {
                full
            } else {
                ValueSet::NONE
            };
        }
    }

    pub(crate) fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    pub(crate) fn id_at(&self, col: u8, row: u8) -> CellId {
        CellId(row as u16 * self.size as u16 + col as u16)
    }

    pub(crate) fn check_coord(&self, col: u8, row: u8) -> Result<CellId, OutOfRange> {
        if col >= self.size || row >= self.size {
            return Err(OutOfRange::Coord {
                col,
                row,
                size: self.size,
            });
        }
        Ok(self.id_at(col, row))
    }

    fn check_value(&self, value: u8) -> Result<u8, OutOfRange> {
        if value == 0 || value > self.size {
            return Err(OutOfRange::Value {
                value,
                size: self.size,
            });
        }
        Ok(value)
    }

    fn adjacent(a: (u8, u8), b: (u8, u8)) -> bool {
        let col_dist = (a.0 as i16 - b.0 as i16).abs();
        let row_dist = (a.1 as i16 - b.1 as i16).abs();
        col_dist + row_dist == 1
    }

    pub(crate) fn add_relation(&mut self, lesser: CellId, greater: CellId) {
        if !self.cells[lesser.index()].less_than.contains(&greater) {
            self.cells[lesser.index()].less_than.push(greater);
            self.cells[greater.index()].greater_than.push(lesser);
        }
    }

    pub(crate) fn remove_relation(&mut self, lesser: CellId, greater: CellId) {
        self.cells[lesser.index()].less_than.retain(|&id| id != greater);
        self.cells[greater.index()].greater_than.retain(|&id| id != lesser);
    }

    pub(crate) fn row_ids(&self, row: u8) -> impl Iterator<Item = CellId> {
        let size = self.size as u16;
        (0..size).map(move |col| CellId(row as u16 * size + col))
    }

    pub(crate) fn col_ids(&self, col: u8) -> impl Iterator<Item = CellId> {
        let size = self.size as u16;
        (0..size).map(move |row| CellId(row * size + col as u16))
    }

    /// Cells sharing a row or column with `id`, excluding `id` itself.
    pub(crate) fn peer_ids(&self, id: CellId) -> Vec<CellId> {
        let (col, row) = self.coord_of(id);
        self.row_ids(row)
            .chain(self.col_ids(col))
            .filter(|&peer| peer != id)
            .collect()
    }

    /// Orthogonal neighbours of `id`.
    pub(crate) fn adjacent_ids(&self, id: CellId) -> Vec<CellId> {
        let (col, row) = self.coord_of(id);
        let mut ids = Vec::with_capacity(4);
        if row > 0 {
            ids.push(self.id_at(col, row - 1));
        }
        if row + 1 < self.size {
            ids.push(self.id_at(col, row + 1));
        }
        if col > 0 {
            ids.push(self.id_at(col - 1, row));
        }
        if col + 1 < self.size {
            ids.push(self.id_at(col + 1, row));
        }
        ids
    }
}
