//! Puzzle generation: randomized fill, constraint derivation, then
//! reduction and given-minimization under a uniqueness guarantee.
//!
//! The generator owns no randomness of its own; callers hand it any
//! [`Rng`], so a seeded generator reproduces the same puzzle.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{CellId, ValueSet};
use crate::errors::{BudgetExhausted, BudgetKind};
use crate::futoshiki::Futoshiki;

/// Snapshot name of the complete solution grid.
pub const SOLUTION_SNAPSHOT: &str = "solution";
/// Snapshot name of the first reduced, solvable puzzle.
pub const INIT_SNAPSHOT: &str = "init";
/// Snapshot name of the final, minimized puzzle.
pub const OPTIMIZED_SNAPSHOT: &str = "optimized";

/// Cap on row-fill backtracking steps before generation gives up.
pub const FILL_RETRY_LIMIT: u32 = 500;
/// Cap on reduction attempts while searching for a solvable puzzle.
pub const INIT_RETRY_LIMIT: u32 = 100;
/// Cap on optimization iterations while minimizing givens.
pub const OPTIMIZE_ITERATION_LIMIT: u32 = 100;
/// Probability with which each given and relation endpoint is cleared
/// during the reduction phase.
pub const REDUCTION_RATIO: f64 = 0.75;

/// Names of the three snapshots a successful generation leaves in the
/// session's snapshot store. The optimized puzzle is also left active on
/// the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// Snapshot holding the complete solution.
    pub solution: String,
    /// Snapshot holding the reduced puzzle before optimization.
    pub initial: String,
    /// Snapshot holding the minimized puzzle.
    pub optimized: String,
}

/// Puzzle generator borrowing a session and a random number source.
pub struct Generator<'a, R: Rng> {
    session: &'a mut Futoshiki,
    rng: R,
}

impl<'a, R: Rng> Generator<'a, R> {
    /// Creates a generator over the given session.
    pub fn new(session: &'a mut Futoshiki, rng: R) -> Generator<'a, R> {
        Generator { session, rng }
    }

    /// Runs the full pipeline: fill, derive constraints, reduce until
    /// solvable, then minimize givens for `difficulty_budget` iterations
    /// (bounded by [`OPTIMIZE_ITERATION_LIMIT`]).
    ///
    /// Any previous grid content is discarded first. On success the grid
    /// holds the optimized puzzle and the store holds the three snapshots
    /// named by the returned [`GeneratedPuzzle`].
    pub fn run(mut self, difficulty_budget: u32) -> Result<GeneratedPuzzle, BudgetExhausted> {
        self.session.grid.reset();
        self.fill()?;
        self.derive_constraints();
        self.session.save(SOLUTION_SNAPSHOT);
        self.reduce()?;
        self.minimize(difficulty_budget)?;
        self.session.save(OPTIMIZED_SNAPSHOT);
        Ok(GeneratedPuzzle {
            solution: SOLUTION_SNAPSHOT.to_owned(),
            initial: INIT_SNAPSHOT.to_owned(),
            optimized: OPTIMIZED_SNAPSHOT.to_owned(),
        })
    }

    /// Fills the grid with a complete random Latin square of givens.
    ///
    /// Rows are processed top to bottom; each cell gets a random value
    /// not yet used above it in its column or to its left in its row.
    /// When a row cannot be completed, that row and the previous one are
    /// cleared and filling resumes one row up. The local one-row
    /// backtrack is intentional; stepping further back would change the
    /// generation-time and output distribution.
    pub fn fill(&mut self) -> Result<(), BudgetExhausted> {
        let size = self.session.grid.size();
        let mut row: u8 = 0;
        let mut steps = 0u32;
        while row < size {
            if steps == FILL_RETRY_LIMIT {
                return Err(BudgetExhausted::new(BudgetKind::FillRetries));
            }
            steps += 1;

            for col in 0..size {
                let id = self.session.grid.id_at(col, row);
                if self.session.grid.cells[id.index()].given.is_some() {
                    continue;
                }
                let mut used = ValueSet::NONE;
                for prior in 0..row {
                    let above = self.session.grid.id_at(col, prior);
                    if let Some(value) = self.session.grid.cells[above.index()].given {
                        used.insert(value);
                    }
                }
                for prior in 0..col {
                    let left = self.session.grid.id_at(prior, row);
                    if let Some(value) = self.session.grid.cells[left.index()].given {
                        used.insert(value);
                    }
                }
                let available: Vec<u8> = ValueSet::full(size).without(used).into_iter().collect();
                if let Some(&value) = available.choose(&mut self.rng) {
                    self.session.grid.cells[id.index()].given = Some(value);
                }
            }

            let incomplete = self
                .session
                .grid
                .row_ids(row)
                .any(|id| self.session.grid.cells[id.index()].given.is_none());
            if incomplete {
                self.clear_row(row);
                if row > 0 {
                    self.clear_row(row - 1);
                    row -= 1;
                }
            } else {
                row += 1;
            }
        }
        Ok(())
    }

    /// Records an inequality for every orthogonally adjacent pair of
    /// filled cells, pointing from the smaller to the larger value. The
    /// filled grid satisfies every derived relation by construction.
    pub fn derive_constraints(&mut self) {
        let grid = &mut self.session.grid;
        for index in 0..grid.cells.len() {
            let id = CellId(index as u16);
            let value = match grid.cells[index].given {
                Some(value) => value,
                None => continue,
            };
            for neighbour in grid.adjacent_ids(id) {
                if let Some(other) = grid.cells[neighbour.index()].given {
                    if other > value {
                        grid.add_relation(id, neighbour);
                    }
                }
            }
        }
    }

    /// Clears givens and relations probabilistically until the remaining
    /// puzzle is solvable, saving it under [`INIT_SNAPSHOT`]. Solvability
    /// is all this phase guarantees; uniqueness comes later.
    fn reduce(&mut self) -> Result<(), BudgetExhausted> {
        let mut attempts = 0u32;
        loop {
            self.reduce_once();
            // on failure this restores the full solution, so the next
            // attempt reduces from scratch
            if self.session.is_solvable(SOLUTION_SNAPSHOT)? {
                return Ok(());
            }
            attempts += 1;
            if attempts == INIT_RETRY_LIMIT {
                return Err(BudgetExhausted::new(BudgetKind::InitRetries));
            }
        }
    }

    fn reduce_once(&mut self) {
        let len = self.session.grid.cells.len();
        for index in 0..len {
            let id = CellId(index as u16);
            if self.session.grid.cells[index].given.is_some()
                && self.rng.gen_bool(REDUCTION_RATIO)
            {
                self.session.grid.cells[index].given = None;
            }
            for partner in self.session.grid.cells[index].greater_than.clone() {
                if self.rng.gen_bool(REDUCTION_RATIO) {
                    self.session.grid.remove_relation(partner, id);
                }
            }
            for partner in self.session.grid.cells[index].less_than.clone() {
                if self.rng.gen_bool(REDUCTION_RATIO) {
                    self.session.grid.remove_relation(id, partner);
                }
            }
        }
        self.session.save(INIT_SNAPSHOT);
    }

    /// Bounded local search removing one given or relation per iteration,
    /// keeping only removals that leave the puzzle uniquely solvable.
    fn minimize(&mut self, difficulty_budget: u32) -> Result<(), BudgetExhausted> {
        for iteration in 0..difficulty_budget {
            if iteration == OPTIMIZE_ITERATION_LIMIT {
                return Err(BudgetExhausted::new(BudgetKind::OptimizeIterations));
            }
            self.optimize_once()?;
        }
        Ok(())
    }

    /// One optimization iteration. Returns whether the removal was kept.
    fn optimize_once(&mut self) -> Result<bool, BudgetExhausted> {
        const BEFORE: &str = "optimize";
        const AFTER: &str = "optimize_check";

        self.session.save(BEFORE);

        let removable: Vec<CellId> = self
            .session
            .grid
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| {
                cell.given().is_some()
                    || !cell.less_than().is_empty()
                    || !cell.greater_than().is_empty()
            })
            .map(|(index, _)| CellId(index as u16))
            .collect();
        let id = match removable.choose(&mut self.rng) {
            Some(&id) => id,
            None => {
                self.session.remove_snapshot(BEFORE);
                return Ok(false);
            }
        };

        self.remove_random_fact(id);

        self.session.save(AFTER);
        let count = match self.session.count_solutions(2) {
            Ok(count) => count,
            Err(exhausted) => {
                self.session.restore(BEFORE);
                self.session.remove_snapshot(BEFORE);
                self.session.remove_snapshot(AFTER);
                return Err(exhausted);
            }
        };

        let unique = count == 1;
        if unique {
            self.session.restore(AFTER);
        } else {
            self.session.restore(BEFORE);
        }
        self.session.remove_snapshot(BEFORE);
        self.session.remove_snapshot(AFTER);
        Ok(unique)
    }

    /// Removes one fact from the cell: its given value or one of its
    /// relations, the category picked at random among those available.
    fn remove_random_fact(&mut self, id: CellId) {
        #[derive(Clone, Copy)]
        enum Fact {
            Given,
            LesserThan,
            GreaterThan,
        }

        let cell = &self.session.grid.cells[id.index()];
        let mut facts = Vec::with_capacity(3);
        if cell.given().is_some() {
            facts.push(Fact::Given);
        }
        if !cell.less_than().is_empty() {
            facts.push(Fact::LesserThan);
        }
        if !cell.greater_than().is_empty() {
            facts.push(Fact::GreaterThan);
        }

        match facts.choose(&mut self.rng) {
            Some(Fact::Given) => {
                self.session.grid.cells[id.index()].given = None;
            }
            Some(Fact::LesserThan) => {
                let partners = self.session.grid.cells[id.index()].less_than.clone();
                if let Some(&partner) = partners.choose(&mut self.rng) {
                    self.session.grid.remove_relation(id, partner);
                }
            }
            Some(Fact::GreaterThan) => {
                let partners = self.session.grid.cells[id.index()].greater_than.clone();
                if let Some(&partner) = partners.choose(&mut self.rng) {
                    self.session.grid.remove_relation(partner, id);
                }
            }
            None => {}
        }
    }

    fn clear_row(&mut self, row: u8) {
        for id in self.session.grid.row_ids(row).collect::<Vec<_>>() {
            self.session.grid.cells[id.index()].given = None;
        }
    }
}
