//! The `Futoshiki` session: a grid plus the state that solving and
//! generation share.

use rand::Rng;

use crate::board::{Cell, Grid, Relation};
use crate::errors::{BudgetExhausted, OutOfRange, PropagateError, Violation};
use crate::generate::{GeneratedPuzzle, Generator};
use crate::snapshot::{GridState, SnapshotStore};
use crate::solve::guess::{GuessEngine, Mode, Outcome};
use crate::solve::{propagate, SolveResult, PROPAGATION_PASS_LIMIT};

const TEMP_SNAPSHOT: &str = "save_temp";

/// A futoshiki puzzle and the session state around it: the grid itself,
/// the named snapshot table, the guess id counter and the solve trace.
///
/// All engines operate on this one structure in strict sequence; there is
/// no hidden global state.
#[derive(Debug, Clone)]
pub struct Futoshiki {
    pub(crate) grid: Grid,
    pub(crate) snapshots: SnapshotStore,
    pub(crate) next_guess_id: u64,
    pub(crate) solve_steps: Vec<GridState>,
}

impl Futoshiki {
    /// Creates an empty puzzle of the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or greater than 16.
    pub fn new(size: u8) -> Futoshiki {
        Futoshiki {
            grid: Grid::new(size),
            snapshots: SnapshotStore::new(),
            next_guess_id: 0,
            solve_steps: Vec::new(),
        }
    }

    /// Returns the side length of the grid.
    pub fn size(&self) -> u8 {
        self.grid.size()
    }

    /// Returns the underlying grid, read-only.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    /// Returns the rows of the grid, top to bottom.
    pub fn rows(&self) -> Vec<Vec<&Cell>> {
        self.grid.rows()
    }

    /// Returns the columns of the grid, left to right.
    pub fn columns(&self) -> Vec<Vec<&Cell>> {
        self.grid.columns()
    }

    /// Fixes a given value at `(col, row)`.
    pub fn set_given(&mut self, col: u8, row: u8, value: u8) -> Result<(), OutOfRange> {
        self.grid.set_given(col, row, value)
    }

    /// Fixes a batch of given values, each as `(col, row, value)`.
    pub fn set_givens(&mut self, givens: &[(u8, u8, u8)]) -> Result<(), OutOfRange> {
        for &(col, row, value) in givens {
            self.grid.set_given(col, row, value)?;
        }
        Ok(())
    }

    /// Assigns a solved value at `(col, row)`.
    pub fn set_value(&mut self, col: u8, row: u8, value: u8) -> Result<(), OutOfRange> {
        self.grid.set_value(col, row, value)
    }

    /// Records the inequality `a < b` between two adjacent cells.
    pub fn add_constraint(&mut self, a: (u8, u8), b: (u8, u8)) -> Result<(), OutOfRange> {
        self.grid.add_constraint(a, b)
    }

    /// Records a batch of inequalities, each as `(lesser, greater)`.
    pub fn add_constraints(&mut self, pairs: &[((u8, u8), (u8, u8))]) -> Result<(), OutOfRange> {
        self.grid.add_constraints(pairs)
    }

    /// Returns how cell `a` relates to cell `b`.
    pub fn relation_of(&self, a: (u8, u8), b: (u8, u8)) -> Result<Relation, OutOfRange> {
        self.grid.relation_of(a, b)
    }

    /// Returns a deep copy of the current grid state.
    pub fn state(&self) -> GridState {
        GridState::capture(&self.grid)
    }

    /// Returns every broken invariant in the current state.
    pub fn contradictions(&self) -> Vec<Violation> {
        self.grid.contradictions()
    }

    /// Checks whether every cell holds a value and no invariant is broken.
    pub fn is_solved(&self) -> bool {
        self.grid.is_complete() && self.grid.contradictions().is_empty()
    }

    /// Runs constraint propagation alone to a fixpoint, without guessing.
    ///
    /// Candidate sets are initialized first. Appends one state capture per
    /// rule application to the solve trace.
    pub fn propagate(&mut self, max_passes: u32) -> Result<(), PropagateError> {
        self.solve_steps.clear();
        self.solve_steps.push(GridState::capture(&self.grid));
        self.grid.fill_candidates();
        let mut budget = max_passes;
        propagate::run(&mut self.grid, &mut self.solve_steps, &mut budget)
    }

    /// Solves the puzzle: propagation to a fixpoint, then backtracking
    /// guesses where propagation stalls.
    ///
    /// `max_iterations` bounds the total number of fixpoint passes across
    /// all branches; exceeding it reports budget exhaustion rather than
    /// "unsolved". A contradictory puzzle yields `solved: false`.
    pub fn solve(&mut self, max_iterations: u32) -> Result<SolveResult, BudgetExhausted> {
        self.solve_steps.clear();
        self.solve_steps.push(GridState::capture(&self.grid));
        self.grid.fill_candidates();

        let mut budget = max_iterations;
        let outcome = GuessEngine {
            grid: &mut self.grid,
            trace: &mut self.solve_steps,
            next_guess_id: &mut self.next_guess_id,
            budget: &mut budget,
            mode: Mode::First,
        }
        .run()?;

        Ok(SolveResult {
            solved: outcome == Outcome::Solved,
            iterations: max_iterations - budget,
        })
    }

    /// Counts distinct solutions, stopping as soon as `cap` are found.
    ///
    /// `count_solutions(2)` is the uniqueness check: a result of 1 means
    /// uniquely solvable, 2 means provably not unique. The grid is left
    /// at its propagation fixpoint; callers snapshot around this.
    pub fn count_solutions(&mut self, cap: u32) -> Result<u32, BudgetExhausted> {
        self.solve_steps.clear();
        self.solve_steps.push(GridState::capture(&self.grid));
        self.grid.fill_candidates();

        let mut budget = PROPAGATION_PASS_LIMIT;
        let outcome = GuessEngine {
            grid: &mut self.grid,
            trace: &mut self.solve_steps,
            next_guess_id: &mut self.next_guess_id,
            budget: &mut budget,
            mode: Mode::CountUpTo(cap),
        }
        .run()?;

        Ok(match outcome {
            Outcome::Count(count) => count,
            Outcome::Solved => 1,
            Outcome::Unsolvable => 0,
        })
    }

    /// Checks whether the current puzzle can be solved at all.
    ///
    /// The current state is snapshotted and restored on success; if the
    /// puzzle turns out unsolvable, the snapshot named `fallback` is
    /// restored instead (falling back to the pre-check state when no such
    /// snapshot exists). The temporary snapshot is removed either way.
    pub fn is_solvable(&mut self, fallback: &str) -> Result<bool, BudgetExhausted> {
        self.snapshots.save(TEMP_SNAPSHOT, &self.grid);

        let solved = match self.solve(PROPAGATION_PASS_LIMIT) {
            Ok(result) => result.solved,
            Err(exhausted) => {
                self.snapshots.restore(TEMP_SNAPSHOT, &mut self.grid);
                self.snapshots.remove(TEMP_SNAPSHOT);
                return Err(exhausted);
            }
        };

        if solved {
            self.snapshots.restore(TEMP_SNAPSHOT, &mut self.grid);
        } else if !self.snapshots.restore(fallback, &mut self.grid) {
            self.snapshots.restore(TEMP_SNAPSHOT, &mut self.grid);
        }
        self.snapshots.remove(TEMP_SNAPSHOT);

        Ok(solved)
    }

    /// Saves the full grid state under `name`, overwriting any previous
    /// snapshot with that name.
    pub fn save(&mut self, name: &str) {
        self.snapshots.save(name, &self.grid);
    }

    /// Restores the snapshot saved under `name`. Returns `false` if no
    /// such snapshot exists; the grid is left untouched in that case.
    pub fn restore(&mut self, name: &str) -> bool {
        self.snapshots.restore(name, &mut self.grid)
    }

    /// Removes the snapshot saved under `name`, if any.
    pub fn remove_snapshot(&mut self, name: &str) -> bool {
        self.snapshots.remove(name)
    }

    /// Returns the snapshot saved under `name`, if any.
    pub fn snapshot(&self, name: &str) -> Option<&GridState> {
        self.snapshots.get(name)
    }

    /// Returns the state captures recorded by the last solve run, one per
    /// propagation-rule application. Rendering collaborators animate
    /// these; the core attaches no meaning to them beyond order.
    pub fn solve_steps(&self) -> &[GridState] {
        &self.solve_steps
    }

    /// Generates a fresh puzzle using thread-local randomness.
    ///
    /// See [`generate_with`](Futoshiki::generate_with) for the seedable
    /// form and the meaning of `difficulty_budget`.
    pub fn generate(&mut self, difficulty_budget: u32) -> Result<GeneratedPuzzle, BudgetExhausted> {
        self.generate_with(rand::thread_rng(), difficulty_budget)
    }

    /// Generates a fresh puzzle from the given random number generator,
    /// making generation reproducible under a seeded RNG.
    ///
    /// Any previous grid content is discarded. `difficulty_budget` is the
    /// number of optimization iterations spent minimizing givens.
    pub fn generate_with<R: Rng>(
        &mut self,
        rng: R,
        difficulty_budget: u32,
    ) -> Result<GeneratedPuzzle, BudgetExhausted> {
        Generator::new(self, rng).run(difficulty_budget)
    }
}
