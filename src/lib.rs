#![warn(missing_docs)]
//! The Futoshiki library
//!
//! ## Overview
//!
//! Futoshiki is a library for solving and generating futoshiki puzzles:
//! `N×N` Latin squares augmented with inequality constraints between
//! adjacent cells. Solving combines fixpoint constraint propagation with
//! bounded backtracking search; generation fills a random complete grid,
//! derives the inequalities from it and then strips givens and relations
//! back while re-verifying unique solvability at every step.
//!
//! ## Example
//!
//! ```
//! use futoshiki::Futoshiki;
//!
//! let mut puzzle = Futoshiki::new(4);
//! puzzle.set_givens(&[(0, 0, 3), (2, 0, 1), (1, 2, 4), (3, 3, 3)]).unwrap();
//! // cell (3, 1) must hold a smaller value than cell (3, 2)
//! puzzle.add_constraint((3, 1), (3, 2)).unwrap();
//!
//! let result = puzzle.solve(100).unwrap();
//! assert!(result.solved);
//!
//! for row in puzzle.rows() {
//!     for cell in row {
//!         print!("{} ", cell.value().unwrap());
//!     }
//!     println!();
//! }
//! ```

mod board;
mod errors;
mod futoshiki;
mod generate;
mod snapshot;
mod solve;

pub use crate::board::{Cell, CellId, Grid, Relation, ValueSet};
pub use crate::errors::{
    BudgetExhausted, BudgetKind, Contradiction, OutOfRange, PropagateError, Violation,
};
pub use crate::futoshiki::Futoshiki;
pub use crate::generate::{
    GeneratedPuzzle, Generator, FILL_RETRY_LIMIT, INIT_RETRY_LIMIT, INIT_SNAPSHOT,
    OPTIMIZED_SNAPSHOT, OPTIMIZE_ITERATION_LIMIT, REDUCTION_RATIO, SOLUTION_SNAPSHOT,
};
pub use crate::snapshot::{CellState, GridState};
pub use crate::solve::{SolveResult, PROPAGATION_PASS_LIMIT};
