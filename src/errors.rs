//! Error and result types shared across the crate.
//!
//! Only coordinate misuse is a hard failure. Contradictions and exhausted
//! iteration budgets are ordinary values that flow back through `Result`s:
//! the guess engine consumes contradictions to prune branches and callers
//! of the generator inspect budget kinds to decide whether to retry with
//! fresh randomness.

use itertools::Itertools;

/// Error for coordinate or value misuse in calls like [`Grid::set_given`].
///
/// The grid is never modified by a call that returns this error.
///
/// [`Grid::set_given`]: crate::Grid::set_given
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutOfRange {
    /// Coordinate outside the grid.
    #[error("coordinate ({col}, {row}) outside a grid of size {size}")]
    Coord {
        /// Requested column.
        col: u8,
        /// Requested row.
        row: u8,
        /// Grid size the request was checked against.
        size: u8,
    },
    /// Cell value outside `1..=size`.
    #[error("value {value} outside 1..={size}")]
    Value {
        /// Rejected value.
        value: u8,
        /// Grid size the value was checked against.
        size: u8,
    },
    /// Inequality relation between cells that are not orthogonal neighbours,
    /// or between a cell and itself.
    #[error("cells {a:?} and {b:?} are not adjacent")]
    NotAdjacent {
        /// First endpoint as `(col, row)`.
        a: (u8, u8),
        /// Second endpoint as `(col, row)`.
        b: (u8, u8),
    },
}

/// A single broken grid invariant found by contradiction detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// The same value appears twice in this row.
    #[error("duplicate value in row {0}")]
    DuplicateInRow(u8),
    /// The same value appears twice in this column.
    #[error("duplicate value in column {0}")]
    DuplicateInColumn(u8),
    /// A cell has neither a value nor any remaining candidate.
    #[error("cell ({col}, {row}) has no possible value")]
    EmptyCandidateCell {
        /// Column of the dead cell.
        col: u8,
        /// Row of the dead cell.
        row: u8,
    },
    /// A recorded inequality between two solved cells does not hold.
    #[error("cell {lesser:?} is not lesser than cell {greater:?}")]
    InequalityViolation {
        /// The endpoint recorded as the lesser cell, as `(col, row)`.
        lesser: (u8, u8),
        /// The endpoint recorded as the greater cell, as `(col, row)`.
        greater: (u8, u8),
    },
}

/// Recoverable signal that the grid state is inconsistent.
///
/// Raised by the propagation engine and caught by the backtracking guess
/// engine to discard the current branch. It never crosses the public API
/// as a panic; a contradictory top-level puzzle simply fails to solve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("contradictory grid state: {}", join_violations(.violations))]
pub struct Contradiction {
    /// Every broken invariant found in this detection pass.
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().join("; ")
}

/// The bounded loop whose iteration cap was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetKind {
    /// Row-fill backtracking during generation.
    FillRetries,
    /// Probabilistic reductions re-tried until the puzzle is solvable.
    InitRetries,
    /// Optimization iterations while minimizing givens.
    OptimizeIterations,
    /// Fixpoint passes of the propagation engine.
    PropagationPasses,
}

impl std::fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BudgetKind::FillRetries => "fill retries",
            BudgetKind::InitRetries => "init retries",
            BudgetKind::OptimizeIterations => "optimize iterations",
            BudgetKind::PropagationPasses => "propagation passes",
        };
        f.write_str(name)
    }
}

/// An iteration cap was exceeded before the operation could finish.
///
/// Deliberately distinct from "provably unsolvable": a caller receiving
/// this may retry with a fresh random seed or a larger budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("budget exhausted: {kind}")]
pub struct BudgetExhausted {
    /// Which bounded loop ran out.
    pub kind: BudgetKind,
}

impl BudgetExhausted {
    pub(crate) fn new(kind: BudgetKind) -> Self {
        BudgetExhausted { kind }
    }
}

/// Error for a single propagation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropagateError {
    /// The grid reached an inconsistent state.
    #[error(transparent)]
    Contradiction(#[from] Contradiction),
    /// The pass budget ran out before a fixpoint was reached.
    #[error(transparent)]
    Budget(#[from] BudgetExhausted),
}
