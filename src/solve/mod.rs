//! The solving machinery: fixpoint propagation plus backtracking search.

pub(crate) mod guess;
pub(crate) mod propagate;

/// Cap on propagation fixpoint passes for a single solve run.
pub const PROPAGATION_PASS_LIMIT: u32 = 10_000;

/// Result of a [`Futoshiki::solve`](crate::Futoshiki::solve) run that
/// stayed within its pass budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveResult {
    /// Whether a complete, consistent assignment was found.
    pub solved: bool,
    /// Fixpoint passes actually used, across all backtracking branches.
    pub iterations: u32,
}
