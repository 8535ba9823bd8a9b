//! Fixpoint constraint propagation.
//!
//! One pass applies three reduction rules in a fixed order, interleaved
//! with value elimination, and the loop repeats until a full pass changes
//! nothing. Every rule application appends one [`GridState`] capture to
//! the solve trace and is followed by contradiction detection.

use itertools::Itertools;

use crate::board::{CellId, Grid, ValueSet};
use crate::errors::{BudgetExhausted, BudgetKind, Contradiction, PropagateError};
use crate::snapshot::GridState;

/// Runs propagation to a fixpoint, drawing passes from `budget`.
///
/// Returns `Ok` once a full pass produces no change. Runs out of budget
/// with `BudgetExhausted { kind: PropagationPasses }`, which is reported
/// distinctly from "stalled": a stalled-but-consistent grid is an `Ok`
/// fixpoint with unsolved cells left over.
pub(crate) fn run(
    grid: &mut Grid,
    trace: &mut Vec<GridState>,
    budget: &mut u32,
) -> Result<(), PropagateError> {
    loop {
        if *budget == 0 {
            return Err(BudgetExhausted::new(BudgetKind::PropagationPasses).into());
        }
        *budget -= 1;

        let mut changed = false;
        changed |= reduce_by_value(grid, trace)?;
        changed |= reduce_by_inequality(grid, trace)?;
        changed |= reduce_by_value(grid, trace)?;
        changed |= reduce_lines(grid, trace, Line::Rows)?;
        changed |= reduce_by_value(grid, trace)?;
        changed |= reduce_lines(grid, trace, Line::Columns)?;
        changed |= reduce_by_value(grid, trace)?;

        if !changed {
            return Ok(());
        }
    }
}

enum Line {
    Rows,
    Columns,
}

/// Value elimination: every effective value is removed from the candidate
/// sets of all peers in its row and column. Candidate sets that collapse
/// to a single value are promoted to solved values, and the rule loops
/// until those promotions stop producing new eliminations.
fn reduce_by_value(grid: &mut Grid, trace: &mut Vec<GridState>) -> Result<bool, Contradiction> {
    let mut changed_any = false;
    loop {
        let mut changed = false;
        for index in 0..grid.cells.len() {
            let value = match grid.cells[index].value() {
                Some(value) => value,
                None => continue,
            };
            for peer in grid.peer_ids(CellId(index as u16)) {
                let cell = &mut grid.cells[peer.index()];
                if cell.candidates.remove(value) {
                    changed = true;
                    cell.simplify();
                }
            }
        }

        trace.push(GridState::capture(grid));
        grid.check_contradictions()?;

        changed_any |= changed;
        if !changed {
            return Ok(changed_any);
        }
    }
}

/// Inequality tightening: for each recorded relation, the lesser cell
/// loses every candidate at or above the greater side's greatest possible
/// value, and the greater cell loses every candidate at or below the
/// lesser side's least possible value.
fn reduce_by_inequality(
    grid: &mut Grid,
    trace: &mut Vec<GridState>,
) -> Result<bool, Contradiction> {
    let mut changed = false;
    for index in 0..grid.cells.len() {
        if grid.cells[index].value().is_some() {
            continue;
        }

        let greater_partners = grid.cells[index].less_than.clone();
        for partner in greater_partners {
            if let Some(bound) = grid.cells[partner.index()].greatest_possible() {
                changed |= grid.cells[index].candidates.remove_at_or_above(bound);
            }
        }

        let lesser_partners = grid.cells[index].greater_than.clone();
        for partner in lesser_partners {
            if let Some(bound) = grid.cells[partner.index()].least_possible() {
                changed |= grid.cells[index].candidates.remove_at_or_below(bound);
            }
        }

        grid.cells[index].simplify();
    }

    trace.push(GridState::capture(grid));
    grid.check_contradictions()?;
    Ok(changed)
}

/// Line elimination, applied per row or per column: a candidate value
/// occurring in exactly one cell of the line is forced into that cell
/// (naked single), and two cells sharing an identical two-value candidate
/// set knock those values out of every other cell in the line (naked
/// pair).
fn reduce_lines(
    grid: &mut Grid,
    trace: &mut Vec<GridState>,
    which: Line,
) -> Result<bool, Contradiction> {
    let size = grid.size();
    let lines: Vec<Vec<CellId>> = (0..size)
        .map(|i| match which {
            Line::Rows => grid.row_ids(i).collect(),
            Line::Columns => grid.col_ids(i).collect(),
        })
        .collect();

    let mut changed = false;
    for line in &lines {
        // occurrences of each candidate value across the line
        let mut counts = vec![0u8; size as usize + 1];
        for &id in line {
            for value in grid.cells[id.index()].candidates() {
                counts[value as usize] += 1;
            }
        }

        for value in 1..=size {
            if counts[value as usize] != 1 {
                continue;
            }
            for &id in line {
                let cell = &mut grid.cells[id.index()];
                if cell.candidates.contains(value) {
                    cell.assign(value);
                    changed = true;
                }
            }
        }

        let pair_counts = line
            .iter()
            .map(|&id| grid.cells[id.index()].candidates())
            .filter(|candidates| candidates.len() == 2)
            .counts();
        for (&pair, &count) in &pair_counts {
            if count != 2 {
                continue;
            }
            for &id in line {
                let cell = &mut grid.cells[id.index()];
                if cell.candidates == pair {
                    continue;
                }
                for value in pair {
                    if cell.candidates.remove(value) {
                        changed = true;
                        cell.simplify();
                    }
                }
            }
        }
    }

    trace.push(GridState::capture(grid));
    grid.check_contradictions()?;
    Ok(changed)
}
