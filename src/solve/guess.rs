//! Backtracking guess engine.
//!
//! When propagation reaches a fixpoint with unsolved cells left, the
//! engine picks the cell with the fewest remaining candidates, saves
//! every cell's `(value, candidates)` under a fresh guess id and tries
//! each candidate in ascending order, recursing into propagation. The
//! recursion is an explicit frame stack so depth stays bounded by the
//! number of unsolved cells; guess ids are drawn from a session-wide
//! counter and increase strictly down the stack.

use crate::board::{CellId, Grid, ValueSet};
use crate::errors::{BudgetExhausted, PropagateError};
use crate::snapshot::GridState;
use crate::solve::propagate;

/// How far the search explores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Stop at the first solved branch and leave its state active.
    First,
    /// Count solved branches, short-circuiting once the count reaches the
    /// cap. Counting up to 2 is the uniqueness check.
    CountUpTo(u32),
}

/// Terminal result of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// A solved branch was found and its state is active on the grid.
    Solved,
    /// Every branch contradicted; the grid is back at its pre-guess state.
    Unsolvable,
    /// Number of distinct solved branches found (counting mode).
    Count(u32),
}

enum State {
    Propagating,
    Guessing,
    Backtracking,
}

/// Per-cell `(value, candidates)` save taken when a guess is opened.
/// Givens and relations never change during solving, so they are not
/// part of the frame.
struct GuessSave {
    values: Vec<Option<u8>>,
    candidates: Vec<ValueSet>,
}

impl GuessSave {
    fn capture(grid: &Grid) -> GuessSave {
        GuessSave {
            values: grid.cells().iter().map(|cell| cell.solved).collect(),
            candidates: grid.cells().iter().map(|cell| cell.candidates()).collect(),
        }
    }

    fn restore(&self, grid: &mut Grid) {
        for (index, cell) in grid.cells.iter_mut().enumerate() {
            cell.solved = self.values[index];
            cell.candidates = self.candidates[index];
        }
    }
}

struct Frame {
    guess_id: u64,
    cell: CellId,
    saved: GuessSave,
    remaining: std::vec::IntoIter<u8>,
}

pub(crate) struct GuessEngine<'a> {
    pub grid: &'a mut Grid,
    pub trace: &'a mut Vec<GridState>,
    pub next_guess_id: &'a mut u64,
    pub budget: &'a mut u32,
    pub mode: Mode,
}

impl<'a> GuessEngine<'a> {
    /// Runs the search to a terminal state.
    pub(crate) fn run(mut self) -> Result<Outcome, BudgetExhausted> {
        let cap = match self.mode {
            Mode::First => 1,
            Mode::CountUpTo(cap) => cap,
        };
        if cap == 0 {
            return Ok(Outcome::Count(0));
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut solutions = 0u32;
        let mut state = State::Propagating;

        loop {
            match state {
                State::Propagating => {
                    match propagate::run(self.grid, self.trace, self.budget) {
                        Ok(()) => {
                            if self.grid.is_complete() {
                                solutions += 1;
                                if let Mode::First = self.mode {
                                    return Ok(Outcome::Solved);
                                }
                                if solutions >= cap {
                                    Self::unwind(self.grid, &mut stack);
                                    return Ok(Outcome::Count(solutions));
                                }
                                state = State::Backtracking;
                            } else {
                                state = State::Guessing;
                            }
                        }
                        // a contradicted branch is pruned, not an error
                        Err(PropagateError::Contradiction(_)) => state = State::Backtracking,
                        Err(PropagateError::Budget(exhausted)) => {
                            Self::unwind(self.grid, &mut stack);
                            return Err(exhausted);
                        }
                    }
                }
                State::Guessing => match Self::pick_guess_cell(self.grid) {
                    Some(cell) => {
                        *self.next_guess_id += 1;
                        debug_assert!(stack
                            .last()
                            .map_or(true, |frame| frame.guess_id < *self.next_guess_id));
                        let candidates: Vec<u8> =
                            self.grid.cells[cell.index()].candidates().into_iter().collect();
                        stack.push(Frame {
                            guess_id: *self.next_guess_id,
                            cell,
                            saved: GuessSave::capture(self.grid),
                            remaining: candidates.into_iter(),
                        });
                        state = State::Backtracking;
                    }
                    // stalled with nothing left to guess at
                    None => state = State::Backtracking,
                },
                State::Backtracking => loop {
                    let frame = match stack.last_mut() {
                        Some(frame) => frame,
                        None => {
                            return Ok(match self.mode {
                                Mode::First => Outcome::Unsolvable,
                                Mode::CountUpTo(_) => Outcome::Count(solutions),
                            });
                        }
                    };
                    frame.saved.restore(self.grid);
                    match frame.remaining.next() {
                        Some(value) => {
                            self.grid.cells[frame.cell.index()].assign(value);
                            state = State::Propagating;
                            break;
                        }
                        // candidates exhausted; the restore above already
                        // rolled the grid back to the frame's save point
                        None => {
                            stack.pop();
                        }
                    }
                },
            }
        }
    }

    /// First cell in row-major order among those with the fewest
    /// remaining candidates (at least two).
    fn pick_guess_cell(grid: &Grid) -> Option<CellId> {
        let mut best: Option<(u8, CellId)> = None;
        for (index, cell) in grid.cells().iter().enumerate() {
            if cell.value().is_some() {
                continue;
            }
            let len = cell.candidates().len();
            if len < 2 {
                continue;
            }
            match best {
                Some((size, _)) if size <= len => {}
                _ => best = Some((len, CellId(index as u16))),
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn unwind(grid: &mut Grid, stack: &mut Vec<Frame>) {
        while let Some(frame) = stack.pop() {
            frame.saved.restore(grid);
        }
    }
}
