//! The grid and cell data model.
//!
//! Cells live in a dense arena owned by [`Grid`] and are addressed either
//! by `(col, row)` coordinates at the API boundary or by [`CellId`] arena
//! indices internally. Inequality relations are stored mutually on both
//! endpoint cells.

mod cell;
mod grid;
mod set;

pub use self::cell::{Cell, CellId};
pub use self::grid::{Grid, Relation};
pub use self::set::ValueSet;
