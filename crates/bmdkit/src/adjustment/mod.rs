//! Input handling for the survival and litter-effect adjustment tools.

mod polyk;
mod rao_scott;
mod table;

pub use polyk::{AdjustedAnimal, PolyKAdjustment, PolyKDoseSummary, PolyKInput};
pub use rao_scott::{RaoScottInput, Species};
