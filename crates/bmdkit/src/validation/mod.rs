//! Options validation and structured violation reporting.

mod options;
mod violation;

pub use options::{
    ContinuousOption, DichotomousOption, NestedDichotomousOption, OptionRecord, OptionsBatch,
    validate_options,
};
pub use violation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};
