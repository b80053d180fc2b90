//! Typed vocabulary and declarative field rules.

mod rules;
mod types;

pub use rules::{FieldKind, FieldRule, Limit, Range, check_length, check_record};
pub use types::{
    AdverseDirection, ContinuousRiskType, DatasetType, DichotomousRiskType, DistType,
    LitterSpecificCovariate, ModelFamily, PriorClass, PriorClassTag,
};
