//! Analysis documents: validation and session planning.

mod input;
mod plan;

pub use input::{AnalysisInput, ModelSelection, validate_input};
pub use plan::{AnalysisPlan, PriorRun, SessionPlan, plan_sessions};
