//! bmdkit: input validation and engine translation for benchmark dose analyses.
//!
//! A dose-response analysis arrives as loosely typed JSON. This crate checks
//! it against the option and dataset schemas of its dataset type, reports
//! every violation with its location, and translates the validated pieces
//! into the settings, datasets and model lists a modeling engine consumes.
//!
//! # Example
//!
//! ```no_run
//! use bmdkit::{BmdsConfig, DatasetType, validate_options};
//! use serde_json::json;
//!
//! let config = BmdsConfig::from_env().unwrap();
//! let payload = json!([{"bmr_type": 1, "bmr_value": 0.1, "confidence_level": 0.95}]);
//! let batch = validate_options(DatasetType::Dichotomous, &payload, &config).unwrap();
//!
//! println!("Options: {}", batch.len());
//! ```

pub mod adjustment;
pub mod analysis;
pub mod config;
pub mod dataset;
pub mod document;
pub mod error;
pub mod schema;
pub mod transform;
pub mod validation;

pub use adjustment::{PolyKAdjustment, PolyKInput, RaoScottInput, Species};
pub use analysis::{AnalysisInput, AnalysisPlan, plan_sessions, validate_input};
pub use config::{BmdsConfig, DeploymentMode};
pub use dataset::{Dataset, DatasetSchema};
pub use document::{load_analysis, load_json};
pub use error::{BmdsError, Result};
pub use schema::{AdverseDirection, DatasetType, ModelFamily, PriorClass, PriorClassTag};
pub use transform::{
    DatasetOptions, ModelListEntry, ModelSettings, build_dataset, build_model_settings,
    remap_bayesian_exponential, remap_exponential,
};
pub use validation::{FieldViolation, OptionRecord, OptionsBatch, ValidationErrors, validate_options};
