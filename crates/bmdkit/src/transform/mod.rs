//! Translation of validated input into engine configuration objects.

mod dataset;
mod models;
mod settings;

pub use dataset::build_dataset;
pub use models::{
    EXPONENTIAL, EXPONENTIAL_M3, EXPONENTIAL_M5, ModelListEntry, remap_bayesian_exponential,
    remap_exponential,
};
pub use settings::{
    ContinuousModelSettings, DatasetOptions, DichotomousModelSettings, ModelSettings,
    build_model_settings,
};
