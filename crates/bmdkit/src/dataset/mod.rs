//! Dose-response datasets and their payload schemas.

mod schema;
mod types;

pub use schema::{
    ContinuousDatasetSchema, ContinuousIndividualDatasetSchema, DatasetSchema,
    DichotomousDatasetSchema, MIN_DOSE_GROUPS,
};
pub use types::{
    ContinuousDataset, ContinuousIndividualDataset, Dataset, DatasetMetadata, DichotomousDataset,
};
