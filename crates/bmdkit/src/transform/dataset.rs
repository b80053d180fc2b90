//! Dataset payload dispatch.

use serde_json::Value;

use crate::dataset::{
    ContinuousDatasetSchema, ContinuousIndividualDatasetSchema, Dataset, DatasetSchema,
    DichotomousDatasetSchema,
};
use crate::error::{BmdsError, Result};
use crate::loc;
use crate::schema::DatasetType;
use crate::validation::{FieldViolation, ValidationErrors, ViolationKind};

/// Parse a raw dataset payload (`{"dtype": ..., <arrays>}`) into a typed
/// [`Dataset`].
///
/// Recognized discriminators are `C`, `CI` and `D`; anything else fails with
/// [`BmdsError::UnknownDatasetType`].
pub fn build_dataset(payload: &Value) -> Result<Dataset> {
    let dtype = match payload.get("dtype") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            return Err(ValidationErrors::single(
                FieldViolation::new(loc!["dtype"], ViolationKind::InvalidType, "must be a string")
                    .with_input(other.clone()),
            )
            .into());
        }
        None => {
            return Err(ValidationErrors::single(FieldViolation::new(
                loc!["dtype"],
                ViolationKind::Missing,
                "field required",
            ))
            .into());
        }
    };

    let dataset = match dtype.parse::<DatasetType>()? {
        DatasetType::Continuous => ContinuousDatasetSchema::parse(payload)?,
        DatasetType::ContinuousIndividual => ContinuousIndividualDatasetSchema::parse(payload)?,
        DatasetType::Dichotomous => DichotomousDatasetSchema::parse(payload)?,
        DatasetType::NestedDichotomous | DatasetType::MultiTumor => {
            return Err(BmdsError::UnknownDatasetType(dtype.to_string()));
        }
    };

    tracing::debug!(
        dtype = %dataset.dtype(),
        dose_groups = dataset.num_dose_groups(),
        "built dataset"
    );
    Ok(dataset)
}
