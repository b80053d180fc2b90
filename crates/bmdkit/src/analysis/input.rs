//! Analysis input documents and their validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BmdsConfig;
use crate::dataset::Dataset;
use crate::error::{BmdsError, Result};
use crate::loc;
use crate::schema::DatasetType;
use crate::transform::{DatasetOptions, ModelListEntry, build_dataset};
use crate::validation::{
    FieldViolation, LocSegment, OptionsBatch, ValidationErrors, ViolationKind, validate_options,
};

/// Models selected per prior regime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSelection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequentist_restricted: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frequentist_unrestricted: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bayesian: Vec<ModelListEntry>,
}

impl ModelSelection {
    pub fn is_empty(&self) -> bool {
        self.frequentist_restricted.is_empty()
            && self.frequentist_unrestricted.is_empty()
            && self.bayesian.is_empty()
    }
}

/// A user-submitted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub analysis_name: String,
    #[serde(default)]
    pub analysis_description: String,
    pub dataset_type: String,
    #[serde(default)]
    pub models: ModelSelection,
    /// Raw dataset payloads, each carrying a `dtype` discriminator.
    #[serde(default)]
    pub datasets: Vec<Value>,
    /// One entry per dataset, matched by position.
    #[serde(default)]
    pub dataset_options: Vec<DatasetOptions>,
    /// Raw option records.
    #[serde(default)]
    pub options: Vec<Value>,
}

impl AnalysisInput {
    /// Parsed dataset type tag.
    pub fn dataset_type(&self) -> Result<DatasetType> {
        self.dataset_type.parse()
    }
}

/// Everything a complete analysis resolves to.
#[derive(Debug, Clone)]
pub(crate) struct CheckedAnalysis {
    pub dataset_type: DatasetType,
    pub datasets: Vec<Dataset>,
    pub options: OptionsBatch,
}

/// Validate an analysis document.
///
/// With `partial` set only the document structure and the dataset type tag
/// are checked, which is what drafts saved mid-edit need. Otherwise the
/// analysis must be runnable: at least one model and one dataset, one
/// dataset-options entry per dataset, and valid datasets and options.
pub fn validate_input(value: &Value, partial: bool, config: &BmdsConfig) -> Result<AnalysisInput> {
    let input = AnalysisInput::deserialize(value).map_err(|e| {
        ValidationErrors::single(FieldViolation::new(Vec::new(), ViolationKind::InvalidType, e.to_string()))
    })?;
    input.dataset_type()?;

    if !partial {
        check_complete(&input, config)?;
    }
    Ok(input)
}

pub(crate) fn check_complete(input: &AnalysisInput, config: &BmdsConfig) -> Result<CheckedAnalysis> {
    let dataset_type = input.dataset_type()?;
    let mut errors = ValidationErrors::new();

    if input.models.is_empty() {
        errors.push(FieldViolation::new(
            loc!["models"],
            ViolationKind::TooShort,
            "at least one model must be selected",
        ));
    }
    if input.datasets.is_empty() {
        errors.push(FieldViolation::new(
            loc!["datasets"],
            ViolationKind::TooShort,
            "at least one dataset is required",
        ));
    }
    if input.dataset_options.len() != input.datasets.len() {
        errors.push(FieldViolation::new(
            loc!["dataset_options"],
            ViolationKind::LengthMismatch,
            format!(
                "expected {} entries (one per dataset), found {}",
                input.datasets.len(),
                input.dataset_options.len()
            ),
        ));
    }
    if dataset_type.is_continuous() {
        for (index, options) in input.dataset_options.iter().enumerate() {
            if options.adverse_direction.is_none() {
                errors.push(FieldViolation::new(
                    loc!["dataset_options", index, "adverse_direction"],
                    ViolationKind::Missing,
                    "adverse_direction is required for continuous datasets",
                ));
            }
        }
    }

    let mut datasets = Vec::with_capacity(input.datasets.len());
    for (index, payload) in input.datasets.iter().enumerate() {
        let prefix = [LocSegment::from("datasets"), LocSegment::Index(index)];
        match build_dataset(payload) {
            Ok(dataset) if dataset.dtype().family() != dataset_type.family() => {
                errors.push(FieldViolation::new(
                    loc!["datasets", index, "dtype"],
                    ViolationKind::Invalid,
                    format!(
                        "dataset type {} cannot be used in a {} analysis",
                        dataset.dtype(),
                        dataset_type
                    ),
                ));
            }
            Ok(dataset) => datasets.push(dataset),
            Err(BmdsError::Validation(nested)) => errors.extend_nested(&prefix, nested),
            Err(other) => return Err(other),
        }
    }

    let options = match validate_options(dataset_type, &Value::Array(input.options.clone()), config) {
        Ok(options) => Some(options),
        Err(BmdsError::Validation(nested)) => {
            errors.extend_nested(&[], nested);
            None
        }
        Err(other) => return Err(other),
    };

    match options {
        Some(options) if errors.is_empty() => Ok(CheckedAnalysis {
            dataset_type,
            datasets,
            options,
        }),
        _ => Err(errors.into()),
    }
}
