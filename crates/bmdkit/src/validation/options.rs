//! Options batch validation.
//!
//! Each dataset family has its own option record schema; dichotomous and
//! multi-tumor analyses share one. A batch is accepted only when its length
//! is within the deployment's bounds and every record is valid.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BmdsConfig;
use crate::error::Result;
use crate::loc;
use crate::schema::{
    ContinuousRiskType, DatasetType, DichotomousRiskType, DistType, FieldRule,
    LitterSpecificCovariate, ModelFamily, Range, check_length, check_record,
};

use super::violation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};

/// Confidence level bounds shared by every option schema.
const CONFIDENCE_LEVEL: Range = Range::open(0.5, 1.0);

const DICHOTOMOUS_RULES: &[FieldRule] = &[
    FieldRule::choice("bmr_type", DichotomousRiskType::VALUES),
    FieldRule::float("bmr_value"),
    FieldRule::float("confidence_level").within(CONFIDENCE_LEVEL),
];

const CONTINUOUS_RULES: &[FieldRule] = &[
    FieldRule::choice("bmr_type", ContinuousRiskType::VALUES),
    FieldRule::float("bmr_value"),
    FieldRule::float("tail_probability").within(Range::open(0.0, 1.0)),
    FieldRule::float("confidence_level").within(CONFIDENCE_LEVEL),
    FieldRule::choice("dist_type", DistType::VALUES),
];

const NESTED_DICHOTOMOUS_RULES: &[FieldRule] = &[
    FieldRule::choice("bmr_type", DichotomousRiskType::VALUES),
    FieldRule::float("bmr_value"),
    FieldRule::float("confidence_level").within(CONFIDENCE_LEVEL),
    FieldRule::choice("litter_specific_covariate", LitterSpecificCovariate::VALUES),
    FieldRule::integer("bootstrap_iterations"),
    FieldRule::integer("bootstrap_seed"),
];

/// Modeling options for dichotomous and multi-tumor datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DichotomousOption {
    pub bmr_type: DichotomousRiskType,
    pub bmr_value: f64,
    pub confidence_level: f64,
}

/// Modeling options for continuous datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousOption {
    pub bmr_type: ContinuousRiskType,
    pub bmr_value: f64,
    pub tail_probability: f64,
    pub confidence_level: f64,
    pub dist_type: DistType,
}

/// Modeling options for nested dichotomous datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedDichotomousOption {
    pub bmr_type: DichotomousRiskType,
    pub bmr_value: f64,
    pub confidence_level: f64,
    pub litter_specific_covariate: LitterSpecificCovariate,
    pub bootstrap_iterations: i64,
    pub bootstrap_seed: i64,
}

/// One validated modeling configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Dichotomous(DichotomousOption),
    Continuous(ContinuousOption),
    NestedDichotomous(NestedDichotomousOption),
}

impl OptionRecord {
    pub fn family(&self) -> ModelFamily {
        match self {
            OptionRecord::Dichotomous(_) => ModelFamily::Dichotomous,
            OptionRecord::Continuous(_) => ModelFamily::Continuous,
            OptionRecord::NestedDichotomous(_) => ModelFamily::NestedDichotomous,
        }
    }

    pub fn bmr_value(&self) -> f64 {
        match self {
            OptionRecord::Dichotomous(o) => o.bmr_value,
            OptionRecord::Continuous(o) => o.bmr_value,
            OptionRecord::NestedDichotomous(o) => o.bmr_value,
        }
    }

    pub fn confidence_level(&self) -> f64 {
        match self {
            OptionRecord::Dichotomous(o) => o.confidence_level,
            OptionRecord::Continuous(o) => o.confidence_level,
            OptionRecord::NestedDichotomous(o) => o.confidence_level,
        }
    }

    /// Parse a record that already passed its family's rules.
    fn parse(family: ModelFamily, value: &Value) -> std::result::Result<Self, serde_json::Error> {
        Ok(match family {
            ModelFamily::Dichotomous => OptionRecord::Dichotomous(from_value(value)?),
            ModelFamily::Continuous => OptionRecord::Continuous(from_value(value)?),
            ModelFamily::NestedDichotomous => OptionRecord::NestedDichotomous(from_value(value)?),
        })
    }
}

fn from_value<T: DeserializeOwned>(value: &Value) -> std::result::Result<T, serde_json::Error> {
    T::deserialize(value)
}

fn rules_for(family: ModelFamily) -> &'static [FieldRule] {
    match family {
        ModelFamily::Dichotomous => DICHOTOMOUS_RULES,
        ModelFamily::Continuous => CONTINUOUS_RULES,
        ModelFamily::NestedDichotomous => NESTED_DICHOTOMOUS_RULES,
    }
}

/// A validated, non-empty batch of option records for one dataset type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsBatch {
    dataset_type: DatasetType,
    options: Vec<OptionRecord>,
}

impl OptionsBatch {
    pub fn dataset_type(&self) -> DatasetType {
        self.dataset_type
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OptionRecord> {
        self.options.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionRecord> {
        self.options.iter()
    }

    pub fn into_records(self) -> Vec<OptionRecord> {
        self.options
    }
}

/// Validate an options payload (the JSON array of option records) for
/// `dataset_type`.
///
/// Every violation in the batch is reported; no record is accepted unless all
/// of them are valid.
pub fn validate_options(
    dataset_type: DatasetType,
    payload: &Value,
    config: &BmdsConfig,
) -> Result<OptionsBatch> {
    let loc = loc!["options"];
    let Some(items) = payload.as_array() else {
        return Err(ValidationErrors::single(
            FieldViolation::new(loc, ViolationKind::InvalidType, "must be a list")
                .with_input(payload.clone()),
        )
        .into());
    };

    let family = dataset_type.family();
    let rules = rules_for(family);
    let mut errors = ValidationErrors::new();

    check_length(items, 1, config.max_options(), &loc, &mut errors);

    let mut options = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let mut item_loc = loc.clone();
        item_loc.push(LocSegment::Index(index));

        let before = errors.len();
        if check_record(item, rules, &item_loc, &mut errors).is_none() || errors.len() > before {
            continue;
        }
        match OptionRecord::parse(family, item) {
            Ok(record) => options.push(record),
            Err(e) => errors.push(FieldViolation::new(item_loc, ViolationKind::Invalid, e.to_string())),
        }
    }

    if !errors.is_empty() {
        tracing::debug!(
            dataset_type = %dataset_type,
            violations = errors.len(),
            "options batch rejected"
        );
    }

    let batch = errors.into_result(OptionsBatch {
        dataset_type,
        options,
    })?;
    tracing::debug!(dataset_type = %dataset_type, count = batch.len(), "options batch validated");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BmdsError;
    use serde_json::json;

    fn continuous(confidence_level: f64) -> Value {
        json!({
            "bmr_type": 2,
            "bmr_value": 1.0,
            "tail_probability": 0.01,
            "confidence_level": confidence_level,
            "dist_type": 1
        })
    }

    fn violations(result: Result<OptionsBatch>) -> ValidationErrors {
        match result {
            Err(BmdsError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_dichotomous_batch() {
        let payload = json!([{"bmr_type": 1, "bmr_value": 0.1, "confidence_level": 0.95}]);
        let batch = validate_options(DatasetType::Dichotomous, &payload, &BmdsConfig::hosted()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.get(0),
            Some(&OptionRecord::Dichotomous(DichotomousOption {
                bmr_type: DichotomousRiskType::ExtraRisk,
                bmr_value: 0.1,
                confidence_level: 0.95,
            }))
        );
    }

    #[test]
    fn test_multi_tumor_uses_dichotomous_schema() {
        let payload = json!([{"bmr_type": 0, "bmr_value": 0.1, "confidence_level": 0.9}]);
        let batch = validate_options(DatasetType::MultiTumor, &payload, &BmdsConfig::hosted()).unwrap();
        assert_eq!(batch.get(0).unwrap().family(), ModelFamily::Dichotomous);
    }

    #[test]
    fn test_confidence_level_boundary() {
        let config = BmdsConfig::hosted();
        assert!(validate_options(DatasetType::Continuous, &json!([continuous(0.95)]), &config).is_ok());

        let errors = violations(validate_options(
            DatasetType::Continuous,
            &json!([continuous(0.5)]),
            &config,
        ));
        assert_eq!(errors.len(), 1);
        let v = errors.iter().next().unwrap();
        assert_eq!(v.path(), "options.0.confidence_level");
        assert_eq!(v.kind, ViolationKind::OutOfRange);
    }

    #[test]
    fn test_reports_violations_across_records() {
        let payload = json!([
            continuous(0.95),
            {"bmr_type": 9, "bmr_value": 1.0, "tail_probability": 1.0, "confidence_level": 0.95, "dist_type": 1},
            {"bmr_type": 2, "bmr_value": "x", "confidence_level": 0.95, "dist_type": 1},
        ]);
        let errors = violations(validate_options(DatasetType::Continuous, &payload, &BmdsConfig::hosted()));

        let paths: Vec<_> = errors.iter().map(|v| v.path()).collect();
        assert_eq!(
            paths,
            vec![
                "options.1.bmr_type",
                "options.1.tail_probability",
                "options.2.bmr_value",
                "options.2.tail_probability",
            ]
        );
    }

    #[test]
    fn test_nested_dichotomous_record() {
        let payload = json!([{
            "bmr_type": 1,
            "bmr_value": 0.1,
            "confidence_level": 0.95,
            "litter_specific_covariate": 1,
            "bootstrap_iterations": 1000,
            "bootstrap_seed": 0
        }]);
        let batch =
            validate_options(DatasetType::NestedDichotomous, &payload, &BmdsConfig::hosted()).unwrap();
        match batch.get(0).unwrap() {
            OptionRecord::NestedDichotomous(o) => {
                assert_eq!(o.litter_specific_covariate, LitterSpecificCovariate::OverallMean);
                assert_eq!(o.bootstrap_iterations, 1000);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_payload_must_be_list() {
        let errors = violations(validate_options(
            DatasetType::Dichotomous,
            &json!({"bmr_type": 1}),
            &BmdsConfig::hosted(),
        ));
        assert_eq!(errors.iter().next().unwrap().kind, ViolationKind::InvalidType);
    }
}
