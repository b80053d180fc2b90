//! Model settings construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BmdsError, Result};
use crate::loc;
use crate::schema::{
    AdverseDirection, ContinuousRiskType, DatasetType, DichotomousRiskType, DistType, ModelFamily,
    PriorClass, PriorClassTag,
};
use crate::validation::{FieldViolation, OptionRecord, ValidationErrors, ViolationKind};

fn default_enabled() -> bool {
    true
}

/// Per-dataset fields that live outside the options batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<i64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Polynomial/multistage degree; 0 lets the engine choose.
    #[serde(default)]
    pub degree: u32,
    /// Required for continuous datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adverse_direction: Option<AdverseDirection>,
}

impl DatasetOptions {
    pub fn new(degree: u32) -> Self {
        Self {
            dataset_id: None,
            enabled: true,
            degree,
            adverse_direction: None,
        }
    }

    pub fn with_adverse_direction(mut self, direction: AdverseDirection) -> Self {
        self.adverse_direction = Some(direction);
        self
    }

    /// Parse a dataset-options object. An adverse direction outside
    /// {-1, 0, 1} fails with [`BmdsError::UnknownAdverseDirection`].
    pub fn from_value(value: &Value) -> Result<Self> {
        if let Some(code) = value.get("adverse_direction").and_then(Value::as_i64) {
            AdverseDirection::from_code(code)?;
        }
        Ok(Self::deserialize(value)?)
    }
}

/// Settings for dichotomous-family models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DichotomousModelSettings {
    pub bmr: f64,
    pub alpha: f64,
    pub bmr_type: DichotomousRiskType,
    pub degree: u32,
    pub priors: PriorClass,
}

/// Settings for continuous-family models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousModelSettings {
    pub bmr: f64,
    pub alpha: f64,
    #[serde(rename = "tailProb")]
    pub tail_prob: f64,
    pub bmr_type: ContinuousRiskType,
    #[serde(rename = "disttype")]
    pub dist_type: DistType,
    pub degree: u32,
    pub is_increasing: Option<bool>,
    pub priors: PriorClass,
}

/// Engine settings for one model fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelSettings {
    Dichotomous(DichotomousModelSettings),
    Continuous(ContinuousModelSettings),
}

impl ModelSettings {
    pub fn bmr(&self) -> f64 {
        match self {
            ModelSettings::Dichotomous(s) => s.bmr,
            ModelSettings::Continuous(s) => s.bmr,
        }
    }

    pub fn alpha(&self) -> f64 {
        match self {
            ModelSettings::Dichotomous(s) => s.alpha,
            ModelSettings::Continuous(s) => s.alpha,
        }
    }

    pub fn degree(&self) -> u32 {
        match self {
            ModelSettings::Dichotomous(s) => s.degree,
            ModelSettings::Continuous(s) => s.degree,
        }
    }

    pub fn priors(&self) -> PriorClass {
        match self {
            ModelSettings::Dichotomous(s) => s.priors,
            ModelSettings::Continuous(s) => s.priors,
        }
    }
}

/// Build engine settings from one validated option record.
///
/// Dichotomous-family dataset types produce [`DichotomousModelSettings`],
/// continuous-family types produce [`ContinuousModelSettings`]; nested
/// dichotomous is rejected with [`BmdsError::UnknownDatasetType`]. The
/// significance level is `1 - confidence_level`.
pub fn build_model_settings(
    dataset_type: DatasetType,
    prior_class: PriorClassTag,
    options: &OptionRecord,
    dataset_options: &DatasetOptions,
) -> Result<ModelSettings> {
    let priors = prior_class.prior_class();
    let family = dataset_type.family();
    if family == ModelFamily::NestedDichotomous {
        return Err(BmdsError::UnknownDatasetType(dataset_type.tag().to_string()));
    }
    if options.family() != family {
        return Err(mismatch(dataset_type));
    }

    let alpha = 1.0 - options.confidence_level();
    let settings = match options {
        OptionRecord::Dichotomous(o) => ModelSettings::Dichotomous(DichotomousModelSettings {
            bmr: o.bmr_value,
            alpha,
            bmr_type: o.bmr_type,
            degree: dataset_options.degree,
            priors,
        }),
        OptionRecord::Continuous(o) => {
            let Some(direction) = dataset_options.adverse_direction else {
                return Err(ValidationErrors::single(FieldViolation::new(
                    loc!["dataset_options", "adverse_direction"],
                    ViolationKind::Missing,
                    "adverse_direction is required for continuous datasets",
                ))
                .into());
            };
            ModelSettings::Continuous(ContinuousModelSettings {
                bmr: o.bmr_value,
                alpha,
                tail_prob: o.tail_probability,
                bmr_type: o.bmr_type,
                dist_type: o.dist_type,
                degree: dataset_options.degree,
                is_increasing: direction.is_increasing(),
                priors,
            })
        }
        OptionRecord::NestedDichotomous(_) => return Err(mismatch(dataset_type)),
    };

    tracing::debug!(
        dataset_type = %dataset_type,
        prior_class = %prior_class,
        bmr = settings.bmr(),
        alpha = settings.alpha(),
        "built model settings"
    );
    Ok(settings)
}

fn mismatch(dataset_type: DatasetType) -> BmdsError {
    ValidationErrors::single(FieldViolation::new(
        loc!["options"],
        ViolationKind::Invalid,
        format!("option record does not match dataset type {}", dataset_type),
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{ContinuousOption, DichotomousOption};

    fn continuous_option() -> OptionRecord {
        OptionRecord::Continuous(ContinuousOption {
            bmr_type: ContinuousRiskType::StandardDeviation,
            bmr_value: 1.5,
            tail_probability: 0.4,
            confidence_level: 0.95,
            dist_type: DistType::Normal,
        })
    }

    #[test]
    fn test_continuous_settings() {
        let options = DatasetOptions::new(0).with_adverse_direction(AdverseDirection::Automatic);
        let settings = build_model_settings(
            DatasetType::Continuous,
            PriorClassTag::FrequentistRestricted,
            &continuous_option(),
            &options,
        )
        .unwrap();

        let ModelSettings::Continuous(s) = settings else {
            panic!("expected continuous settings");
        };
        assert_eq!(s.bmr_type, ContinuousRiskType::StandardDeviation);
        assert!((s.bmr - 1.5).abs() < 1e-12);
        assert!((s.alpha - 0.05).abs() < 1e-12);
        assert!((s.tail_prob - 0.4).abs() < 1e-12);
        assert_eq!(s.degree, 0);
        assert_eq!(s.is_increasing, None);
        assert_eq!(s.priors, PriorClass::FrequentistRestricted);
    }

    #[test]
    fn test_continuous_serializes_engine_keys() {
        let options = DatasetOptions::new(2).with_adverse_direction(AdverseDirection::Up);
        let settings = build_model_settings(
            DatasetType::ContinuousIndividual,
            PriorClassTag::Bayesian,
            &continuous_option(),
            &options,
        )
        .unwrap();
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["tailProb"], 0.4);
        assert_eq!(value["disttype"], 1);
        assert_eq!(value["is_increasing"], true);
        assert_eq!(value["priors"], 2);
        assert_eq!(value["bmr_type"], 2);
    }

    #[test]
    fn test_continuous_requires_adverse_direction() {
        let result = build_model_settings(
            DatasetType::Continuous,
            PriorClassTag::Bayesian,
            &continuous_option(),
            &DatasetOptions::new(0),
        );
        assert!(matches!(result, Err(BmdsError::Validation(_))));
    }

    #[test]
    fn test_dataset_options_from_value() {
        let options =
            DatasetOptions::from_value(&serde_json::json!({"degree": 2, "adverse_direction": 1}))
                .unwrap();
        assert_eq!(options.degree, 2);
        assert!(options.enabled);
        assert_eq!(options.adverse_direction, Some(AdverseDirection::Up));

        let err = DatasetOptions::from_value(&serde_json::json!({"degree": 0, "adverse_direction": 2}))
            .unwrap_err();
        assert!(matches!(err, BmdsError::UnknownAdverseDirection(2)));

        let err = DatasetOptions::from_value(&serde_json::json!({"degree": "two"})).unwrap_err();
        assert!(matches!(err, BmdsError::Json(_)));
    }

    #[test]
    fn test_dichotomous_settings() {
        let record = OptionRecord::Dichotomous(DichotomousOption {
            bmr_type: DichotomousRiskType::AddedRisk,
            bmr_value: 0.15,
            confidence_level: 0.95,
        });
        let settings = build_model_settings(
            DatasetType::Dichotomous,
            PriorClassTag::FrequentistRestricted,
            &record,
            &DatasetOptions::new(1),
        )
        .unwrap();
        let ModelSettings::Dichotomous(s) = settings else {
            panic!("expected dichotomous settings");
        };
        assert_eq!(s.bmr_type, DichotomousRiskType::AddedRisk);
        assert!((s.bmr - 0.15).abs() < 1e-12);
        assert!((s.alpha - 0.05).abs() < 1e-12);
        assert_eq!(s.degree, 1);
    }

    #[test]
    fn test_nested_dichotomous_rejected() {
        let record = OptionRecord::Dichotomous(DichotomousOption {
            bmr_type: DichotomousRiskType::ExtraRisk,
            bmr_value: 0.1,
            confidence_level: 0.95,
        });
        let result = build_model_settings(
            DatasetType::NestedDichotomous,
            PriorClassTag::Bayesian,
            &record,
            &DatasetOptions::new(0),
        );
        assert!(matches!(result, Err(BmdsError::UnknownDatasetType(ref t)) if t == "ND"));
    }

    #[test]
    fn test_record_family_mismatch() {
        let result = build_model_settings(
            DatasetType::Dichotomous,
            PriorClassTag::Bayesian,
            &continuous_option(),
            &DatasetOptions::new(0),
        );
        assert!(matches!(result, Err(BmdsError::Validation(_))));
    }
}
