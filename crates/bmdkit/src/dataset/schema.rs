//! Payload schemas for each recognized dataset type.
//!
//! Parsing runs in two steps: a structural parse (field presence and JSON
//! types) followed by range and shape checks that report every violation.
//! Conversion into a [`Dataset`] after both steps cannot fail.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::Result;
use crate::validation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};

use super::types::{
    ContinuousDataset, ContinuousIndividualDataset, Dataset, DatasetMetadata, DichotomousDataset,
};

/// Minimum number of dose groups a dataset must have.
pub const MIN_DOSE_GROUPS: usize = 3;

/// A dataset payload schema.
pub trait DatasetSchema: DeserializeOwned {
    /// Push every shape/range violation.
    fn check(&self, errors: &mut ValidationErrors);

    /// Convert into the engine representation.
    fn into_dataset(self) -> Dataset;

    /// Parse, check, and convert a payload.
    fn parse(payload: &Value) -> Result<Dataset> {
        let schema = Self::deserialize(payload).map_err(structural_violation)?;
        let mut errors = ValidationErrors::new();
        schema.check(&mut errors);
        errors.into_result(schema.into_dataset())
    }
}

fn structural_violation(err: serde_json::Error) -> ValidationErrors {
    let message = err.to_string();
    let kind = if message.starts_with("missing field") {
        ViolationKind::Missing
    } else {
        ViolationKind::InvalidType
    };
    ValidationErrors::single(FieldViolation::new(Vec::new(), kind, message))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DichotomousDatasetSchema {
    pub doses: Vec<f64>,
    pub ns: Vec<f64>,
    pub incidences: Vec<f64>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl DatasetSchema for DichotomousDatasetSchema {
    fn check(&self, errors: &mut ValidationErrors) {
        check_parallel(
            &[
                ("doses", self.doses.len()),
                ("ns", self.ns.len()),
                ("incidences", self.incidences.len()),
            ],
            errors,
        );
        check_min_groups("doses", self.doses.len(), errors);
        check_non_negative("doses", &self.doses, errors);
        check_counts("ns", &self.ns, true, errors);
        check_counts("incidences", &self.incidences, false, errors);
        for (i, (&incidence, &n)) in self.incidences.iter().zip(&self.ns).enumerate() {
            if n > 0.0 && incidence > n {
                errors.push(
                    FieldViolation::new(
                        vec![LocSegment::from("incidences"), LocSegment::Index(i)],
                        ViolationKind::OutOfRange,
                        format!("incidence must be less than or equal to n ({})", n),
                    )
                    .with_input(incidence),
                );
            }
        }
    }

    fn into_dataset(self) -> Dataset {
        Dataset::Dichotomous(DichotomousDataset {
            doses: self.doses,
            ns: to_counts(&self.ns),
            incidences: to_counts(&self.incidences),
            metadata: self.metadata,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContinuousDatasetSchema {
    pub doses: Vec<f64>,
    pub ns: Vec<f64>,
    pub means: Vec<f64>,
    pub stdevs: Vec<f64>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl DatasetSchema for ContinuousDatasetSchema {
    fn check(&self, errors: &mut ValidationErrors) {
        check_parallel(
            &[
                ("doses", self.doses.len()),
                ("ns", self.ns.len()),
                ("means", self.means.len()),
                ("stdevs", self.stdevs.len()),
            ],
            errors,
        );
        check_min_groups("doses", self.doses.len(), errors);
        check_non_negative("doses", &self.doses, errors);
        check_counts("ns", &self.ns, true, errors);
        check_non_negative("stdevs", &self.stdevs, errors);
    }

    fn into_dataset(self) -> Dataset {
        Dataset::Continuous(ContinuousDataset {
            doses: self.doses,
            ns: to_counts(&self.ns),
            means: self.means,
            stdevs: self.stdevs,
            metadata: self.metadata,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContinuousIndividualDatasetSchema {
    pub doses: Vec<f64>,
    pub responses: Vec<f64>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl DatasetSchema for ContinuousIndividualDatasetSchema {
    fn check(&self, errors: &mut ValidationErrors) {
        check_parallel(
            &[("doses", self.doses.len()), ("responses", self.responses.len())],
            errors,
        );
        let mut unique = self.doses.clone();
        unique.sort_by(f64::total_cmp);
        unique.dedup();
        check_min_groups("doses", unique.len(), errors);
        check_non_negative("doses", &self.doses, errors);
    }

    fn into_dataset(self) -> Dataset {
        Dataset::ContinuousIndividual(ContinuousIndividualDataset {
            doses: self.doses,
            responses: self.responses,
            metadata: self.metadata,
        })
    }
}

/// Every array must match the length of the first.
fn check_parallel(fields: &[(&'static str, usize)], errors: &mut ValidationErrors) {
    let Some(&(first_name, expected)) = fields.first() else {
        return;
    };
    for &(name, len) in &fields[1..] {
        if len != expected {
            errors.push(
                FieldViolation::new(
                    vec![LocSegment::from(name)],
                    ViolationKind::LengthMismatch,
                    format!("length {} does not match `{}` length {}", len, first_name, expected),
                )
                .with_input(json!(len)),
            );
        }
    }
}

fn check_min_groups(name: &'static str, groups: usize, errors: &mut ValidationErrors) {
    if groups < MIN_DOSE_GROUPS {
        errors.push(
            FieldViolation::new(
                vec![LocSegment::from(name)],
                ViolationKind::TooShort,
                format!("at least {} dose groups are required, found {}", MIN_DOSE_GROUPS, groups),
            )
            .with_input(json!(groups)),
        );
    }
}

fn check_non_negative(name: &'static str, values: &[f64], errors: &mut ValidationErrors) {
    for (i, &value) in values.iter().enumerate() {
        if value < 0.0 {
            errors.push(
                FieldViolation::new(
                    vec![LocSegment::from(name), LocSegment::Index(i)],
                    ViolationKind::OutOfRange,
                    "must be greater than or equal to 0",
                )
                .with_input(value),
            );
        }
    }
}

/// Counts must be whole numbers that fit a `u32`; `ns` must also be positive.
fn check_counts(
    name: &'static str,
    values: &[f64],
    positive: bool,
    errors: &mut ValidationErrors,
) {
    for (i, &value) in values.iter().enumerate() {
        let loc = vec![LocSegment::from(name), LocSegment::Index(i)];
        let violation = if value.fract() != 0.0 || value > u32::MAX as f64 {
            FieldViolation::new(loc, ViolationKind::InvalidType, "must be a whole number")
        } else if positive && value <= 0.0 {
            FieldViolation::new(loc, ViolationKind::OutOfRange, "must be greater than 0")
        } else if value < 0.0 {
            FieldViolation::new(loc, ViolationKind::OutOfRange, "must be greater than or equal to 0")
        } else {
            continue;
        };
        errors.push(violation.with_input(value));
    }
}

/// Only called after `check_counts` accepted every value.
fn to_counts(values: &[f64]) -> Vec<u32> {
    values.iter().map(|&v| v as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BmdsError;

    fn errors_of(result: Result<Dataset>) -> ValidationErrors {
        match result {
            Err(BmdsError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_dichotomous_checks_collect_all() {
        let payload = json!({
            "doses": [0, -1, 10],
            "ns": [10, 0, 10, 10],
            "incidences": [0, 0, 11]
        });
        let errors = errors_of(DichotomousDatasetSchema::parse(&payload));
        let paths: Vec<_> = errors.iter().map(|v| v.path()).collect();
        assert_eq!(paths, vec!["ns", "doses.1", "ns.1", "incidences.2"]);
    }

    #[test]
    fn test_bad_counts_reported_with_other_violations() {
        let payload = json!({"doses": [-1, 10, 20], "ns": [10, -5, 10], "incidences": [0, 1, 2]});
        let errors = errors_of(DichotomousDatasetSchema::parse(&payload));
        let paths: Vec<_> = errors.iter().map(|v| v.path()).collect();
        assert_eq!(paths, vec!["doses.0", "ns.1"]);
    }

    #[test]
    fn test_fractional_and_negative_counts() {
        let payload = json!({
            "doses": [0, 1, 2],
            "ns": [10.5, 10, 10],
            "incidences": [0, -1, 2]
        });
        let errors = errors_of(DichotomousDatasetSchema::parse(&payload));
        let found: Vec<_> = errors.iter().map(|v| (v.path(), v.kind)).collect();
        assert_eq!(
            found,
            vec![
                ("ns.0".to_string(), ViolationKind::InvalidType),
                ("incidences.1".to_string(), ViolationKind::OutOfRange),
            ]
        );

        let payload = json!({
            "doses": [0, 1, 2],
            "ns": [10, 0, 10],
            "means": [1, 2, 3],
            "stdevs": [1, 1, 1]
        });
        let errors = errors_of(ContinuousDatasetSchema::parse(&payload));
        assert_eq!(errors.iter().next().unwrap().path(), "ns.1");
    }

    #[test]
    fn test_counts_convert_to_integers() {
        let payload = json!({"doses": [0, 1, 2], "ns": [10, 10.0, 10], "incidences": [0, 1, 2]});
        let Dataset::Dichotomous(dataset) = DichotomousDatasetSchema::parse(&payload).unwrap() else {
            panic!("expected dichotomous dataset");
        };
        assert_eq!(dataset.ns, vec![10, 10, 10]);
        assert_eq!(dataset.incidences, vec![0, 1, 2]);
    }

    #[test]
    fn test_structural_error_is_single_violation() {
        let errors = errors_of(ContinuousDatasetSchema::parse(&json!({"doses": [0, 1, 2]})));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().kind, ViolationKind::Missing);
    }

    #[test]
    fn test_individual_requires_three_unique_doses() {
        let payload = json!({"doses": [0, 0, 1, 1], "responses": [1, 2, 3, 4]});
        let errors = errors_of(ContinuousIndividualDatasetSchema::parse(&payload));
        assert_eq!(errors.iter().next().unwrap().kind, ViolationKind::TooShort);

        let payload = json!({"doses": [0, 1, 2, 2], "responses": [1, 2, 3, 4]});
        let dataset = ContinuousIndividualDatasetSchema::parse(&payload).unwrap();
        assert_eq!(dataset.num_dose_groups(), 3);
    }
}
