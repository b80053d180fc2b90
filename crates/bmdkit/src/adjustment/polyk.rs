//! Poly-k survival adjustment for tumor incidence data.
//!
//! Animals that die early without a tumor count as a fraction of an animal,
//! `(day / duration)^k`, so dose groups with early deaths are not penalised
//! for the shorter time at risk.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{Limit, Range};
use crate::validation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};

use super::table::{NumericTable, parse_table};

const COLUMNS: &[&str] = &["dose", "day", "has_tumor"];
const MAX_DATASET_CHARS: usize = 100_000;
const POWER: Range = Range::closed(0.0, 5.0);
const DURATION: Range = Range {
    lower: Some(Limit::Exclusive(0.0)),
    upper: Some(Limit::Inclusive(10_000.0)),
};

fn default_power() -> f64 {
    3.0
}

/// User input for a poly-k adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyKInput {
    /// Pasted `dose,day,has_tumor` table.
    pub dataset: String,
    pub dose_units: String,
    /// Poly-k exponent.
    #[serde(default = "default_power")]
    pub power: f64,
    /// Study length in days; defaults to the last observed day.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// One animal after adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedAnimal {
    pub dose: f64,
    pub day: f64,
    pub has_tumor: bool,
    pub weight: f64,
}

/// Adjusted counts for one dose group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyKDoseSummary {
    pub dose: f64,
    pub n: usize,
    pub incidence: usize,
    pub adjusted_n: f64,
    pub adjusted_proportion: f64,
}

/// Result of a poly-k adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyKAdjustment {
    pub power: f64,
    pub duration: f64,
    pub dose_units: String,
    pub adjusted_data: Vec<AdjustedAnimal>,
    pub summary: Vec<PolyKDoseSummary>,
}

impl PolyKInput {
    pub fn new(dataset: impl Into<String>, dose_units: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            dose_units: dose_units.into(),
            power: default_power(),
            duration: None,
        }
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Check every field, returning the parsed table.
    fn validate(&self) -> Result<NumericTable> {
        let mut errors = ValidationErrors::new();
        if let Some(message) = POWER.check(self.power) {
            errors.push(
                FieldViolation::new(vec![LocSegment::from("power")], ViolationKind::OutOfRange, message)
                    .with_input(self.power),
            );
        }
        if let Some(duration) = self.duration {
            if let Some(message) = DURATION.check(duration) {
                errors.push(
                    FieldViolation::new(
                        vec![LocSegment::from("duration")],
                        ViolationKind::OutOfRange,
                        message,
                    )
                    .with_input(duration),
                );
            }
        }

        match parse_table(&self.dataset, COLUMNS, MAX_DATASET_CHARS).and_then(check_values) {
            Ok(table) => errors.into_result(table),
            Err(table_errors) => {
                errors.extend_nested(&[], table_errors);
                Err(errors.into())
            }
        }
    }

    /// Validate the input and compute per-animal weights and per-dose totals.
    pub fn calculate(&self) -> Result<PolyKAdjustment> {
        let table = self.validate()?;

        let mut animals: Vec<(f64, f64, bool)> = table
            .rows
            .iter()
            .map(|row| (row[0], row[1], row[2] == 1.0))
            .collect();
        animals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let duration = self
            .duration
            .unwrap_or_else(|| animals.iter().map(|a| a.1).fold(0.0, f64::max));

        let adjusted_data: Vec<AdjustedAnimal> = animals
            .into_iter()
            .map(|(dose, day, has_tumor)| AdjustedAnimal {
                dose,
                day,
                has_tumor,
                weight: weight(day, has_tumor, duration, self.power),
            })
            .collect();

        let summary = summarize(&adjusted_data);
        tracing::debug!(
            animals = adjusted_data.len(),
            dose_groups = summary.len(),
            duration,
            "computed poly-k adjustment"
        );

        Ok(PolyKAdjustment {
            power: self.power,
            duration,
            dose_units: self.dose_units.clone(),
            adjusted_data,
            summary,
        })
    }
}

fn weight(day: f64, has_tumor: bool, duration: f64, power: f64) -> f64 {
    if has_tumor || day >= duration {
        1.0
    } else {
        (day / duration).powf(power)
    }
}

fn summarize(animals: &[AdjustedAnimal]) -> Vec<PolyKDoseSummary> {
    let mut summary: Vec<PolyKDoseSummary> = Vec::new();
    for animal in animals {
        if summary.last().is_none_or(|group| group.dose != animal.dose) {
            summary.push(PolyKDoseSummary {
                dose: animal.dose,
                n: 0,
                incidence: 0,
                adjusted_n: 0.0,
                adjusted_proportion: 0.0,
            });
        }
        let Some(group) = summary.last_mut() else {
            continue;
        };
        group.n += 1;
        group.adjusted_n += animal.weight;
        if animal.has_tumor {
            group.incidence += 1;
        }
    }
    for group in &mut summary {
        group.adjusted_proportion = if group.adjusted_n > 0.0 {
            group.incidence as f64 / group.adjusted_n
        } else {
            0.0
        };
    }
    summary
}

fn check_values(table: NumericTable) -> std::result::Result<NumericTable, ValidationErrors> {
    let fail = |message: &str| {
        ValidationErrors::single(FieldViolation::new(
            vec![LocSegment::from("dataset")],
            ViolationKind::Invalid,
            message,
        ))
    };

    if table.column(0).any(|d| d < 0.0) {
        return Err(fail("`doses` must be ≥ 0"));
    }
    if table.column(1).any(|d| d < 0.0) {
        return Err(fail("`day` must be ≥ 0"));
    }
    let has_zero = table.column(2).any(|v| v == 0.0);
    let has_one = table.column(2).any(|v| v == 1.0);
    let only_binary = table.column(2).all(|v| v == 0.0 || v == 1.0);
    if !(has_zero && has_one && only_binary) {
        return Err(fail("`has_tumor` must include only the values {0, 1}"));
    }
    Ok(table)
}
