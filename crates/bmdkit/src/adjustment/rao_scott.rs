//! Rao-Scott litter-effect correction input.
//!
//! Only the input side lives here: the pasted table is checked and turned into
//! a dichotomous dataset. The species-specific design effect is applied by the
//! modeling engine.

use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetMetadata, DichotomousDataset};
use crate::error::Result;
use crate::validation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};

use super::table::{NumericTable, parse_table};

const COLUMNS: &[&str] = &["dose", "n", "incidence"];
const MAX_DATASET_CHARS: usize = 10_000;

/// Test species; selects the design-effect regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Mouse,
    Rat,
    Rabbit,
}

impl std::str::FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mouse" => Ok(Species::Mouse),
            "rat" => Ok(Species::Rat),
            "rabbit" => Ok(Species::Rabbit),
            other => Err(format!("unknown species '{}'", other)),
        }
    }
}

/// User input for a Rao-Scott correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaoScottInput {
    /// Pasted `dose,n,incidence` table.
    pub dataset: String,
    pub species: Species,
}

impl RaoScottInput {
    pub fn new(dataset: impl Into<String>, species: Species) -> Self {
        Self {
            dataset: dataset.into(),
            species,
        }
    }

    /// Validate the table and return it as a dichotomous dataset sorted by dose.
    pub fn dataset(&self) -> Result<DichotomousDataset> {
        let table = parse_table(&self.dataset, COLUMNS, MAX_DATASET_CHARS)?;
        check_values(&table)?;

        let mut rows = table.rows;
        rows.sort_by(|a, b| a[0].total_cmp(&b[0]));

        let dataset = DichotomousDataset {
            doses: rows.iter().map(|r| r[0]).collect(),
            ns: rows.iter().map(|r| r[1] as u32).collect(),
            incidences: rows.iter().map(|r| r[2] as u32).collect(),
            metadata: DatasetMetadata::default(),
        };
        tracing::debug!(
            species = ?self.species,
            dose_groups = dataset.doses.len(),
            "validated rao-scott input"
        );
        Ok(dataset)
    }
}

fn check_values(table: &NumericTable) -> std::result::Result<(), ValidationErrors> {
    let fail = |message: &str| {
        ValidationErrors::single(FieldViolation::new(
            vec![LocSegment::from("dataset")],
            ViolationKind::Invalid,
            message,
        ))
    };
    let whole = |v: f64| v.fract() == 0.0 && v <= u32::MAX as f64;

    if table.column(0).any(|d| d < 0.0) {
        return Err(fail("`dose` must be ≥ 0"));
    }
    if table.column(1).any(|n| n <= 0.0) {
        return Err(fail("`n` must be > 0"));
    }
    if table.column(2).any(|i| i < 0.0) {
        return Err(fail("`incidence` must be ≥ 0"));
    }
    if !table.column(1).chain(table.column(2)).all(whole) {
        return Err(fail("`n` and `incidence` must be whole numbers"));
    }
    if table.rows.iter().any(|r| r[1] - r[2] < 0.0) {
        return Err(fail("`incidence` must be ≤ `n`"));
    }
    Ok(())
}
