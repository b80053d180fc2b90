//! Engine-native dataset representations.

use serde::{Deserialize, Serialize};

use crate::schema::DatasetType;

/// Descriptive metadata carried alongside a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_name: Option<String>,
}

/// Incidence/total per dose group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DichotomousDataset {
    pub doses: Vec<f64>,
    pub ns: Vec<u32>,
    pub incidences: Vec<u32>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl DichotomousDataset {
    /// Observed proportion per dose group.
    pub fn proportions(&self) -> Vec<f64> {
        self.ns
            .iter()
            .zip(&self.incidences)
            .map(|(&n, &i)| if n == 0 { 0.0 } else { i as f64 / n as f64 })
            .collect()
    }
}

/// Summary statistics per dose group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousDataset {
    pub doses: Vec<f64>,
    pub ns: Vec<u32>,
    pub means: Vec<f64>,
    pub stdevs: Vec<f64>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

/// Per-subject observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousIndividualDataset {
    pub doses: Vec<f64>,
    pub responses: Vec<f64>,
    #[serde(default)]
    pub metadata: DatasetMetadata,
}

impl ContinuousIndividualDataset {
    /// Distinct doses in ascending order.
    pub fn unique_doses(&self) -> Vec<f64> {
        let mut doses = self.doses.clone();
        doses.sort_by(f64::total_cmp);
        doses.dedup();
        doses
    }
}

/// A dataset ready for the modeling engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dtype")]
pub enum Dataset {
    #[serde(rename = "D")]
    Dichotomous(DichotomousDataset),
    #[serde(rename = "C")]
    Continuous(ContinuousDataset),
    #[serde(rename = "CI")]
    ContinuousIndividual(ContinuousIndividualDataset),
}

impl Dataset {
    pub fn dtype(&self) -> DatasetType {
        match self {
            Dataset::Dichotomous(_) => DatasetType::Dichotomous,
            Dataset::Continuous(_) => DatasetType::Continuous,
            Dataset::ContinuousIndividual(_) => DatasetType::ContinuousIndividual,
        }
    }

    pub fn doses(&self) -> &[f64] {
        match self {
            Dataset::Dichotomous(d) => &d.doses,
            Dataset::Continuous(d) => &d.doses,
            Dataset::ContinuousIndividual(d) => &d.doses,
        }
    }

    /// Number of distinct dose groups.
    pub fn num_dose_groups(&self) -> usize {
        match self {
            Dataset::Dichotomous(d) => d.doses.len(),
            Dataset::Continuous(d) => d.doses.len(),
            Dataset::ContinuousIndividual(d) => d.unique_doses().len(),
        }
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        match self {
            Dataset::Dichotomous(d) => &d.metadata,
            Dataset::Continuous(d) => &d.metadata,
            Dataset::ContinuousIndividual(d) => &d.metadata,
        }
    }
}
