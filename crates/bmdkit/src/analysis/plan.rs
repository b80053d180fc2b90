//! Expansion of a validated analysis into per-session engine inputs.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::BmdsConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::{DatasetType, PriorClassTag};
use crate::transform::{
    ModelListEntry, ModelSettings, build_model_settings, remap_bayesian_exponential,
    remap_exponential,
};

use super::input::{AnalysisInput, check_complete};

/// Models to fit under one prior class, with their settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorRun {
    pub prior_class: PriorClassTag,
    pub settings: ModelSettings,
    pub models: Vec<ModelListEntry>,
}

/// One dataset paired with one option record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPlan {
    pub dataset_index: usize,
    pub option_index: usize,
    pub dataset: Dataset,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frequentist: Vec<PriorRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bayesian: Option<PriorRun>,
}

/// All sessions an analysis expands to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPlan {
    pub analysis_name: String,
    pub dataset_type: DatasetType,
    /// `sha256:` digest of the canonical input document.
    pub fingerprint: String,
    pub sessions: Vec<SessionPlan>,
}

impl AnalysisPlan {
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total model fits across every session and prior class.
    pub fn model_count(&self) -> usize {
        self.sessions
            .iter()
            .map(|s| {
                s.frequentist.iter().map(|r| r.models.len()).sum::<usize>()
                    + s.bayesian.as_ref().map_or(0, |r| r.models.len())
            })
            .sum()
    }
}

/// Validate a complete analysis and expand it into sessions.
///
/// Sessions are ordered dataset-major; disabled datasets are skipped. The
/// input is never modified.
pub fn plan_sessions(input: &AnalysisInput, config: &BmdsConfig) -> Result<AnalysisPlan> {
    let checked = check_complete(input, config)?;
    let fingerprint = fingerprint(input)?;

    let frequentist_models = [
        (
            PriorClassTag::FrequentistRestricted,
            remap_exponential(&input.models.frequentist_restricted),
        ),
        (
            PriorClassTag::FrequentistUnrestricted,
            remap_exponential(&input.models.frequentist_unrestricted),
        ),
    ];
    let bayesian_models = remap_bayesian_exponential(&input.models.bayesian);

    let mut sessions = Vec::new();
    for (dataset_index, (dataset, dataset_options)) in checked
        .datasets
        .iter()
        .zip(&input.dataset_options)
        .enumerate()
    {
        if !dataset_options.enabled {
            continue;
        }
        for (option_index, option) in checked.options.iter().enumerate() {
            let build = |prior_class: PriorClassTag| {
                build_model_settings(checked.dataset_type, prior_class, option, dataset_options)
            };

            let mut frequentist = Vec::new();
            for (prior_class, models) in &frequentist_models {
                if models.is_empty() {
                    continue;
                }
                frequentist.push(PriorRun {
                    prior_class: *prior_class,
                    settings: build(*prior_class)?,
                    models: models
                        .iter()
                        .map(|m| ModelListEntry::new(m.clone(), None))
                        .collect(),
                });
            }

            let bayesian = if bayesian_models.is_empty() {
                None
            } else {
                Some(PriorRun {
                    prior_class: PriorClassTag::Bayesian,
                    settings: build(PriorClassTag::Bayesian)?,
                    models: bayesian_models.to_vec(),
                })
            };

            sessions.push(SessionPlan {
                dataset_index,
                option_index,
                dataset: dataset.clone(),
                frequentist,
                bayesian,
            });
        }
    }

    tracing::debug!(
        dataset_type = %checked.dataset_type,
        sessions = sessions.len(),
        %fingerprint,
        "planned analysis"
    );

    Ok(AnalysisPlan {
        analysis_name: input.analysis_name.clone(),
        dataset_type: checked.dataset_type,
        fingerprint,
        sessions,
    })
}

fn fingerprint(input: &AnalysisInput) -> Result<String> {
    let canonical = serde_json::to_vec(input)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("sha256:{:x}", hasher.finalize()))
}
