//! Model list rewriting.
//!
//! A user-facing "exponential" selection stands for two engine models, M3 and
//! M5. Both rewrites expand only the first occurrence per call and never touch
//! the caller's list; an unchanged list is returned borrowed.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Generic exponential model identifier.
pub const EXPONENTIAL: &str = "exponential";
/// Exponential model, M3 variant.
pub const EXPONENTIAL_M3: &str = "exponential_m3";
/// Exponential model, M5 variant.
pub const EXPONENTIAL_M5: &str = "exponential_m5";

/// A Bayesian model selection with an optional prior weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelListEntry {
    pub model: String,
    #[serde(default)]
    pub prior_weight: Option<f64>,
}

impl ModelListEntry {
    pub fn new(model: impl Into<String>, prior_weight: Option<f64>) -> Self {
        Self {
            model: model.into(),
            prior_weight,
        }
    }
}

/// Replace the first `exponential` identifier with `exponential_m3`,
/// `exponential_m5`.
pub fn remap_exponential<S: AsRef<str>>(models: &[S]) -> Cow<'_, [S]>
where
    S: Clone + From<&'static str>,
{
    let Some(pos) = models.iter().position(|m| m.as_ref() == EXPONENTIAL) else {
        return Cow::Borrowed(models);
    };

    let mut remapped = Vec::with_capacity(models.len() + 1);
    remapped.extend_from_slice(&models[..pos]);
    remapped.push(S::from(EXPONENTIAL_M3));
    remapped.push(S::from(EXPONENTIAL_M5));
    remapped.extend_from_slice(&models[pos + 1..]);
    Cow::Owned(remapped)
}

/// Replace the first `exponential` entry with M3 and M5 entries, each carrying
/// half of the original prior weight. An absent weight stays absent.
pub fn remap_bayesian_exponential(models: &[ModelListEntry]) -> Cow<'_, [ModelListEntry]> {
    let Some(pos) = models.iter().position(|m| m.model == EXPONENTIAL) else {
        return Cow::Borrowed(models);
    };

    // TODO: revisit the even split once continuous model averaging is supported
    let weight = models[pos].prior_weight.map(|w| w / 2.0);
    let mut remapped = Vec::with_capacity(models.len() + 1);
    remapped.extend_from_slice(&models[..pos]);
    remapped.push(ModelListEntry::new(EXPONENTIAL_M3, weight));
    remapped.push(ModelListEntry::new(EXPONENTIAL_M5, weight));
    remapped.extend_from_slice(&models[pos + 1..]);
    Cow::Owned(remapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_exponential() {
        let empty: Vec<String> = Vec::new();
        assert!(remap_exponential(&empty).is_empty());

        assert_eq!(
            remap_exponential(&["exponential"]).as_ref(),
            &["exponential_m3", "exponential_m5"]
        );

        let models = vec!["a".to_string(), "exponential".to_string(), "b".to_string()];
        let remapped = remap_exponential(&models);
        assert_eq!(remapped.as_ref(), &["a", "exponential_m3", "exponential_m5", "b"]);
        assert_eq!(models, vec!["a", "exponential", "b"]);
    }

    #[test]
    fn test_unchanged_list_is_borrowed() {
        let models = ["hill", "power"];
        assert!(matches!(remap_exponential(&models), Cow::Borrowed(_)));
    }

    #[test]
    fn test_only_first_occurrence_expanded() {
        let models = ["exponential", "exponential"];
        assert_eq!(
            remap_exponential(&models).as_ref(),
            &["exponential_m3", "exponential_m5", "exponential"]
        );
    }

    #[test]
    fn test_remap_bayesian_splits_weight() {
        let models = vec![ModelListEntry::new("exponential", Some(1.0))];
        let remapped = remap_bayesian_exponential(&models);
        assert_eq!(
            remapped.as_ref(),
            &[
                ModelListEntry::new("exponential_m3", Some(0.5)),
                ModelListEntry::new("exponential_m5", Some(0.5)),
            ]
        );
        assert_eq!(models, vec![ModelListEntry::new("exponential", Some(1.0))]);
    }

    #[test]
    fn test_remap_bayesian_absent_weight() {
        let models = vec![
            ModelListEntry::new("hill", Some(0.5)),
            ModelListEntry::new("exponential", None),
        ];
        let remapped = remap_bayesian_exponential(&models);
        assert_eq!(remapped[1], ModelListEntry::new("exponential_m3", None));
        assert_eq!(remapped[2], ModelListEntry::new("exponential_m5", None));
        assert_eq!(remapped[0], models[0]);
    }
}
