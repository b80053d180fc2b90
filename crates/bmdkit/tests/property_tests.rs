//! Property-based tests for model list rewriting and batch validation.
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p bmdkit --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{Value, json};

use bmdkit::transform::{EXPONENTIAL, EXPONENTIAL_M3, EXPONENTIAL_M5};
use bmdkit::{
    BmdsConfig, DatasetType, ModelListEntry, remap_bayesian_exponential, remap_exponential,
    validate_options,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Model names, with the generic exponential identifier mixed in.
fn model_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(EXPONENTIAL.to_string()),
        Just("hill".to_string()),
        Just("power".to_string()),
        Just("linear".to_string()),
        "[a-z_]{1,12}",
    ]
}

fn model_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(model_name(), 0..10)
}

fn bayesian_list() -> impl Strategy<Value = Vec<ModelListEntry>> {
    prop::collection::vec(
        (model_name(), prop::option::of(0.0f64..=1.0))
            .prop_map(|(model, weight)| ModelListEntry::new(model, weight)),
        0..10,
    )
}

fn dichotomous_record(confidence_level: f64) -> Value {
    json!({"bmr_type": 0, "bmr_value": 0.1, "confidence_level": confidence_level})
}

// =============================================================================
// Remap Properties
// =============================================================================

proptest! {
    #[test]
    fn remap_without_exponential_is_borrowed(models in model_list()) {
        prop_assume!(!models.iter().any(|m| m == EXPONENTIAL));
        let remapped = remap_exponential(&models);
        prop_assert!(matches!(remapped, std::borrow::Cow::Borrowed(_)));
        prop_assert_eq!(&*remapped, models.as_slice());
    }

    #[test]
    fn remap_expands_first_exponential_only(models in model_list()) {
        let original = models.clone();
        let remapped = remap_exponential(&models);

        match original.iter().position(|m| m == EXPONENTIAL) {
            None => prop_assert_eq!(remapped.len(), original.len()),
            Some(pos) => {
                prop_assert_eq!(remapped.len(), original.len() + 1);
                prop_assert_eq!(&remapped[..pos], &original[..pos]);
                prop_assert_eq!(remapped[pos].as_str(), EXPONENTIAL_M3);
                prop_assert_eq!(remapped[pos + 1].as_str(), EXPONENTIAL_M5);
                prop_assert_eq!(&remapped[pos + 2..], &original[pos + 1..]);
            }
        }
        prop_assert_eq!(models, original);
    }

    #[test]
    fn bayesian_remap_preserves_total_weight(models in bayesian_list()) {
        let original = models.clone();
        let remapped = remap_bayesian_exponential(&models);

        let total = |entries: &[ModelListEntry]| {
            entries.iter().filter_map(|m| m.prior_weight).sum::<f64>()
        };
        prop_assert!((total(&remapped) - total(&original)).abs() < 1e-9);

        if let Some(pos) = original.iter().position(|m| m.model == EXPONENTIAL) {
            prop_assert_eq!(remapped[pos].prior_weight, remapped[pos + 1].prior_weight);
            prop_assert_eq!(remapped[pos].prior_weight, original[pos].prior_weight.map(|w| w / 2.0));
        }
        prop_assert_eq!(models, original);
    }
}

// =============================================================================
// Validation Properties
// =============================================================================

proptest! {
    #[test]
    fn batch_length_bounds(len in 0usize..20, desktop in any::<bool>()) {
        let config = if desktop { BmdsConfig::desktop() } else { BmdsConfig::hosted() };
        let payload = Value::Array(vec![dichotomous_record(0.95); len]);
        let result = validate_options(DatasetType::Dichotomous, &payload, &config);
        prop_assert_eq!(result.is_ok(), len >= 1 && len <= config.max_options());
    }

    #[test]
    fn confidence_level_open_interval(level in 0.0f64..1.5) {
        let payload = json!([dichotomous_record(level)]);
        let result = validate_options(DatasetType::Dichotomous, &payload, &BmdsConfig::hosted());
        prop_assert_eq!(result.is_ok(), level > 0.5 && level < 1.0);
    }

    #[test]
    fn validator_never_panics(payload in arbitrary_json()) {
        for dataset_type in DatasetType::ALL {
            let _ = validate_options(dataset_type, &payload, &BmdsConfig::hosted());
        }
    }
}

/// Shallow JSON values of every kind.
fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-10.0f64..10.0).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map("[a-z_]{1,20}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}
