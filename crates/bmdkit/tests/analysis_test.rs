//! Analysis documents loaded from disk, validated and planned.

use std::fs;

use bmdkit::{BmdsConfig, BmdsError, ModelSettings, load_analysis, plan_sessions};
use serde_json::json;
use tempfile::TempDir;

fn write_analysis(dir: &TempDir, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("analysis.json");
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn dichotomous_analysis() -> serde_json::Value {
    json!({
        "analysis_name": "hepatocellular adenoma",
        "dataset_type": "D",
        "models": {
            "frequentist_restricted": ["multistage", "weibull"],
            "frequentist_unrestricted": ["logistic"],
            "bayesian": [{"model": "logprobit", "prior_weight": 1.0}]
        },
        "datasets": [
            {"dtype": "D", "doses": [0, 50, 100, 200], "ns": [20, 20, 20, 20],
             "incidences": [0, 2, 5, 11], "metadata": {"name": "males"}},
            {"dtype": "D", "doses": [0, 50, 100, 200], "ns": [20, 20, 20, 20],
             "incidences": [1, 1, 3, 8], "metadata": {"name": "females"}}
        ],
        "dataset_options": [
            {"dataset_id": 1, "degree": 2},
            {"dataset_id": 2, "degree": 3}
        ],
        "options": [
            {"bmr_type": 1, "bmr_value": 0.1, "confidence_level": 0.95},
            {"bmr_type": 0, "bmr_value": 0.05, "confidence_level": 0.9}
        ]
    })
}

#[test]
fn test_plan_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_analysis(&dir, &dichotomous_analysis());
    let config = BmdsConfig::hosted();

    let input = load_analysis(&path, false, &config).unwrap();
    let plan = plan_sessions(&input, &config).unwrap();

    assert_eq!(plan.session_count(), 4);
    assert_eq!(plan.model_count(), 4 * (2 + 1 + 1));

    let session = &plan.sessions[3];
    assert_eq!((session.dataset_index, session.option_index), (1, 1));
    assert_eq!(session.dataset.metadata().name.as_deref(), Some("females"));
    for run in &session.frequentist {
        match &run.settings {
            ModelSettings::Dichotomous(s) => {
                assert_eq!(s.degree, 3);
                assert!((s.alpha - 0.1).abs() < 1e-9);
            }
            other => panic!("unexpected settings {:?}", other),
        }
    }
}

#[test]
fn test_desktop_mode_allows_large_batches() {
    let mut value = dichotomous_analysis();
    value["options"] = json!(vec![json!({"bmr_type": 1, "bmr_value": 0.1, "confidence_level": 0.95}); 10]);
    let dir = TempDir::new().unwrap();
    let path = write_analysis(&dir, &value);

    let err = load_analysis(&path, false, &BmdsConfig::hosted()).unwrap_err();
    assert_eq!(err.violations().unwrap().iter().next().unwrap().path(), "options");

    let input = load_analysis(&path, false, &BmdsConfig::desktop()).unwrap();
    let plan = plan_sessions(&input, &BmdsConfig::desktop()).unwrap();
    assert_eq!(plan.session_count(), 20);
}

#[test]
fn test_partial_draft_loads_but_cannot_plan() {
    let dir = TempDir::new().unwrap();
    let path = write_analysis(&dir, &json!({"analysis_name": "draft", "dataset_type": "CI"}));
    let config = BmdsConfig::hosted();

    let input = load_analysis(&path, true, &config).unwrap();
    assert!(matches!(plan_sessions(&input, &config), Err(BmdsError::Validation(_))));
}

#[test]
fn test_violations_serialize_with_locations() {
    let mut value = dichotomous_analysis();
    value["datasets"][1]["incidences"][2] = json!(30);
    let dir = TempDir::new().unwrap();
    let path = write_analysis(&dir, &value);

    let err = load_analysis(&path, false, &BmdsConfig::hosted()).unwrap_err();
    let report = serde_json::to_value(err.violations().unwrap()).unwrap();
    assert_eq!(report[0]["loc"], json!(["datasets", 1, "incidences", 2]));
}
