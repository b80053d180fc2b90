//! Settings command - build engine settings for one option record.

use std::path::PathBuf;

use bmdkit::{
    BmdsConfig, DatasetOptions, DatasetType, PriorClassTag, build_model_settings, load_json,
    validate_options,
};
use serde_json::Value;

use super::{CommandResult, report};

pub fn run(
    dataset_type: &str,
    prior_class: &str,
    option: PathBuf,
    dataset_options: PathBuf,
    config: &BmdsConfig,
) -> CommandResult {
    let dataset_type: DatasetType = dataset_type.parse()?;
    let prior_class: PriorClassTag = prior_class.parse()?;

    let record = load_json(&option)?;
    let batch = validate_options(dataset_type, &Value::Array(vec![record]), config).map_err(report)?;
    let dataset_options = DatasetOptions::from_value(&load_json(&dataset_options)?)?;

    let Some(record) = batch.get(0) else {
        return Err("option file produced no record".into());
    };
    let settings =
        build_model_settings(dataset_type, prior_class, record, &dataset_options).map_err(report)?;

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
