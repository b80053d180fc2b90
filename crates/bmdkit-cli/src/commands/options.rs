//! Validate-options command - check a batch of option records.

use std::path::PathBuf;

use bmdkit::{BmdsConfig, DatasetType, OptionRecord, load_json, validate_options};
use colored::Colorize;

use super::{CommandResult, report};

pub fn run(dataset_type: &str, file: PathBuf, config: &BmdsConfig) -> CommandResult {
    let dataset_type: DatasetType = dataset_type.parse()?;
    let payload = load_json(&file)?;

    let batch = validate_options(dataset_type, &payload, config).map_err(report)?;

    println!(
        "{} {} option record(s) for dataset type {} (limit {})",
        "Accepted".green().bold(),
        batch.len().to_string().white().bold(),
        dataset_type,
        config.max_options()
    );
    for (index, record) in batch.iter().enumerate() {
        let family = match record {
            OptionRecord::Dichotomous(_) => "dichotomous",
            OptionRecord::Continuous(_) => "continuous",
            OptionRecord::NestedDichotomous(_) => "nested dichotomous",
        };
        println!(
            "  {:>3}  {:20} bmr={} confidence={}",
            index,
            family,
            record.bmr_value(),
            record.confidence_level()
        );
    }
    Ok(())
}
