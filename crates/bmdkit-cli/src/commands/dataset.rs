//! Dataset command - parse a dataset payload and summarize it.

use std::path::PathBuf;

use bmdkit::{Dataset, build_dataset, load_json};
use colored::Colorize;

use super::{CommandResult, report};

pub fn run(file: PathBuf, json: bool, verbose: bool) -> CommandResult {
    let dataset = build_dataset(&load_json(&file)?).map_err(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
        return Ok(());
    }

    println!(
        "{} {} dataset with {} dose group(s)",
        "Valid".green().bold(),
        dataset.dtype().to_string().white().bold(),
        dataset.num_dose_groups()
    );
    if let Some(name) = &dataset.metadata().name {
        println!("  name: {}", name);
    }

    if verbose {
        println!();
        match &dataset {
            Dataset::Dichotomous(d) => {
                println!("{}", "  dose        n  incidence  proportion".yellow());
                for (i, p) in d.proportions().iter().enumerate() {
                    println!("  {:<8} {:>4} {:>10} {:>11.4}", d.doses[i], d.ns[i], d.incidences[i], p);
                }
            }
            Dataset::Continuous(d) => {
                println!("{}", "  dose        n        mean       stdev".yellow());
                for i in 0..d.doses.len() {
                    println!(
                        "  {:<8} {:>4} {:>11.4} {:>11.4}",
                        d.doses[i], d.ns[i], d.means[i], d.stdevs[i]
                    );
                }
            }
            Dataset::ContinuousIndividual(d) => {
                println!("  {} responses", d.responses.len());
                println!("  doses: {:?}", d.unique_doses());
            }
        }
    }
    Ok(())
}
