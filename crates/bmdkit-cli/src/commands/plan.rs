//! Plan command - validate an analysis and expand it into sessions.

use std::fs;
use std::path::PathBuf;

use bmdkit::{BmdsConfig, BmdsError, load_analysis, plan_sessions};
use colored::Colorize;

use super::{CommandResult, report};

pub fn run(file: PathBuf, output: Option<PathBuf>, config: &BmdsConfig, verbose: bool) -> CommandResult {
    let input = load_analysis(&file, false, config).map_err(report)?;
    let plan = plan_sessions(&input, config).map_err(report)?;

    if verbose {
        for session in &plan.sessions {
            let runs: Vec<_> = session
                .frequentist
                .iter()
                .chain(session.bayesian.as_ref())
                .map(|r| format!("{}({})", r.prior_class, r.models.len()))
                .collect();
            eprintln!(
                "  dataset {} / option {}: {}",
                session.dataset_index,
                session.option_index,
                runs.join(", ")
            );
        }
    }

    let json = serde_json::to_string_pretty(&plan)?;
    match output {
        Some(path) => {
            fs::write(&path, json).map_err(|source| BmdsError::Io {
                path: path.clone(),
                source,
            })?;
            eprintln!(
                "{} {} session(s), {} model fit(s) to {}",
                "Planned".green().bold(),
                plan.session_count(),
                plan.model_count(),
                path.display().to_string().white()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
