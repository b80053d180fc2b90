//! Poly-k command - survival-adjust tumor incidence data.

use std::path::PathBuf;

use bmdkit::PolyKInput;
use colored::Colorize;

use super::{CommandResult, read_text, report};

pub fn run(
    file: PathBuf,
    power: f64,
    duration: Option<f64>,
    dose_units: String,
    json: bool,
) -> CommandResult {
    let mut input = PolyKInput::new(read_text(&file)?, dose_units).with_power(power);
    if let Some(duration) = duration {
        input = input.with_duration(duration);
    }
    let result = input.calculate().map_err(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} k={} duration={} ({} animals)",
        "Poly-k adjustment".cyan().bold(),
        result.power,
        result.duration,
        result.adjusted_data.len()
    );
    println!();
    println!("{}", "  dose          n  incidence  adjusted_n  adjusted_proportion".yellow());
    for group in &result.summary {
        println!(
            "  {:<10} {:>4} {:>10} {:>11.3} {:>20.4}",
            group.dose, group.n, group.incidence, group.adjusted_n, group.adjusted_proportion
        );
    }
    Ok(())
}
