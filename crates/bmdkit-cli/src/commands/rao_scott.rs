//! Rao-Scott command - check a litter-effect correction input.

use std::path::PathBuf;

use bmdkit::{RaoScottInput, Species};
use colored::Colorize;

use super::{CommandResult, read_text, report};

pub fn run(file: PathBuf, species: &str) -> CommandResult {
    let species: Species = species.parse()?;
    let input = RaoScottInput::new(read_text(&file)?, species);
    let dataset = input.dataset().map_err(report)?;

    println!(
        "{} {} dose group(s) for {:?}",
        "Valid".green().bold(),
        dataset.doses.len(),
        input.species
    );
    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}
