//! CLI command implementations.

pub mod dataset;
pub mod options;
pub mod plan;
pub mod polyk;
pub mod rao_scott;
pub mod settings;

use std::path::Path;

use bmdkit::BmdsError;
use colored::Colorize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print every violation of a validation failure and shorten the error that
/// reaches `main`. Other errors pass through unchanged.
pub fn report(err: BmdsError) -> Box<dyn std::error::Error> {
    let violations = match err {
        BmdsError::Validation(violations) => violations,
        other => return other.into(),
    };
    eprintln!("{}", "Validation failed:".red().bold());
    for violation in violations.iter() {
        let path = violation.path();
        let path = if path.is_empty() { "(document)".to_string() } else { path };
        eprintln!(
            "  {} {} {}",
            path.yellow(),
            format!("[{}]", violation.kind.label()).dimmed(),
            violation.message
        );
    }
    format!("{} validation error(s)", violations.len()).into()
}

/// Read a pasted table file.
pub fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path).map_err(|source| {
        BmdsError::Io {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}
