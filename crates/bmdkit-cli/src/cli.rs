//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bmdkit: validate and plan benchmark dose analyses
#[derive(Parser)]
#[command(name = "bmdkit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use desktop limits regardless of BMDS_IS_DESKTOP
    #[arg(long, global = true)]
    pub desktop: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a batch of option records
    ValidateOptions {
        /// Dataset type tag (D, C, CI, ND, MT)
        #[arg(value_name = "DATASET_TYPE")]
        dataset_type: String,

        /// JSON file holding the array of option records
        #[arg(value_name = "OPTIONS_FILE")]
        file: PathBuf,
    },

    /// Build engine settings for one option record
    Settings {
        /// Dataset type tag (D, C, CI, MT)
        #[arg(value_name = "DATASET_TYPE")]
        dataset_type: String,

        /// frequentist_restricted, frequentist_unrestricted or bayesian
        #[arg(value_name = "PRIOR_CLASS")]
        prior_class: String,

        /// JSON file holding a single option record
        #[arg(value_name = "OPTION_FILE")]
        option: PathBuf,

        /// JSON file holding the dataset options
        #[arg(value_name = "DATASET_OPTIONS_FILE")]
        dataset_options: PathBuf,
    },

    /// Parse a dataset payload and summarize it
    Dataset {
        /// JSON file holding the dataset, with its `dtype`
        #[arg(value_name = "DATASET_FILE")]
        file: PathBuf,

        /// Print the engine dataset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an analysis and write its session plan
    Plan {
        /// Analysis JSON file
        #[arg(value_name = "ANALYSIS_FILE")]
        file: PathBuf,

        /// Output path for the plan (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Poly-k survival adjustment of tumor data
    Polyk {
        /// Table with columns dose, day, has_tumor
        #[arg(value_name = "DATA_FILE")]
        file: PathBuf,

        /// Poly-k exponent
        #[arg(short = 'k', long, default_value = "3")]
        power: f64,

        /// Study duration in days (default: last observed day)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Dose units label
        #[arg(long, default_value = "")]
        dose_units: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a Rao-Scott input table
    RaoScott {
        /// Table with columns dose, n, incidence
        #[arg(value_name = "DATA_FILE")]
        file: PathBuf,

        /// Test species (mouse, rat, rabbit)
        #[arg(short, long)]
        species: String,
    },
}
