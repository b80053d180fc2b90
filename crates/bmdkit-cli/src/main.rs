//! bmdkit CLI - validate and plan benchmark dose analyses.

mod cli;
mod commands;

use bmdkit::BmdsConfig;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = config(cli.desktop).and_then(|config| match cli.command {
        Commands::ValidateOptions { dataset_type, file } => {
            commands::options::run(&dataset_type, file, &config)
        }

        Commands::Settings {
            dataset_type,
            prior_class,
            option,
            dataset_options,
        } => commands::settings::run(&dataset_type, &prior_class, option, dataset_options, &config),

        Commands::Dataset { file, json } => commands::dataset::run(file, json, cli.verbose),

        Commands::Plan { file, output } => commands::plan::run(file, output, &config, cli.verbose),

        Commands::Polyk {
            file,
            power,
            duration,
            dose_units,
            json,
        } => commands::polyk::run(file, power, duration, dose_units, json),

        Commands::RaoScott { file, species } => commands::rao_scott::run(file, &species),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn config(desktop: bool) -> Result<BmdsConfig, Box<dyn std::error::Error>> {
    let config = if desktop {
        BmdsConfig::desktop()
    } else {
        BmdsConfig::from_env()?
    };
    tracing::debug!(mode = ?config.mode, max_options = config.max_options(), "deployment config");
    Ok(config)
}
