use anyhow::Context;
use clap::{Parser, Subcommand};
use meteo_core::{
    Config, ConfigurationViewModel, DeleteOutcome, DialogOutcome, ForecastSettings,
    MeteoViewModel, Region, SqliteRegionRepository, WeatherbitProvider, config::DEFAULT_LANGUAGE,
};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{debug, info};

use crate::terminal::{TerminalView, print_forecast, print_regions};

const LANGUAGES: &[&str] = &["fr-CA", "en-CA", "en-US", "fr-FR"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Track regions and their weather forecasts")]
pub struct Cli {
    /// Region database to use instead of the configured one.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage stored regions.
    Regions {
        #[command(subcommand)]
        action: RegionsCommand,
    },

    /// Show the 7-day forecast for a stored region.
    Forecast {
        /// Region name (case-insensitive).
        name: String,
    },

    /// Set the Weatherbit API token and language.
    ///
    /// Prompts interactively unless `--token` is given.
    Configure {
        #[arg(long)]
        token: Option<String>,

        /// Language preference, e.g. "fr-CA" or "en-US".
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RegionsCommand {
    /// List stored regions alphabetically.
    List,

    /// Add a region. Coordinates accept `,` or `.` as decimal separator.
    Add {
        name: String,
        #[arg(allow_hyphen_values = true)]
        latitude: String,
        #[arg(allow_hyphen_values = true)]
        longitude: String,
    },

    /// Delete a region after confirmation.
    Delete {
        name: String,

        /// Don't ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;

        match self.command {
            Command::Configure { token, language } => configure(config, token, language),
            Command::Regions { action } => {
                let assume_yes = matches!(action, RegionsCommand::Delete { yes: true, .. });
                let mut settings = ForecastSettings::from(&config);
                settings.fetch_on_select = false;

                let mut vm = open(&config, self.database, assume_yes, settings).await?;
                Ok(regions(&mut vm, action).await)
            }
            Command::Forecast { name } => {
                let settings = ForecastSettings::from(&config);
                let mut vm = open(&config, self.database, false, settings).await?;

                let Some(region) = find_region(vm.regions(), &name) else {
                    eprintln!("No region named '{name}'. See `meteo regions list`.");
                    return Ok(ExitCode::FAILURE);
                };

                if vm.select(Some(region.clone())).await.is_err() {
                    return Ok(ExitCode::FAILURE);
                }
                print_forecast(&region, vm.forecasts());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn open(
    config: &Config,
    database: Option<PathBuf>,
    assume_yes: bool,
    settings: ForecastSettings,
) -> anyhow::Result<MeteoViewModel> {
    let path = match database {
        Some(path) => path,
        None => config.database_path()?,
    };
    debug!(path = %path.display(), "using region database");

    let repository = SqliteRegionRepository::open(&path)
        .with_context(|| format!("Failed to open region database: {}", path.display()))?;

    let vm = MeteoViewModel::load(
        Arc::new(repository),
        Arc::new(WeatherbitProvider::new()),
        Arc::new(TerminalView { assume_yes }),
        settings,
    )
    .await?;

    Ok(vm)
}

async fn regions(vm: &mut MeteoViewModel, action: RegionsCommand) -> ExitCode {
    match action {
        RegionsCommand::List => {
            print_regions(vm.regions());
            ExitCode::SUCCESS
        }
        RegionsCommand::Add { name, latitude, longitude } => {
            vm.new_region().await;
            vm.set_name(name);
            vm.set_latitude(latitude);
            vm.set_longitude(longitude);

            match vm.add().await {
                Ok(_) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
        RegionsCommand::Delete { name, .. } => {
            let Some(region) = find_region(vm.regions(), &name) else {
                eprintln!("No region named '{name}'.");
                return ExitCode::FAILURE;
            };

            // Auto-fetch is off for region commands, so selecting cannot fail.
            let _ = vm.select(Some(region)).await;
            match vm.delete().await {
                Ok(DeleteOutcome::Deleted(_)) => ExitCode::SUCCESS,
                Ok(DeleteOutcome::Declined) => {
                    println!("Nothing deleted.");
                    ExitCode::SUCCESS
                }
                Ok(DeleteOutcome::NothingSelected) | Err(_) => ExitCode::FAILURE,
            }
        }
    }
}

fn find_region(regions: &[Region], name: &str) -> Option<Region> {
    let wanted = name.trim().to_lowercase();
    regions.iter().find(|r| r.name.to_lowercase() == wanted).cloned()
}

fn configure(
    mut config: Config,
    token: Option<String>,
    language: Option<String>,
) -> anyhow::Result<ExitCode> {
    let mut dialog = ConfigurationViewModel::new(|outcome| debug!(?outcome, "settings dialog closed"))
        .with_config(&config);

    let outcome = match token {
        Some(token) => {
            dialog.set_token(token);
            if language.is_some() {
                dialog.set_language(language);
            }
            dialog.save()
        }
        None => prompt(&mut dialog, language)?,
    };

    if outcome == DialogOutcome::Cancelled {
        println!("Settings unchanged.");
        return Ok(ExitCode::SUCCESS);
    }

    config.set_token(dialog.token().to_string());
    config.language = dialog.language().unwrap_or(DEFAULT_LANGUAGE).to_string();
    config.save()?;

    info!(path = %Config::config_file_path()?.display(), "settings saved");
    Ok(ExitCode::SUCCESS)
}

fn prompt(
    dialog: &mut ConfigurationViewModel,
    language: Option<String>,
) -> anyhow::Result<DialogOutcome> {
    use inquire::{InquireError, Password, PasswordDisplayMode, Select};

    let token = Password::new("Weatherbit API token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current token")
        .prompt();

    let token = match token {
        Ok(t) => t,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(dialog.cancel());
        }
        Err(e) => return Err(e).context("Failed to read API token"),
    };
    if !token.trim().is_empty() {
        dialog.set_token(token);
    }

    let language = match language {
        Some(l) => l,
        None => {
            let current = dialog.language().unwrap_or(DEFAULT_LANGUAGE);
            let start = LANGUAGES.iter().position(|l| *l == current).unwrap_or(0);

            match Select::new("Language:", LANGUAGES.to_vec()).with_starting_cursor(start).prompt() {
                Ok(l) => l.to_string(),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(dialog.cancel());
                }
                Err(e) => return Err(e).context("Failed to read language"),
            }
        }
    };
    dialog.set_language(Some(language));

    Ok(dialog.save())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_parse_as_positionals() {
        let cli = Cli::try_parse_from(["meteo", "regions", "add", "Gaspé", "48,83", "-64.48"]).unwrap();

        match cli.command {
            Command::Regions { action: RegionsCommand::Add { name, latitude, longitude } } => {
                assert_eq!(name, "Gaspé");
                assert_eq!(latitude, "48,83");
                assert_eq!(longitude, "-64.48");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli =
            Cli::try_parse_from(["meteo", "forecast", "Québec", "--database", "/tmp/r.db", "-v"]).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/r.db")));
    }

    #[test]
    fn find_region_ignores_case() {
        let regions = vec![Region { id: 1, name: "Québec".into(), latitude: 46.8, longitude: -71.2 }];

        assert_eq!(find_region(&regions, " QUÉBEC ").map(|r| r.id), Some(1));
        assert!(find_region(&regions, "Quebec").is_none());
    }
}
