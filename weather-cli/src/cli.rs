use std::{fmt, process::ExitCode};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{CustomType, InquireError, Select, Text};
use tracing::debug;
use weather_core::{Config, ControllerOptions, WeatherController, backend_from_config};

use crate::view::TerminalView;

type Controller = WeatherController<TerminalView>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard client")]
pub struct Cli {
    /// Backend base URL, e.g. "http://localhost:5000/api". Overrides the config file.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather, forecast and history for a city.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,
    },

    /// List the cities the backend has saved.
    Cities {
        /// Pick one of them and show its weather.
        #[arg(long)]
        pick: bool,
    },

    /// Search repeatedly from a prompt.
    Interactive,

    /// Edit the configuration file interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;

        if let Some(api_base) = &self.api_base {
            config
                .set_api_base(api_base.as_str())
                .context("Invalid --api-base")?;
            debug!(api_base = %config.api_base, "backend base overridden from command line");
        }

        match self.command {
            Command::Show { city } => {
                let controller = build_controller(&config)?;
                let city = city.unwrap_or_else(|| config.default_city().to_string());
                debug!(city = %city, "show");
                controller.set_input(&city);
                // Failures are already on screen; only the exit status is left.
                Ok(exit_code(controller.search().await.is_ok()))
            }
            Command::Cities { pick } => pick_saved_city(&build_controller(&config)?, pick).await,
            Command::Interactive => interactive(&build_controller(&config)?, &config).await,
            Command::Configure => configure(config),
        }
    }
}

fn build_controller(config: &Config) -> anyhow::Result<Controller> {
    Ok(WeatherController::new(
        backend_from_config(config)?,
        TerminalView::new(),
        ControllerOptions::from_config(config),
    ))
}

async fn pick_saved_city(controller: &Controller, pick: bool) -> anyhow::Result<ExitCode> {
    let Ok(cities) = controller.load_saved_cities().await else {
        return Ok(ExitCode::FAILURE);
    };

    if !pick || cities.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let names: Vec<String> = cities.into_iter().map(|c| c.city).collect();
    match Select::new("Show weather for:", names).prompt() {
        Ok(city) => Ok(exit_code(controller.select_saved_city(&city).await.is_ok())),
        Err(err) if is_cancel(&err) => Ok(ExitCode::SUCCESS),
        Err(err) => Err(err).context("Failed to read selection"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    SavedCities,
    Quit,
}

impl Action {
    const ALL: [Action; 3] = [Action::Search, Action::SavedCities, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search a city",
            Action::SavedCities => "Pick a saved city",
            Action::Quit => "Quit",
        })
    }
}

async fn interactive(controller: &Controller, config: &Config) -> anyhow::Result<ExitCode> {
    controller.set_input(config.default_city());
    // A failure here is already reported in the banner.
    let _ = controller.load_saved_cities().await;

    loop {
        let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err).context("Failed to read action"),
        };

        match action {
            Action::Search => {
                let current = controller.input();
                let city = match Text::new("City:").with_initial_value(&current).prompt() {
                    Ok(city) => city,
                    Err(err) if is_cancel(&err) => continue,
                    Err(err) => return Err(err).context("Failed to read city"),
                };
                controller.set_input(&city);
                let _ = controller.search().await;
            }
            Action::SavedCities => {
                pick_saved_city(controller, true).await?;
            }
            Action::Quit => break,
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn configure(mut config: Config) -> anyhow::Result<ExitCode> {
    let api_base = Text::new("Backend base URL:")
        .with_initial_value(&config.api_base)
        .prompt()
        .context("Failed to read backend base URL")?;
    config.set_api_base(api_base.trim())?;

    let city = Text::new("Default city:")
        .with_initial_value(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    let city = city.trim();
    config.default_city = (!city.is_empty()).then(|| city.to_string());

    config.history_days = CustomType::<u32>::new("Days of history to show:")
        .with_default(config.history_days)
        .with_error_message("Please type a whole number of days")
        .prompt()
        .context("Failed to read history days")?;

    config.validate()?;
    config.save()?;

    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
