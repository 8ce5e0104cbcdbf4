use std::path::{Path, PathBuf};

mod check;
mod interactive;
mod list;
mod show;
mod terminal;

use check::Check;
use clap::ArgAction;
use interactive::Interactive;
use list::List;
use planner::CourseId;
use show::Show;
use tracing::instrument;

/// Name of the configuration file, looked up in the working directory.
const CONFIG_FILE: &str = ".plan.toml";

/// Catalog path used when neither `--catalog` nor the config file names one.
const DEFAULT_CATALOG: &str = "courses.csv";

/// Parse a course identifier from a string.
///
/// This is a CLI boundary function: [`CourseId`] normalizes case and trims
/// whitespace, so any reasonable spelling of an identifier is accepted.
fn parse_course_id(s: &str) -> Result<CourseId, String> {
    CourseId::new(s).map_err(|e| format!("{e}"))
}

/// Command-line interface for the course planner.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the course catalog file
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    /// Dispatch to the selected subcommand (the interactive menu when none is
    /// given).
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let catalog = resolve_catalog(self.catalog);

        self.command
            .unwrap_or_else(|| Command::Interactive(Interactive::default()))
            .run(catalog)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Resolve the catalog path: the `--catalog` flag wins, then the config
/// file's `catalog` entry, then the conventional default.
fn resolve_catalog(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }

    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        match planner::Config::load(config_path) {
            Ok(config) => {
                if let Some(path) = config.catalog() {
                    return path.to_path_buf();
                }
            }
            Err(error) => tracing::warn!(%error, "ignoring unreadable config file"),
        }
    }

    PathBuf::from(DEFAULT_CATALOG)
}

/// Available subcommands.
#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    Interactive(Interactive),

    /// List courses in sorted order
    List(List),

    /// Show detailed information about a course
    Show(Show),

    /// Validate a catalog without loading it into a session
    Check(Check),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, catalog: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Interactive(command) => command.run(&catalog)?,
            Self::List(command) => command.run(&catalog)?,
            Self::Show(command) => command.run(&catalog)?,
            Self::Check(command) => command.run(&catalog)?,
            Self::Config(command) => command.run()?,
        }
        Ok(())
    }
}

/// The `config` subcommand.
#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        use terminal::Colorize;

        let config_path = Path::new(CONFIG_FILE);

        match self.command {
            ConfigCommand::Show => {
                let config = if config_path.exists() {
                    planner::Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                } else {
                    planner::Config::default()
                };

                println!("Configuration:");
                match config.catalog() {
                    Some(path) => println!("  catalog: {}", path.display()),
                    None => println!("  catalog: {} ({})", DEFAULT_CATALOG, "default".dim()),
                }
            }
            ConfigCommand::Set { key, value } => match key.as_str() {
                "catalog" => {
                    let mut config = if config_path.exists() {
                        planner::Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?
                    } else {
                        planner::Config::default()
                    };

                    config.set_catalog(PathBuf::from(&value));
                    config
                        .save(config_path)
                        .map_err(|e| anyhow::anyhow!("{e}"))?;

                    println!("{}", format!("Default catalog: {value}").success());
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unknown configuration key: '{key}'\nSupported keys: catalog",
                    ));
                }
            },
        }

        Ok(())
    }
}
