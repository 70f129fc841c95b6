use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sense_config::{ConfigLoader, SenseConfig, WarningSeverity};

mod setup;
mod simulate;

pub use simulate::Scenario;

/// Sense: reactive fall and fire safety for block-world agents
#[derive(Parser)]
#[command(name = "sense", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to sense.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller against a simulated world and report what it did
    Simulate {
        /// Scenario to run
        #[arg(value_enum)]
        scenario: Scenario,

        /// Height the agent starts falling from
        #[arg(long, default_value = "80")]
        height: f64,

        /// Give up after this many simulated ticks
        #[arg(long, default_value = "400")]
        ticks: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and report problems
    Doctor,
    /// Initialize a new sense.toml in the current or home directory
    Init {
        /// Create in current directory instead of ~/.sense/
        #[arg(long)]
        local: bool,
    },
}

impl Cli {
    pub async fn run(self) -> sense_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config default
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level
                .as_deref()
                .unwrap_or(config.logging.level.as_str())
        };
        init_tracing(log_level, &config.logging.format);

        match self.command {
            Commands::Simulate {
                scenario,
                height,
                ticks,
                json,
            } => simulate::cmd_simulate(config, &config_loader, scenario, height, ticks, json).await,
            Commands::Config { json } => Self::cmd_config(config, json),
            Commands::Doctor => Self::cmd_doctor(config),
            Commands::Init { local } => setup::cmd_init(local),
        }
    }

    fn cmd_config(config: SenseConfig, json: bool) -> sense_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| sense_core::SenseError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_doctor(config: SenseConfig) -> sense_core::Result<()> {
        println!("🩺 Sense Doctor: configuration audit");
        println!();

        let warnings = match config.validate() {
            Ok(w) => w,
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        };

        let mut warn_count = 0;
        let mut info_count = 0;
        for w in &warnings {
            println!("  {w}");
            match w.severity {
                WarningSeverity::Warning => warn_count += 1,
                WarningSeverity::Info => info_count += 1,
                WarningSeverity::Error => {}
            }
        }

        let options = &config.options;
        if !options.fire_check && !options.fall_check.is_enabled() {
            println!("  💡 options: every hazard check is off, the controller will never act");
            info_count += 1;
        }
        if !options.mlg_item_names().iter().any(|name| name.contains("water_bucket")) {
            println!("  💡 options.mlg_items: no water_bucket rule; fire can still be put out, falls cannot use water");
            info_count += 1;
        }

        println!();
        println!(
            "  ✅ {} items configured, ⚠️  {warn_count} warnings, 💡 {info_count} suggestions",
            options.mlg_items.len()
        );
        Ok(())
    }
}

fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    match format {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .init(),
        "compact" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_target(false)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}
