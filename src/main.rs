use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxc::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxc::AppCommand {
    fn from(cmd: Commands) -> fxc::AppCommand {
        match cmd {
            Commands::Convert { from, to, amount } => {
                fxc::AppCommand::Convert { from, to, amount }
            }
            Commands::History => fxc::AppCommand::History,
            Commands::Replay { index } => fxc::AppCommand::Replay { index },
            Commands::Clear => fxc::AppCommand::Clear,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
        /// Amount in the source currency
        amount: f64,
    },
    /// Display recent conversions
    History,
    /// Re-run a conversion from history (1 is the most recent)
    Replay { index: usize },
    /// Clear recent conversions
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxc::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  freecurrency:
    base_url: "https://api.freecurrencyapi.com"
    api_key: "YOUR_API_KEY"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
