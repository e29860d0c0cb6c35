//! eca CLI - encryption and compression algorithm recommendations

use anyhow::Result;
use clap::Parser;
use eca_cli::{Cli, Commands};
use eca_config::{LogConfig, LogFormat, validate};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = eca_cli::load_config(cli.config.as_deref())?;

    init_tracing(cli.verbose, &config.log);

    for warning in validate(&config).into_result()? {
        tracing::warn!(%warning, "Configuration warning");
    }

    match cli.command {
        Commands::Recommend(args) => eca_cli::commands::recommend::execute(&args, &config),
        Commands::Classify { file, json } => eca_cli::commands::classify::execute(&file, json),
        Commands::Completions { shell, output } => {
            eca_cli::commands::completions::execute(shell, output.as_deref())
        }
    }
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
fn init_tracing(verbose: u8, log: &LogConfig) {
    let level = match verbose {
        0 => log.level.as_filter(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}
