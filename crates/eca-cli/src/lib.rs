//! eca-cli library exports
//!
//! Argument definitions, configuration loading and the command
//! implementations behind the `eca` binary.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use eca_config::{ConfigLoader, DEFAULT_ENV_PREFIX, EcaConfig, SignalDefaults, default_config_path};
use eca_core::{Preferences, Signals, Tradeoff};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "eca")]
#[command(author, version, about = "Recommend encryption and compression algorithms for a file", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Recommend a cipher and codec for a file
    Recommend(RecommendArgs),
    /// Show the detected MIME type and category of a file
    Classify {
        /// File to inspect
        file: PathBuf,
        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
        /// Output directory (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments of the recommend command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RecommendArgs {
    /// File to analyze
    pub file: PathBuf,
    /// Known size in bytes (read from the file when omitted or not positive)
    #[arg(long, allow_negative_numbers = true)]
    pub size: Option<i64>,
    /// Hours since the file was last used
    #[arg(long, allow_negative_numbers = true)]
    pub last_used_hours: Option<f64>,
    /// Likelihood of near-future access, 0 to 1
    #[arg(long, allow_negative_numbers = true)]
    pub attention: Option<f64>,
    /// speed, ratio or balanced (anything else means balanced)
    #[arg(long)]
    pub tradeoff: Option<String>,
    /// Assume AES hardware acceleration
    #[arg(long)]
    pub assume_hardware_aes: bool,
    /// Accepted for compatibility, has no effect
    #[arg(long)]
    pub force_extension_priority: bool,
    /// Print JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

impl RecommendArgs {
    /// Merge command-line flags over configured preferences
    pub fn preferences(&self, base: Preferences) -> Preferences {
        Preferences {
            tradeoff: self
                .tradeoff
                .as_deref()
                .map_or(base.tradeoff, Tradeoff::normalize),
            assume_hardware_aes: base.assume_hardware_aes || self.assume_hardware_aes,
            force_extension_priority: base.force_extension_priority
                || self.force_extension_priority,
        }
    }

    /// Merge command-line flags over configured signal defaults
    pub fn signals(&self, defaults: &SignalDefaults) -> Signals {
        Signals::new(
            self.size,
            self.last_used_hours.unwrap_or(defaults.last_used_hours),
            self.attention.unwrap_or(defaults.attention),
        )
    }
}

/// Load configuration from an explicit file or the default location, then
/// apply `ECA_*` environment overrides
pub fn load_config(path: Option<&Path>) -> Result<EcaConfig> {
    let mut loader = ConfigLoader::new();

    if let Some(path) = path {
        loader = loader.with_file(path);
    } else if let Some(default) = default_config_path().filter(|p| p.exists()) {
        loader = loader.with_file(default);
    }

    loader
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("Failed to load configuration")
}

/// File name used for extension lookup
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::parse_from([
            "eca",
            "-vv",
            "recommend",
            "movie.mkv",
            "--size",
            "1024",
            "--attention",
            "-0.5",
            "--tradeoff",
            "ratio",
        ]);
        assert_eq!(cli.verbose, 2);

        let Commands::Recommend(args) = cli.command else {
            panic!("expected recommend");
        };
        assert_eq!(args.file, PathBuf::from("movie.mkv"));
        assert_eq!(args.size, Some(1024));
        assert_eq!(args.attention, Some(-0.5));
        assert_eq!(args.tradeoff.as_deref(), Some("ratio"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = RecommendArgs {
            tradeoff: Some("SPEED".to_string()),
            attention: Some(0.7),
            ..RecommendArgs::default()
        };
        let base = Preferences {
            tradeoff: Tradeoff::Ratio,
            assume_hardware_aes: true,
            force_extension_priority: false,
        };
        let defaults = SignalDefaults {
            attention: 0.1,
            last_used_hours: 12.0,
        };

        let prefs = args.preferences(base);
        assert_eq!(prefs.tradeoff, Tradeoff::Speed);
        assert!(prefs.assume_hardware_aes);

        let signals = args.signals(&defaults);
        assert_eq!(signals.attention, 0.7);
        assert_eq!(signals.last_used_hours, 12.0);
        assert_eq!(signals.size_bytes, None);
    }

    #[test]
    fn test_config_keeps_tradeoff_without_flag() {
        let base = Preferences::with_tradeoff(Tradeoff::Ratio);
        assert_eq!(RecommendArgs::default().preferences(base).tradeoff, Tradeoff::Ratio);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/dir/report.PDF")), "report.PDF");
    }
}
