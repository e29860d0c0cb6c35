//! recommend command - score every candidate for a file and report the winners

use anyhow::{Context, Result};
use eca_config::EcaConfig;
use eca_core::{Recommendation, recommend_file};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::{RecommendArgs, display_name};

/// Execute the recommend command
pub fn execute(args: &RecommendArgs, config: &EcaConfig) -> Result<()> {
    let rec = run(args, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &rec)?;
        writeln!(out)?;
    } else {
        render(&args.file, &rec, &mut out)?;
    }

    Ok(())
}

/// Open the file and produce a recommendation
pub fn run(args: &RecommendArgs, config: &EcaConfig) -> Result<Recommendation> {
    let mut file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let name = display_name(&args.file);
    let prefs = args.preferences(config.preferences);
    let signals = args.signals(&config.signals);

    tracing::info!(
        file = %args.file.display(),
        tradeoff = %prefs.tradeoff,
        attention = signals.attention,
        last_used_hours = signals.last_used_hours,
        "Recommending algorithms"
    );

    Ok(recommend_file(Some(&mut file), &name, signals, &prefs)?)
}

/// Write a human-readable report
pub fn render<W: Write>(path: &Path, rec: &Recommendation, out: &mut W) -> io::Result<()> {
    writeln!(out, "Recommendation for {}", path.display())?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "  MIME Type:       {}", rec.mime_type)?;
    writeln!(out, "  Category:        {}", rec.category)?;
    writeln!(out, "  Encryption:      {}", rec.encryption)?;
    match rec.zstd_level {
        Some(level) => writeln!(out, "  Compression:     {} (level {level})", rec.compression_name())?,
        None => writeln!(out, "  Compression:     {}", rec.compression_name())?,
    }
    writeln!(
        out,
        "  Skip:            {}",
        if rec.skip_compression { "yes" } else { "no" }
    )?;
    writeln!(out, "  Reason:          {}", rec.reason)?;
    writeln!(out)?;

    writeln!(out, "Scores")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for (key, score) in &rec.scores {
        writeln!(out, "  {key:<24} {score:>6.2}")?;
    }

    Ok(())
}
