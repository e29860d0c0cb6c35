//! completions command - generate shell completion scripts

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate, generate_to};
use std::io;
use std::path::Path;

use crate::Cli;

const BIN_NAME: &str = "eca";

/// Execute the completions command
pub fn execute(shell: Shell, output: Option<&Path>) -> Result<()> {
    let mut cmd = Cli::command();

    match output {
        Some(dir) => {
            let path = generate_to(shell, &mut cmd, BIN_NAME, dir)
                .with_context(|| format!("Failed to write completions to {}", dir.display()))?;
            eprintln!("Generated {}", path.display());
        }
        None => generate(shell, &mut cmd, BIN_NAME, &mut io::stdout()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_to_directory() {
        let dir = tempdir().unwrap();
        execute(Shell::Bash, Some(dir.path())).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
