//! classify command - show the detected MIME type and category

use anyhow::{Context, Result};
use eca_core::{Classification, classify};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::display_name;

/// Execute the classify command
pub fn execute(path: &Path, json: bool) -> Result<()> {
    let classification = run(path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &classification)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", path.display())?;
        writeln!(out, "  MIME Type:       {}", classification.mime_type)?;
        writeln!(out, "  Category:        {}", classification.category)?;
        writeln!(
            out,
            "  Compressed:      {}",
            if classification.category.is_already_compressed() { "likely" } else { "no" }
        )?;
    }

    Ok(())
}

/// Open the file and classify it
pub fn run(path: &Path) -> Result<Classification> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(classify(&mut file, &display_name(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eca_core::Category;
    use tempfile::tempdir;

    #[test]
    fn test_classify_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(&path, "replicas: 3\n").unwrap();

        let c = run(&path).unwrap();
        assert_eq!(c.category, Category::Text);
    }

    #[test]
    fn test_classify_gzip_by_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup");
        std::fs::write(&path, [0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();

        let c = run(&path).unwrap();
        assert_eq!(c.category, Category::Archive);
    }
}
