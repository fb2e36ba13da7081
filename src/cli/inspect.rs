use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::frontmatter::parse_markdown;

/// Print the parsed `{data, content}` of a single markdown file as JSON.
pub fn run(path: &Path) -> Result<()> {
    println!("{}", render(path)?);
    Ok(())
}

fn render(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path is not a file: {}", path.display());
    }

    let source = fs::read_to_string(path)?;
    let document = parse_markdown(&source);
    Ok(serde_json::to_string_pretty(&document)?)
}
