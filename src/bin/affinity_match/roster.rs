use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::Path;

/// One newline-separated name per line; surrounding whitespace is trimmed and
/// blank lines are skipped.
pub fn parse(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<String>, anyhow::Error> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not read name list {}", path.display()))?;
    let names = parse(contents.as_str());
    ensure!(!names.is_empty(), "name list {} holds no names", path.display());
    Ok(names)
}
