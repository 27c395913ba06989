//! Dish name collection from the seed inputs.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, warn};

/// One input that contributes dish names.
#[derive(Debug, Clone)]
pub enum NameSource {
    /// Plain text, one name per line. Blank lines and `#` comments are skipped.
    LineList(PathBuf),
    /// JSON array of seed records; the `name` field of each is used.
    SeedRecords(PathBuf),
}

impl NameSource {
    fn path(&self) -> &Path {
        match self {
            NameSource::LineList(path) | NameSource::SeedRecords(path) => path,
        }
    }

    fn read_names(&self) -> Result<Vec<String>> {
        let path = self.path();
        if !path.exists() {
            info!(path = %path.display(), "Name source missing, skipping");
            return Ok(Vec::new());
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable name source, ignoring");
                return Ok(Vec::new());
            }
        };

        Ok(match self {
            NameSource::LineList(_) => names_from_lines(&text),
            NameSource::SeedRecords(_) => match names_from_seed_json(&text) {
                Ok(names) => names,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Unreadable seed records, ignoring");
                    Vec::new()
                }
            },
        })
    }
}

/// Union of all sources, sorted and deduplicated.
pub fn collect_names(sources: &[NameSource]) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();
    for source in sources {
        let found = source.read_names()?;
        info!(path = %source.path().display(), count = found.len(), "Read dish names");
        names.extend(found);
    }
    Ok(names.into_iter().collect())
}

pub fn names_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn names_from_seed_json(text: &str) -> Result<Vec<String>> {
    let records: Vec<Value> = serde_json::from_str(text).context("seed records must be a JSON array")?;

    Ok(records
        .iter()
        .filter_map(|record| record.get("name"))
        .filter_map(|name| match name {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            other => Some(other.to_string()),
        })
        .filter(|name| !name.is_empty())
        .collect())
}
