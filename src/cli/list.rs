//! List command - dump index entries

use anyhow::{Context, Result};
use std::path::Path;

use crate::index::SearchIndex;

pub async fn run(index_path: &Path, json: bool) -> Result<()> {
    let index = SearchIndex::load(index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    if json {
        let text = serde_json::to_string_pretty(index.entries())
            .context("Failed to serialize entries")?;
        println!("{}", text);
        return Ok(());
    }

    for entry in index.iter() {
        println!("{}\t{}", entry.token, entry.label);
        for target in &entry.targets {
            println!("\t{}", target.href());
        }
    }
    Ok(())
}
