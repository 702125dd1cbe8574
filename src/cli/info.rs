//! Info command - version, environment and index statistics

use anyhow::{Context, Result};
use std::path::Path;

use crate::index::SearchIndex;

pub fn run(index_path: Option<&Path>) -> Result<()> {
    println!("searchdex v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    println!();
    println!("Configuration:");
    println!("  Config dir: {}", config_dir());

    if let Some(path) = index_path {
        let index = SearchIndex::load(path)
            .with_context(|| format!("Failed to load index from {}", path.display()))?;
        let stats = index.stats();

        println!();
        println!("Index: {}", path.display());
        println!("  Entries:          {}", stats.entries);
        println!("  Targets:          {}", stats.targets);
        println!("  Pages referenced: {}", stats.pages);
        println!("  Buckets:          {}", stats.buckets);
        println!("  Duplicate bases:  {}", stats.duplicate_bases);
    }

    Ok(())
}

fn config_dir() -> String {
    directories::ProjectDirs::from("io", "searchdex", "searchdex")
        .map(|p| p.config_dir().to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
