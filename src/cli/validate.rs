//! Validate command - structural well-formedness checks
//!
//! A broken entry never faults the widget, it only degrades results, so all
//! violations are collected and reported in one pass. The process exits
//! non-zero when anything was flagged.

use anyhow::{bail, Context, Result};
use console::style;
use std::path::Path;

use crate::config::Config;
use crate::index::validate::{check_links, validate, Violation};
use crate::index::SearchIndex;

pub async fn run(
    config: Config,
    index_path: &Path,
    strict: bool,
    docs_root: Option<&Path>,
) -> Result<()> {
    let strict = strict || config.validate.strict;

    let index = SearchIndex::load(index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    println!();
    println!(
        "  {} {} entries from {}",
        style("Validating").bold().cyan(),
        index.len(),
        index_path.display()
    );

    let mut violations = validate(index.entries(), strict);
    if let Some(root) = docs_root {
        violations.extend(check_links(index.entries(), root));
    }

    if violations.is_empty() {
        println!("  {} index is well-formed", style("✓").green().bold());
        if strict {
            println!("    (strict: anchors present, tokens unique)");
        }
        println!();
        return Ok(());
    }

    println!();
    for violation in &violations {
        let tag = match violation {
            Violation::MissingPage { .. } => style("link").yellow(),
            _ => style("form").red(),
        };
        println!("  {} {}", tag, violation);
    }
    println!();

    bail!("{} violation(s) found", violations.len());
}
