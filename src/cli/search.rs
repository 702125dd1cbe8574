//! Search command - query a generated index the way the widget would
//!
//! Loads an index from disk and ranks entries against the query string.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::index::{MatchKind, MatchMode, SearchHit, SearchIndex};

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;202;40m";       // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
    pub const HIGHLIGHT: &str = "\x1b[38;2;255;183;77m";     // Orange highlight
}

mod symbols {
    pub const SEARCH: &str = "󰍉";
    pub const FILE: &str = "󰈙";
    pub const ANCHOR: &str = "󰌷";
    pub const MATCH: &str = "󰄬";
}

pub async fn run(
    config: Config,
    index_path: &Path,
    query: &str,
    mode: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let mode: MatchMode = mode
        .unwrap_or(&config.search.mode)
        .parse()
        .map_err(anyhow::Error::msg)?;
    let limit = limit.unwrap_or(config.search.limit);

    print_header(query);

    let index = SearchIndex::load(index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    if index.is_empty() {
        print_warning("Index is empty");
        return Ok(());
    }

    tracing::debug!(entries = index.len(), ?mode, "index loaded");

    let hits = index.lookup(query, mode, limit);
    if hits.is_empty() {
        print_no_results(query);
        return Ok(());
    }

    print_results(&hits, query);
    Ok(())
}

// ============================================
// UI Functions
// ============================================

fn print_header(query: &str) {
    println!();
    println!(
        "{}{}  {} Index Search{}",
        colors::PRIMARY, colors::BOLD, symbols::SEARCH, colors::RESET
    );
    println!(
        "{}  │ Query: {}\"{}\"{}",
        colors::MUTED, colors::HIGHLIGHT, query, colors::RESET
    );
    println!(
        "{}  ╰{}─{}",
        colors::MUTED, "─".repeat(50), colors::RESET
    );
    println!();
}

fn print_results(hits: &[SearchHit<'_>], query: &str) {
    println!(
        "{}{}  {} Found {} results for \"{}\"{}",
        colors::SUCCESS, colors::BOLD, symbols::MATCH,
        hits.len(), query, colors::RESET
    );
    println!();

    for (i, hit) in hits.iter().enumerate() {
        let match_indicator = match hit.kind {
            MatchKind::Exact => format!("{}exact{}", colors::SUCCESS, colors::RESET),
            MatchKind::Prefix => format!("{}prefix{}", colors::WARNING, colors::RESET),
            MatchKind::Substring => format!("{}substring{}", colors::PRIMARY, colors::RESET),
            MatchKind::Fuzzy => format!("{}fuzzy{}", colors::MUTED, colors::RESET),
        };

        // Result header: label plus its generated token
        println!(
            "{}  {}. {}{}{} {}({}){} [{}]",
            colors::MUTED,
            i + 1,
            colors::FG,
            hit.entry.label,
            colors::RESET,
            colors::MUTED,
            hit.entry.token,
            colors::RESET,
            match_indicator
        );

        for target in &hit.entry.targets {
            println!(
                "{}      {} {}{}",
                colors::MUTED,
                if target.anchor.is_some() { symbols::ANCHOR } else { symbols::FILE },
                target.href(),
                colors::RESET
            );
            if !target.context.is_empty() {
                let preview: String = target.context.chars().take(80).collect();
                println!(
                    "{}        {}{}{}",
                    colors::MUTED,
                    preview,
                    if target.context.chars().count() > 80 { "..." } else { "" },
                    colors::RESET
                );
            }
        }

        println!();
    }
}

fn print_no_results(query: &str) {
    println!(
        "{}  {} No results found for \"{}\"{}",
        colors::WARNING, symbols::SEARCH, query, colors::RESET
    );
    println!();
    println!(
        "{}  Try:{}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}  • A shorter prefix (tokens are matched from the start){}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}  • --mode substring or --mode fuzzy{}",
        colors::MUTED, colors::RESET
    );
    println!();
}

fn print_warning(message: &str) {
    println!(
        "{}  {} {}{}",
        colors::WARNING, symbols::SEARCH, message, colors::RESET
    );
}
