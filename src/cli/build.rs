//! Build command - generate index files from a symbol manifest

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::core::model::SymbolRecord;
use crate::index;
use crate::index::writer::{self, WriteOptions};

// ANSI color codes from design system
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;245;157m";      // #FFF59D
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

mod symbols {
    pub const LOADING: &str = "󰊍";
    pub const SUCCESS: &str = "󰄂";
    pub const WARNING: &str = "⚠";
}

pub struct BuildArgs<'a> {
    pub manifest: &'a Path,
    pub output: &'a Path,
    pub split: Option<bool>,
    pub var_name: Option<&'a str>,
    pub page_prefix: Option<&'a str>,
}

pub async fn run(config: Config, args: BuildArgs<'_>) -> Result<()> {
    let start_time = Instant::now();

    print_header(args.manifest);

    let content = std::fs::read_to_string(args.manifest)
        .with_context(|| format!("Failed to read manifest: {}", args.manifest.display()))?;
    let records: Vec<SymbolRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {}", args.manifest.display()))?;

    if records.is_empty() {
        print_warning("Manifest contains no symbol records");
        return Ok(());
    }

    let pb = create_progress_bar(records.len() as u64);
    pb.set_message("grouping labels");
    let entries = index::build_entries(&records).context("Failed to build index entries")?;
    pb.set_position(records.len() as u64);
    pb.finish_and_clear();

    let options = WriteOptions {
        var_name: args
            .var_name
            .map(str::to_string)
            .unwrap_or_else(|| config.build.var_name.clone()),
        page_prefix: args
            .page_prefix
            .map(str::to_string)
            .unwrap_or_else(|| config.build.page_prefix.clone()),
    };
    let split = args.split.unwrap_or(config.build.split);

    let files_written = if split {
        writer::write_split(args.output, &entries, &options)
            .with_context(|| format!("Failed to write index to {}", args.output.display()))?
            .len()
    } else {
        writer::write_single(args.output, &entries, &options)
            .with_context(|| format!("Failed to write index to {}", args.output.display()))?;
        1
    };

    let duration = start_time.elapsed();
    print_summary(
        records.len(),
        entries.len(),
        files_written,
        args.output,
        duration.as_millis() as u64,
    );

    tracing::debug!(
        records = records.len(),
        entries = entries.len(),
        files = files_written,
        "index build finished"
    );

    Ok(())
}

/// Create a styled progress bar
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);

    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.cyan} {prefix:.bold} [{bar:40.cyan/dim}] {pos}/{len} {msg:.dim}")
        .unwrap()
        .progress_chars("█▓░")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));

    pb.set_prefix("Building");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb
}

/// Print the build header
fn print_header(manifest: &Path) {
    println!();
    println!(
        "{}{}╭─ {} searchdex ───────────────────────────────────────────────╮{}",
        colors::PRIMARY, colors::BOLD, symbols::LOADING, colors::RESET
    );
    println!(
        "{}│{}                                                              {}│{}",
        colors::PRIMARY, colors::RESET, colors::PRIMARY, colors::RESET
    );
    println!(
        "{}│{}  Manifest: {}{}{}{}",
        colors::PRIMARY, colors::RESET, colors::FG,
        truncate_path(manifest, 48), colors::PRIMARY, colors::RESET
    );
    println!(
        "{}│{}  Mode:     {}Symbol table → search index{}                       {}│{}",
        colors::PRIMARY, colors::RESET, colors::MUTED, colors::RESET, colors::PRIMARY, colors::RESET
    );
    println!(
        "{}│{}                                                              {}│{}",
        colors::PRIMARY, colors::RESET, colors::PRIMARY, colors::RESET
    );
    println!(
        "{}╰──────────────────────────────────────────────────────────────╯{}",
        colors::PRIMARY, colors::RESET
    );
    println!();
}

/// Print the build summary
fn print_summary(records: usize, entries: usize, files: usize, output: &Path, elapsed_ms: u64) {
    println!();
    println!(
        "{}{}╭─ {} Index Built ────────────────────────────────────────────╮{}",
        colors::SUCCESS, colors::BOLD, symbols::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}                                                              {}│{}",
        colors::SUCCESS, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Symbol Records:{}    {}{:>6}{}                                  {}│{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, records, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Index Entries:{}     {}{:>6}{}                                  {}│{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, entries, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Files Written:{}     {}{:>6}{}                                  {}│{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, files, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Output:{}            {}{}{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, truncate_path(output, 40), colors::RESET
    );
    println!(
        "{}│{}  {}Time Elapsed:{}      {}{:.2}s{}                                  {}│{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, elapsed_ms as f64 / 1000.0, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Finished:{}          {}{}{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET,
        colors::FG, chrono::Local::now().format("%Y-%m-%d %H:%M:%S"), colors::RESET
    );
    println!(
        "{}│{}                                                              {}│{}",
        colors::SUCCESS, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}│{}  {}Ready for queries. Try: `searchdex search <token>`{}         {}│{}",
        colors::SUCCESS, colors::RESET, colors::MUTED, colors::RESET, colors::SUCCESS, colors::RESET
    );
    println!(
        "{}╰──────────────────────────────────────────────────────────────╯{}",
        colors::SUCCESS, colors::RESET
    );
    println!();
}

/// Print a warning message
fn print_warning(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::WARNING, symbols::WARNING, message, colors::RESET
    );
}

/// Truncate a path for display, keeping char boundaries intact
fn truncate_path(path: &Path, max_len: usize) -> String {
    let s = path.display().to_string();
    let count = s.chars().count();
    if count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let tail: String = s.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_path_pads_short_paths() {
        assert_eq!(truncate_path(Path::new("abc"), 5), "abc  ");
    }

    #[test]
    fn test_truncate_path_keeps_char_boundaries() {
        let long = "é".repeat(25);
        let truncated = truncate_path(Path::new(&long), 10);
        assert!(truncated.starts_with("..."));
        assert_eq!(truncated.chars().count(), 10);
    }
}
