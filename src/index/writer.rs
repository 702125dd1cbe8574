//! Index file writer
//!
//! Renders entries back into the browser-loadable form: one `var <name>=`
//! assignment per file, entries one per line, single-quoted strings. Two
//! layouts exist: a single `searchdata.js` holding the whole table, and the
//! split layout with one `all_<hex>.js` per distinct first character of the
//! token base.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::model::{IndexEntry, Target};

pub const DEFAULT_VAR_NAME: &str = "searchData";
pub const DEFAULT_PAGE_PREFIX: &str = "../";
pub const SINGLE_FILE_NAME: &str = "searchdata.js";

/// Output options shared by both layouts.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Variable name the file assigns to.
    pub var_name: String,
    /// Prefix put in front of every page reference; index files usually sit
    /// in a `search/` subdirectory one level below the pages.
    pub page_prefix: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            var_name: DEFAULT_VAR_NAME.to_string(),
            page_prefix: DEFAULT_PAGE_PREFIX.to_string(),
        }
    }
}

/// Render a whole index into one file's source text.
pub fn render(entries: &[IndexEntry], options: &WriteOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "var {}=", options.var_name);
    out.push_str("[\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str("  ");
        render_entry(&mut out, entry, options);
        if i + 1 < entries.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("];\n");
    out
}

fn render_entry(out: &mut String, entry: &IndexEntry, options: &WriteOptions) {
    out.push('[');
    render_string(out, &entry.token);
    out.push_str(",[");
    render_string(out, &entry.label);
    for target in &entry.targets {
        out.push(',');
        render_target(out, target, options);
    }
    out.push_str("]]");
}

fn render_target(out: &mut String, target: &Target, options: &WriteOptions) {
    out.push('[');
    let href = format!("{}{}", options.page_prefix, target.href());
    render_string(out, &href);
    // The constant 1 is the widget's live flag.
    out.push_str(",1,");
    render_string(out, &target.context);
    out.push(']');
}

fn render_string(out: &mut String, text: &str) {
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('\'');
}

/// Write the single-file layout: `<dir>/searchdata.js`.
pub fn write_single(dir: &Path, entries: &[IndexEntry], options: &WriteOptions) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SINGLE_FILE_NAME);
    fs::write(&path, render(entries, options))?;
    Ok(path)
}

/// Write the split layout: one `all_<hex>.js` per distinct first character
/// of the token base, numbered in sorted order of those characters. Returns
/// the written paths in that order.
pub fn write_split(dir: &Path, entries: &[IndexEntry], options: &WriteOptions) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let firsts: BTreeSet<char> = entries
        .iter()
        .filter_map(|e| e.base().chars().next())
        .collect();

    let mut paths = Vec::with_capacity(firsts.len());
    for (bucket, first) in firsts.iter().enumerate() {
        let subset: Vec<IndexEntry> = entries
            .iter()
            .filter(|e| e.base().chars().next() == Some(*first))
            .cloned()
            .collect();
        let path = dir.join(format!("all_{:x}.js", bucket));
        fs::write(&path, render(&subset, options))?;
        paths.push(path);
    }
    Ok(paths)
}
