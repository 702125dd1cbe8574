//! Search index: build, load, lookup
//!
//! The in-memory form of the generated table. Loading is read-only; a table
//! is replaced wholesale by the next build, never mutated. Lookup is a pure
//! synchronous scan over the entries, scored the way an incremental search
//! widget would rank them.

#![allow(dead_code)]

pub mod reader;
pub mod validate;
pub mod writer;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::str::FromStr;

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};
use thiserror::Error;

use crate::core::model::{IndexEntry, SymbolRecord, Target};
use crate::core::token;
use crate::index::reader::{read_file, ReadError};

/// Query matching policy. The consuming widget filters by prefix; substring
/// and fuzzy are offline conveniences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Prefix,
    Substring,
    Fuzzy,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(MatchMode::Prefix),
            "substring" => Ok(MatchMode::Substring),
            "fuzzy" => Ok(MatchMode::Fuzzy),
            other => Err(format!(
                "unknown match mode `{}` (expected prefix, substring or fuzzy)",
                other
            )),
        }
    }
}

/// How a hit matched, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    Fuzzy,
}

impl MatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Prefix => "prefix",
            MatchKind::Substring => "substring",
            MatchKind::Fuzzy => "fuzzy",
        }
    }
}

/// One scored lookup result.
#[derive(Debug)]
pub struct SearchHit<'a> {
    pub entry: &'a IndexEntry,
    pub score: f64,
    pub kind: MatchKind,
}

/// Errors raised while turning a symbol manifest into entries.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("manifest record {index} has an empty label")]
    EmptyLabel { index: usize },
}

/// Summary numbers for an index, shown by the info command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub targets: usize,
    pub pages: usize,
    pub buckets: usize,
    pub duplicate_bases: usize,
}

/// An immutable, loaded search index.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Load an index from a single file or from a directory holding either
    /// `searchdata.js` or the split `all_<hex>.js` layout.
    pub fn load(path: &Path) -> Result<Self, ReadError> {
        if path.is_dir() {
            let mut files: Vec<std::path::PathBuf> = std::fs::read_dir(path)
                .map_err(|source| ReadError::Io {
                    path: path.display().to_string(),
                    source,
                })?
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file() && is_index_file(p))
                .collect();
            files.sort_by_key(|p| bucket_sort_key(p));

            let mut entries = Vec::new();
            for file in files {
                entries.extend(read_file(&file)?.entries);
            }
            Ok(Self { entries })
        } else {
            Ok(Self {
                entries: read_file(path)?.entries,
            })
        }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Score entries against a query. Empty queries match nothing; results
    /// come back sorted by score, ties broken by token, truncated to limit.
    pub fn lookup(&self, query: &str, mode: MatchMode, limit: usize) -> Vec<SearchHit<'_>> {
        let query_lower = query.to_lowercase();
        if query_lower.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = match mode {
            MatchMode::Fuzzy => self.fuzzy_hits(query),
            _ => self
                .entries
                .iter()
                .filter_map(|entry| {
                    score_entry(entry, &query_lower, mode)
                        .map(|(score, kind)| SearchHit { entry, score, kind })
                })
                .collect(),
        };

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entry.token.cmp(&b.entry.token))
        });
        hits.truncate(limit);
        hits
    }

    fn fuzzy_hits(&self, query: &str) -> Vec<SearchHit<'_>> {
        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();

        self.entries
            .iter()
            .filter_map(|entry| {
                let haystack = Utf32Str::new(entry.base(), &mut buf);
                pattern.score(haystack, &mut matcher).map(|score| SearchHit {
                    entry,
                    score: f64::from(score),
                    kind: MatchKind::Fuzzy,
                })
            })
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let mut targets = 0;
        let mut pages = BTreeSet::new();
        let mut buckets = BTreeSet::new();
        let mut bases: HashMap<&str, usize> = HashMap::new();

        for entry in &self.entries {
            targets += entry.targets.len();
            for target in &entry.targets {
                pages.insert(target.page.as_str());
            }
            if let Some(first) = entry.base().chars().next() {
                buckets.insert(first);
            }
            *bases.entry(entry.base()).or_insert(0) += 1;
        }

        IndexStats {
            entries: self.entries.len(),
            targets,
            pages: pages.len(),
            buckets: buckets.len(),
            duplicate_bases: bases.values().filter(|&&n| n > 1).count(),
        }
    }
}

/// Score one entry for prefix/substring lookup. Tiers follow the widget's
/// ranking: exact name, then prefix, then substring with a position penalty.
fn score_entry(entry: &IndexEntry, query_lower: &str, mode: MatchMode) -> Option<(f64, MatchKind)> {
    let base = entry.base();

    if base == query_lower {
        return Some((100.0, MatchKind::Exact));
    }
    if base.starts_with(query_lower) {
        let extra = (base.len() - query_lower.len()) as f64;
        return Some(((80.0 - extra * 0.5).max(60.0), MatchKind::Prefix));
    }
    if mode == MatchMode::Substring {
        if let Some(pos) = base.find(query_lower) {
            return Some(((50.0 - pos as f64 * 0.5).max(20.0), MatchKind::Substring));
        }
    }
    None
}

/// Turn a symbol manifest into a finished table: group records by exact
/// display label, sort by escaped base (all-lowercase labels first on ties),
/// assign the global sequence numbers in that order.
pub fn build_entries(records: &[SymbolRecord]) -> Result<Vec<IndexEntry>, BuildError> {
    for (index, record) in records.iter().enumerate() {
        if record.label.is_empty() {
            return Err(BuildError::EmptyLabel { index });
        }
    }

    // BTreeMap keyed by the final sort order so sequence numbers fall out of
    // iteration. Key: (escaped base, label not all-lowercase, label).
    let mut groups: BTreeMap<(String, bool, String), Vec<&SymbolRecord>> = BTreeMap::new();
    for record in records {
        let base = token::escape_label(&record.label);
        let mixed = record.label.chars().any(|c| c.is_uppercase());
        groups
            .entry((base, mixed, record.label.clone()))
            .or_default()
            .push(record);
    }

    let mut entries = Vec::with_capacity(groups.len());
    for (seq, ((base, _, label), group)) in groups.into_iter().enumerate() {
        let mut targets: Vec<Target> = Vec::new();
        for record in group {
            let duplicate = targets
                .iter()
                .any(|t| t.page == record.page && t.anchor == record.anchor);
            if duplicate {
                continue;
            }
            targets.push(Target {
                page: record.page.clone(),
                anchor: record.anchor.clone(),
                context: record.context.clone(),
            });
        }
        entries.push(IndexEntry {
            token: token::with_sequence(&base, seq),
            label,
            targets,
        });
    }

    Ok(entries)
}

/// Whether a file name looks like index data: `searchdata.js` or a split
/// bucket such as `all_c.js`. The widget script `search.js` is neither.
fn is_index_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == writer::SINGLE_FILE_NAME {
        return true;
    }
    let Some(stem) = name.strip_suffix(".js") else {
        return false;
    };
    match stem.rsplit_once('_') {
        Some((prefix, hex)) => {
            !prefix.is_empty() && !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Buckets sort numerically: `all_a.js` before `all_10.js`.
fn bucket_sort_key(path: &Path) -> (String, u64) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match stem.rsplit_once('_') {
        Some((prefix, hex)) => (
            prefix.to_string(),
            u64::from_str_radix(hex, 16).unwrap_or(u64::MAX),
        ),
        None => (stem.to_string(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, page: &str, anchor: Option<&str>, context: &str) -> SymbolRecord {
        SymbolRecord {
            label: label.to_string(),
            page: page.to_string(),
            anchor: anchor.map(str::to_string),
            context: context.to_string(),
        }
    }

    #[test]
    fn test_build_groups_by_exact_label() {
        let records = vec![
            record("Log", "classLog.html", None, ""),
            record("log", "classLog.html", Some("ad8c3a"), "Log::log(stats)"),
            record("log", "classLog.html", Some("a38e0e"), "Log::log(json)"),
        ];
        let entries = build_entries(&records).unwrap();
        assert_eq!(entries.len(), 2);

        // Same base, all-lowercase label sorts first; sequence follows order.
        assert_eq!(entries[0].label, "log");
        assert_eq!(entries[0].token, "log_0");
        assert_eq!(entries[0].targets.len(), 2);
        assert_eq!(entries[1].label, "Log");
        assert_eq!(entries[1].token, "log_1");
    }

    #[test]
    fn test_build_sorts_by_escaped_base() {
        let records = vec![
            record("log_env_distances", "structSettings.html", Some("a68d"), ""),
            record("Log.cpp", "Log_8cpp.html", None, ""),
            record("log", "classLog.html", Some("ad8c"), ""),
        ];
        let entries = build_entries(&records).unwrap();
        let tokens: Vec<&str> = entries.iter().map(|e| e.token.as_str()).collect();
        // log < log_2ecpp < log_5fenv... in escaped-byte order
        assert_eq!(tokens, vec!["log_0", "log_2ecpp_1", "log_5fenv_5fdistances_2"]);
    }

    #[test]
    fn test_build_collapses_duplicate_targets() {
        let records = vec![
            record("GNode", "classGNode.html", None, ""),
            record("GNode", "classGNode.html", None, ""),
        ];
        let entries = build_entries(&records).unwrap();
        assert_eq!(entries[0].targets.len(), 1);
    }

    #[test]
    fn test_build_rejects_empty_label() {
        let records = vec![record("", "p.html", None, "")];
        assert!(matches!(
            build_entries(&records),
            Err(BuildError::EmptyLabel { index: 0 })
        ));
    }

    #[test]
    fn test_lookup_prefix_vs_substring() {
        let records = vec![
            record("linearInterpolate", "classPlannerUtils.html", Some("ab7d"), ""),
            record("lineOfSight", "classGNode.html", Some("a4a9"), ""),
            record("PolygonMaze", "classPolygonMaze.html", None, ""),
        ];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());

        let prefix = index.lookup("line", MatchMode::Prefix, 10);
        assert_eq!(prefix.len(), 2);
        assert!(prefix.iter().all(|h| h.kind == MatchKind::Prefix));

        // `gon` only matches inside PolygonMaze
        assert!(index.lookup("gon", MatchMode::Prefix, 10).is_empty());
        let sub = index.lookup("gon", MatchMode::Substring, 10);
        assert_eq!(sub.len(), 1);
        assert_eq!(sub[0].entry.label, "PolygonMaze");
        assert_eq!(sub[0].kind, MatchKind::Substring);
    }

    #[test]
    fn test_lookup_exact_outranks_prefix() {
        let records = vec![
            record("load", "classScenarioLoader.html", Some("a103"), ""),
            record("loadFromSvg", "classPolygonMaze.html", Some("a7f8"), ""),
        ];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());
        let hits = index.lookup("load", MatchMode::Prefix, 10);
        assert_eq!(hits[0].entry.label, "load");
        assert_eq!(hits[0].kind, MatchKind::Exact);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_respects_limit() {
        let records = vec![
            record("GNode", "classGNode.html", None, ""),
            record("GNode_base", "classGNode__base.html", None, ""),
        ];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());
        let hits = index.lookup("GNode", MatchMode::Prefix, 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.label, "GNode");
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let records = vec![record("GNode", "classGNode.html", None, "")];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());
        assert!(index.lookup("", MatchMode::Prefix, 10).is_empty());
        assert!(index.lookup("", MatchMode::Fuzzy, 10).is_empty());
    }

    #[test]
    fn test_fuzzy_matches_subsequence() {
        let records = vec![
            record("linearInterpolate", "classPlannerUtils.html", Some("ab7d"), ""),
            record("PolygonMaze", "classPolygonMaze.html", None, ""),
        ];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());
        let hits = index.lookup("linterp", MatchMode::Fuzzy, 10);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].entry.label, "linearInterpolate");
    }

    #[test]
    fn test_stats() {
        let records = vec![
            record("Log", "classLog.html", None, ""),
            record("log", "classLog.html", Some("ad8c"), ""),
            record("GNode", "classGNode.html", None, ""),
        ];
        let index = SearchIndex::from_entries(build_entries(&records).unwrap());
        let stats = index.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.targets, 3);
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.buckets, 2); // g, l
        assert_eq!(stats.duplicate_bases, 1); // log
    }

    #[test]
    fn test_index_file_detection() {
        assert!(is_index_file(Path::new("search/searchdata.js")));
        assert!(is_index_file(Path::new("search/all_c.js")));
        assert!(is_index_file(Path::new("search/all_10.js")));
        assert!(!is_index_file(Path::new("search/search.js")));
        assert!(!is_index_file(Path::new("search/nojs.txt")));
    }

    #[test]
    fn test_load_directory_merges_buckets_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record("AbstractPlanner", "classAbstractPlanner.html", None, ""),
            record("GNode", "classGNode.html", None, ""),
            record("log", "classLog.html", Some("ad8c"), ""),
        ];
        let entries = build_entries(&records).unwrap();
        writer::write_split(dir.path(), &entries, &writer::WriteOptions::default()).unwrap();
        // the widget script must be ignored
        std::fs::write(dir.path().join("search.js"), "function Search() {}").unwrap();

        let index = SearchIndex::load(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
        let labels: Vec<&str> = index.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["AbstractPlanner", "GNode", "log"]);
    }
}
