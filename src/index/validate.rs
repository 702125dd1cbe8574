//! Structural validation
//!
//! An index has no behavior of its own, so the checks are well-formedness
//! checks: tokens lowercase and suffixed, labels present, every target
//! pointing somewhere. Violations are collected and reported, never raised
//! as hard errors; a malformed entry only ever degrades search results in
//! the consuming widget.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ignore::gitignore::Gitignore;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::model::IndexEntry;
use crate::core::token;

/// A single well-formedness violation, tied to the entry that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("entry {index}: token is empty")]
    EmptyToken { index: usize },

    #[error("entry {index} (`{token}`): token contains characters outside [a-z0-9_]")]
    MalformedToken { index: usize, token: String },

    #[error("entry {index} (`{token}`): token has no sequence suffix")]
    MissingSequence { index: usize, token: String },

    #[error("entry {index} (`{token}`): label is empty")]
    EmptyLabel { index: usize, token: String },

    #[error("entry {index} (`{token}`): entry has no targets")]
    NoTargets { index: usize, token: String },

    #[error("entry {index} (`{token}`): target {target} has an empty page")]
    EmptyPage { index: usize, token: String, target: usize },

    #[error("entry {index} (`{token}`): target {target} has a `#` with an empty anchor")]
    EmptyAnchor { index: usize, token: String, target: usize },

    #[error("entry {index} (`{token}`): target {target} carries no anchor (strict)")]
    AnchorRequired { index: usize, token: String, target: usize },

    #[error("entry {index} (`{token}`): token already used by entry {first}")]
    DuplicateToken { index: usize, token: String, first: usize },

    #[error("entry {index} (`{token}`): page `{page}` not found under docs root")]
    MissingPage { index: usize, token: String, page: String },
}

/// Validate a table of entries. Strict mode additionally requires anchors on
/// every target and globally unique tokens.
pub fn validate(entries: &[IndexEntry], strict: bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let token = entry.token.clone();

        if entry.token.is_empty() {
            violations.push(Violation::EmptyToken { index });
        } else if !token::is_well_formed(&entry.token) {
            violations.push(Violation::MalformedToken {
                index,
                token: token.clone(),
            });
        } else if !token::has_sequence(&entry.token) {
            violations.push(Violation::MissingSequence {
                index,
                token: token.clone(),
            });
        }

        if entry.label.is_empty() {
            violations.push(Violation::EmptyLabel {
                index,
                token: token.clone(),
            });
        }

        if entry.targets.is_empty() {
            violations.push(Violation::NoTargets {
                index,
                token: token.clone(),
            });
        }

        for (t, target) in entry.targets.iter().enumerate() {
            if target.page.is_empty() {
                violations.push(Violation::EmptyPage {
                    index,
                    token: token.clone(),
                    target: t,
                });
            }
            match &target.anchor {
                Some(anchor) if anchor.is_empty() => {
                    violations.push(Violation::EmptyAnchor {
                        index,
                        token: token.clone(),
                        target: t,
                    });
                }
                None if strict => {
                    violations.push(Violation::AnchorRequired {
                        index,
                        token: token.clone(),
                        target: t,
                    });
                }
                _ => {}
            }
        }

        if strict && !entry.token.is_empty() {
            if let Some(&first) = seen.get(entry.token.as_str()) {
                violations.push(Violation::DuplicateToken {
                    index,
                    token,
                    first,
                });
            } else {
                seen.insert(entry.token.as_str(), index);
            }
        }
    }

    violations
}

/// Check that every referenced page exists under the documentation root.
/// Hidden directories and gitignored files are skipped the same way the
/// build-side directory walks do.
pub fn check_links(entries: &[IndexEntry], docs_root: &Path) -> Vec<Violation> {
    let pages = collect_pages(docs_root);

    let mut violations = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        for target in &entry.targets {
            if !target.page.is_empty() && !pages.contains(target.page.as_str()) {
                violations.push(Violation::MissingPage {
                    index,
                    token: entry.token.clone(),
                    page: target.page.clone(),
                });
            }
        }
    }
    violations
}

fn collect_pages(docs_root: &Path) -> HashSet<String> {
    let gitignore_path = docs_root.join(".gitignore");
    let gitignore = if gitignore_path.exists() {
        Gitignore::new(&gitignore_path).0
    } else {
        Gitignore::empty()
    };

    let mut pages = HashSet::new();
    for entry in WalkDir::new(docs_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && name.starts_with('.') {
                return false;
            }
            !gitignore.matched(e.path(), e.path().is_dir()).is_ignore()
        })
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() {
            if let Ok(relative) = entry.path().strip_prefix(docs_root) {
                pages.insert(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    pages
}
