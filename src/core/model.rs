//! Search index data model
//!
//! One index is a flat, ordered table of entries. Each entry maps a generated
//! lowercase token to a display label and one or more documentation targets.
//! The table is produced in full by a single build and is immutable once
//! loaded; the next build replaces it wholesale.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A single documentation location an entry points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Page file name, e.g. `classLog.html`. Stored without the directory
    /// prefix the on-disk form carries (`../classLog.html`).
    pub page: String,
    /// In-page anchor id. Class and struct overview pages have none;
    /// member references always carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// HTML snippet shown next to the result. May be empty and may contain
    /// entities (`&amp;`, `&#160;`) that pass through untouched.
    #[serde(default)]
    pub context: String,
}

impl Target {
    pub fn new(page: impl Into<String>, anchor: Option<String>, context: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            anchor,
            context: context.into(),
        }
    }

    /// The URL fragment as the widget sees it: `page` or `page#anchor`.
    pub fn href(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.page, anchor),
            None => self.page.clone(),
        }
    }
}

/// One row of the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Generated search key: the label lowercased, non-alphanumerics escaped
    /// as `_xx` hex pairs, plus a `_N` sequence suffix. Not required to be
    /// unique.
    pub token: String,
    /// Display form, original capitalization preserved.
    pub label: String,
    /// Ordered targets; overloads of one label share an entry.
    pub targets: Vec<Target>,
}

impl IndexEntry {
    /// The token without its trailing sequence suffix. This is what queries
    /// match against; literal underscores in the label were hex-escaped at
    /// build time, so the final `_<digits>` group is read as the suffix.
    pub fn base(&self) -> &str {
        crate::core::token::strip_sequence(&self.token)
    }
}

/// One record of the builder's input manifest: a symbol table row from the
/// codebase the documentation was generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Display label, e.g. `PlannerUtils::linearInterpolate` or `Log`.
    pub label: String,
    /// Page the symbol is documented on.
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Qualified signature or other snippet for disambiguation in the
    /// result list. Empty when the label alone is enough.
    #[serde(default)]
    pub context: String,
}
