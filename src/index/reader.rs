//! Index file reader
//!
//! Parses the generated `var searchData=[...]` literal back into entries.
//! The format is a single assignment of one array literal to a module-level
//! variable: single-quoted strings with backslash escapes, nested arrays,
//! and an integer flag inside each target triple. Anything beyond that one
//! assignment is an error.

use std::path::Path;

use thiserror::Error;

use crate::core::model::{IndexEntry, Target};

/// Errors produced while reading an index file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("missing `var <name> =` assignment")]
    MissingAssignment,

    #[error("index variable assigned more than once (second assignment at line {line})")]
    DuplicateAssignment { line: usize },

    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unexpected character `{found}` at line {line}, column {column}")]
    Unexpected { found: char, line: usize, column: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("trailing content after the index literal at line {line}")]
    TrailingContent { line: usize },

    #[error("malformed entry {index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A parsed index file: the variable it assigns and its entries, in file
/// order.
#[derive(Debug, Clone)]
pub struct IndexFile {
    pub var_name: String,
    pub entries: Vec<IndexEntry>,
}

/// Parse a single index file from disk.
pub fn read_file(path: &Path) -> Result<IndexFile, ReadError> {
    let source = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&source)
}

/// Parse index source text.
pub fn parse(source: &str) -> Result<IndexFile, ReadError> {
    let mut scanner = Scanner::new(source);

    scanner.skip_ws();
    scanner.expect_keyword("var")?;
    scanner.skip_ws();
    let var_name = scanner.ident()?;
    scanner.skip_ws();
    scanner.expect_char('=')?;
    scanner.skip_ws();
    let value = scanner.value()?;
    scanner.skip_ws();
    scanner.expect_char(';')?;
    scanner.skip_ws();

    if !scanner.at_end() {
        // A second `var` means the fixed variable was assigned twice; any
        // other leftover text is garbage either way.
        if scanner.peek_keyword("var") {
            return Err(ReadError::DuplicateAssignment { line: scanner.line });
        }
        return Err(ReadError::TrailingContent { line: scanner.line });
    }

    let rows = match value {
        Value::Arr(rows) => rows,
        _ => {
            return Err(ReadError::MalformedEntry {
                index: 0,
                reason: "top-level value is not an array".to_string(),
            })
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        entries.push(entry_from_value(index, row)?);
    }

    Ok(IndexFile { var_name, entries })
}

fn entry_from_value(index: usize, value: Value) -> Result<IndexEntry, ReadError> {
    let malformed = |reason: &str| ReadError::MalformedEntry {
        index,
        reason: reason.to_string(),
    };

    let mut parts = match value {
        Value::Arr(parts) => parts.into_iter(),
        _ => return Err(malformed("entry is not an array")),
    };

    let token = match parts.next() {
        Some(Value::Str(token)) => token,
        _ => return Err(malformed("entry token is missing or not a string")),
    };

    let mut body = match parts.next() {
        Some(Value::Arr(body)) => body.into_iter(),
        _ => return Err(malformed("entry body is missing or not an array")),
    };
    if parts.next().is_some() {
        return Err(malformed("entry has extra elements after its body"));
    }

    let label = match body.next() {
        Some(Value::Str(label)) => label,
        _ => return Err(malformed("entry label is missing or not a string")),
    };

    let mut targets = Vec::new();
    for part in body {
        let triple = match part {
            Value::Arr(triple) => triple,
            _ => return Err(malformed("target is not an array")),
        };
        // [url, flag, context] — the flag is the widget's live marker and
        // any integer is accepted there.
        if triple.len() != 3 {
            return Err(malformed("target is not a [url, flag, context] triple"));
        }
        let mut triple = triple.into_iter();
        let url = match triple.next() {
            Some(Value::Str(url)) => url,
            _ => return Err(malformed("target url is not a string")),
        };
        match triple.next() {
            Some(Value::Num(_)) => {}
            _ => return Err(malformed("target flag is not a number")),
        }
        let context = match triple.next() {
            Some(Value::Str(context)) => context,
            _ => return Err(malformed("target context is not a string")),
        };

        let (page, anchor) = split_href(&url);
        targets.push(Target {
            page,
            anchor,
            context,
        });
    }

    if targets.is_empty() {
        return Err(malformed("entry has no targets"));
    }

    Ok(IndexEntry {
        token,
        label,
        targets,
    })
}

/// Split an on-disk URL into page and anchor, dropping the relative prefix
/// the generator adds for the `search/` subdirectory. An empty anchor after
/// `#` is preserved so validation can flag it.
fn split_href(url: &str) -> (String, Option<String>) {
    let trimmed = url
        .strip_prefix("../")
        .or_else(|| url.strip_prefix("./"))
        .unwrap_or(url);
    match trimmed.split_once('#') {
        Some((page, anchor)) => (page.to_string(), Some(anchor.to_string())),
        None => (trimmed.to_string(), None),
    }
}

#[derive(Debug)]
enum Value {
    Str(String),
    Num(i64),
    Arr(Vec<Value>),
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn unexpected(&mut self) -> ReadError {
        match self.peek() {
            Some(found) => ReadError::Unexpected {
                found,
                line: self.line,
                column: self.column,
            },
            None => ReadError::UnexpectedEof,
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ReadError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ReadError> {
        for expected in keyword.chars() {
            if self.peek() != Some(expected) {
                return Err(ReadError::MissingAssignment);
            }
            self.bump();
        }
        Ok(())
    }

    fn peek_keyword(&mut self, keyword: &str) -> bool {
        // Only called at a recovery point; a clone of the iterator is enough
        // to look ahead without committing.
        let mut ahead = self.chars.clone();
        keyword.chars().all(|expected| ahead.next() == Some(expected))
    }

    fn ident(&mut self) -> Result<String, ReadError> {
        let mut name = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            name.push(self.bump().unwrap_or_default());
        }
        if name.is_empty() {
            return Err(ReadError::MissingAssignment);
        }
        Ok(name)
    }

    fn value(&mut self) -> Result<Value, ReadError> {
        match self.peek() {
            Some('[') => self.array(),
            Some('\'') => self.string(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            _ => Err(self.unexpected()),
        }
    }

    fn array(&mut self) -> Result<Value, ReadError> {
        self.expect_char('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Arr(items));
                }
                None => return Err(ReadError::UnexpectedEof),
                _ => {}
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn string(&mut self) -> Result<Value, ReadError> {
        let (start_line, start_column) = (self.line, self.column);
        self.expect_char('\'')?;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(Value::Str(text)),
                Some('\\') => match self.bump() {
                    Some('\'') => text.push('\''),
                    Some('\\') => text.push('\\'),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => {
                        // Unknown escape: keep it verbatim, the widget does.
                        text.push('\\');
                        text.push(other);
                    }
                    None => {
                        return Err(ReadError::UnterminatedString {
                            line: start_line,
                            column: start_column,
                        })
                    }
                },
                Some(other) => text.push(other),
                None => {
                    return Err(ReadError::UnterminatedString {
                        line: start_line,
                        column: start_column,
                    })
                }
            }
        }
    }

    fn number(&mut self) -> Result<Value, ReadError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push(self.bump().unwrap_or_default());
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.bump().unwrap_or_default());
        }
        text.parse::<i64>().map(Value::Num).map_err(|_| self.unexpected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "var searchData=\n[\n  ['log_329',['log',['../classLog.html#ad8c3a',1,'Log::log(const PathStatistics &amp;stats)'],['../classLog.html#a38e0e',1,'Log::log(const nlohmann::json &amp;stats)']]],\n  ['log_330',['Log',['../classLog.html',1,'']]]\n];\n";

    #[test]
    fn test_parse_sample_index() {
        let file = parse(SAMPLE).unwrap();
        assert_eq!(file.var_name, "searchData");
        assert_eq!(file.entries.len(), 2);

        let first = &file.entries[0];
        assert_eq!(first.token, "log_329");
        assert_eq!(first.label, "log");
        assert_eq!(first.targets.len(), 2);
        assert_eq!(first.targets[0].page, "classLog.html");
        assert_eq!(first.targets[0].anchor.as_deref(), Some("ad8c3a"));
        assert_eq!(
            first.targets[0].context,
            "Log::log(const PathStatistics &amp;stats)"
        );

        let second = &file.entries[1];
        assert_eq!(second.base(), "log");
        assert_eq!(second.targets[0].anchor, None);
        assert_eq!(second.targets[0].context, "");
    }

    #[test]
    fn test_escaped_quote_in_label() {
        let source = "var searchData=[['a_0',['don\\'t',['../p.html#x',1,'']]]];";
        let file = parse(source).unwrap();
        assert_eq!(file.entries[0].label, "don't");
    }

    #[test]
    fn test_missing_assignment() {
        assert!(matches!(
            parse("[['a_0',['a',['../p.html',1,'']]]];"),
            Err(ReadError::MissingAssignment)
        ));
    }

    #[test]
    fn test_duplicate_assignment() {
        let source = "var searchData=[];\nvar searchData=[];";
        assert!(matches!(
            parse(source),
            Err(ReadError::DuplicateAssignment { line: 2 })
        ));
    }

    #[test]
    fn test_trailing_garbage() {
        let source = "var searchData=[]; nonsense";
        assert!(matches!(parse(source), Err(ReadError::TrailingContent { .. })));
    }

    #[test]
    fn test_unterminated_string() {
        let source = "var searchData=[['a_0',['broken";
        assert!(matches!(
            parse(source),
            Err(ReadError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_entry_without_targets_is_malformed() {
        let source = "var searchData=[['a_0',['a']]];";
        assert!(matches!(
            parse(source),
            Err(ReadError::MalformedEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_flag_value_is_not_interpreted() {
        let source = "var searchData=[['a_0',['a',['../p.html#x',7,'ctx']]]];";
        let file = parse(source).unwrap();
        assert_eq!(file.entries[0].targets[0].context, "ctx");
    }
}
