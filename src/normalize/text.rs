// src/normalize/text.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::numeric::{parse_number, value_text};
use crate::payload::RawRow;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern should compile"));

/// Canonical form of a header or key: NFD, combining marks dropped,
/// whitespace runs collapsed, lowercased and trimmed.
///
/// `"  Período  de\tCorte"` becomes `"periodo de corte"`.
pub fn normalize_key(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    WHITESPACE
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

fn matches_candidate(key: &str, candidate: &str) -> bool {
    !key.is_empty() && !candidate.is_empty() && (key.contains(candidate) || candidate.contains(key))
}

/// First column, in the order given, whose normalized name contains or is
/// contained in any normalized candidate.
///
/// Source order wins over candidate order: with columns `["Total", "Valor"]`
/// and candidates `["valor", "total"]` the result is `"Total"`.
pub fn resolve_column<'a, I>(columns: I, candidates: &[&str]) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted: Vec<String> = candidates.iter().map(|c| normalize_key(c)).collect();
    columns.into_iter().find(|column| {
        let key = normalize_key(column);
        wanted.iter().any(|candidate| matches_candidate(&key, candidate))
    })
}

/// Column names to resolve against: the declared `columns` when present,
/// otherwise the key order of the first row.
pub fn column_order(columns: &[String], rows: &[RawRow]) -> Vec<String> {
    if !columns.is_empty() {
        return columns.to_vec();
    }
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// A logical field (e.g. "realizado") bound to at most one concrete header.
/// Built once per payload and used only while shaping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub field: &'static str,
    pub column: Option<String>,
}

impl ColumnReference {
    pub fn resolve(field: &'static str, columns: &[String], candidates: &[&str]) -> Self {
        let column = resolve_column(columns.iter().map(String::as_str), candidates).map(str::to_string);
        match &column {
            Some(name) => debug!(field, column = %name, "resolved column"),
            None => debug!(field, ?candidates, "no column matched"),
        }
        Self { field, column }
    }

    /// Bind directly to a known column, or to nothing.
    pub fn fixed(field: &'static str, column: Option<String>) -> Self {
        Self { field, column }
    }

    pub fn is_resolved(&self) -> bool {
        self.column.is_some()
    }

    pub fn value<'r>(&self, row: &'r RawRow) -> Option<&'r Value> {
        self.column.as_deref().and_then(|name| row.get(name))
    }

    pub fn number(&self, row: &RawRow) -> Option<f64> {
        self.value(row).and_then(parse_number)
    }

    pub fn text(&self, row: &RawRow) -> Option<String> {
        self.value(row).and_then(value_text)
    }
}
