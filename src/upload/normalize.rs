// driveupload/src/upload/normalize.rs
use anyhow::{Context, Result};
use regex::Regex;

use crate::source::Row;

/// A local folder code paired with the Drive folder it goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub code: String,
    pub destination_id: String,
}

/// What a single row turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRow {
    /// Not an upload row (bad code cell or no link). Skipped quietly.
    Filtered,
    /// Looks like an upload row but the link has no `folders/<id>` part.
    MissingDestination,
    Targets(Vec<UploadTarget>),
}

/// Turns spreadsheet rows into `(code, destination)` pairs.
pub struct RowNormalizer {
    destination_pattern: Regex,
    code_separator: Regex,
}

impl RowNormalizer {
    pub fn new() -> Result<Self> {
        Ok(RowNormalizer {
            destination_pattern: Regex::new(r"folders/([a-zA-Z0-9_-]+)")
                .context("Failed to compile destination id pattern")?,
            code_separator: Regex::new(r"[,\s_-]+").context("Failed to compile code separator pattern")?,
        })
    }

    pub fn normalize(&self, row: &Row) -> NormalizedRow {
        let codes_field = row.codes_field.trim();
        let link_field = row.link_field.trim();

        if !starts_with_digit(codes_field) || is_missing(link_field) {
            return NormalizedRow::Filtered;
        }

        let Some(destination_id) = self.destination_id(link_field) else {
            return NormalizedRow::MissingDestination;
        };

        let targets = self
            .split_codes(codes_field)
            .into_iter()
            .map(|code| UploadTarget {
                code,
                destination_id: destination_id.to_string(),
            })
            .collect();
        NormalizedRow::Targets(targets)
    }

    /// Extracts the Drive folder id from a share link.
    pub fn destination_id<'a>(&self, link: &'a str) -> Option<&'a str> {
        self.destination_pattern
            .captures(link)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Splits a codes cell such as `"101,102_A 103-104"` into `["101", "102", "103", "104"]`.
    ///
    /// Each token is cut at its first underscore. Tokens that then don't start
    /// with a digit are labels (`A`, `old`), not folder codes, and are dropped.
    pub fn split_codes(&self, codes_field: &str) -> Vec<String> {
        self.code_separator
            .split(codes_field)
            .map(|token| token.split('_').next().unwrap_or(token))
            .filter(|token| starts_with_digit(token))
            .map(str::to_string)
            .collect()
    }
}

fn starts_with_digit(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Empty cells come through as `""`; exported sheets sometimes hold a literal `nan`.
fn is_missing(link_field: &str) -> bool {
    link_field.is_empty() || link_field.eq_ignore_ascii_case("nan")
}
