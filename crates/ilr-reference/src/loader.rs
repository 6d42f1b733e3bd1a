//! Loaders for reference tables.
//!
//! Production ingestion populates [`ReferenceTables`] from its own sources.
//! These loaders cover the file-based inputs used by the CLI and tests: a
//! JSON bundle holding every table, and a published rule table in CSV form.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use ilr_model::Severity;

use crate::error::{ReferenceError, Result};
use crate::tables::{ReferenceTables, RuleMetadata};

const RULE_NAME_COLUMN: &str = "Rule Name";
const SEVERITY_COLUMN: &str = "Severity";
const MESSAGE_COLUMN: &str = "Message";

impl ReferenceTables {
    /// Parse a JSON reference bundle from any reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|source| ReferenceError::Json {
            origin: "<reader>".to_string(),
            source,
        })
    }

    /// Load a JSON reference bundle from disk.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ReferenceError::Json {
            origin: path.display().to_string(),
            source,
        })
    }
}

/// Load a rule table from CSV.
///
/// Requires the `Rule Name`, `Severity` and `Message` headers (any column
/// order). Blank rule names are skipped. A blank severity is kept as `None`;
/// an unrecognised one is an error so a typo in the table cannot silently
/// downgrade a rule.
pub fn load_rule_table_csv(path: &Path) -> Result<Vec<RuleMetadata>> {
    let file = open(path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();

    let name_idx = find_column(&headers, RULE_NAME_COLUMN, path)?;
    let severity_idx = find_column(&headers, SEVERITY_COLUMN, path)?;
    let message_idx = find_column(&headers, MESSAGE_COLUMN, path)?;

    let mut rules = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| csv_error(path, source))?;

        let rule_name = record.get(name_idx).unwrap_or("").trim().to_string();
        if rule_name.is_empty() {
            continue;
        }

        let raw_severity = record.get(severity_idx).unwrap_or("").trim();
        let severity = if raw_severity.is_empty() {
            None
        } else {
            Some(
                Severity::parse(raw_severity).ok_or_else(|| ReferenceError::InvalidValue {
                    field: "severity",
                    value: raw_severity.to_string(),
                    file: path.to_path_buf(),
                })?,
            )
        };

        rules.push(RuleMetadata {
            rule_name,
            severity,
            message: record.get(message_idx).unwrap_or("").trim().to_string(),
        });
    }

    debug!(path = %path.display(), rules = rules.len(), "rule table loaded");
    Ok(rules)
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(ReferenceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    File::open(path).map_err(|source| ReferenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn find_column(headers: &csv::StringRecord, name: &'static str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| ReferenceError::MissingColumn {
            column: name,
            path: path.to_path_buf(),
        })
}

fn csv_error(path: &Path, source: csv::Error) -> ReferenceError {
    ReferenceError::CsvRead {
        path: path.to_path_buf(),
        source,
    }
}
