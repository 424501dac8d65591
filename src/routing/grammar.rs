//! Encoded proxy specification parser.
//!
//! ```text
//! spec    := record ( RS record )*
//! RS      := ";" | newline
//! record  := prefix FS target ( FS toggle )?
//! FS      := "|"
//! toggle  := "true" | "false"
//! ```
//!
//! Example: `/api|http://localhost:9000|true;/ws|ws://localhost:9001`
//!
//! Blank records are ignored. A malformed record is skipped and reported,
//! parsing continues with the next one. Duplicate prefixes: last wins.

use thiserror::Error;
use url::Url;

use crate::routing::table::{ProxyRule, ProxyTable};

pub const RECORD_DELIMITERS: &[char] = &[';', '\n'];
pub const FIELD_DELIMITER: char = '|';
pub const ROUTE_DELIMITER: char = '/';

const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

/// Why a record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected `prefix|target[|rewrite]`, found {0} field(s)")]
    FieldCount(usize),

    #[error("path prefix {0:?} must start with '/'")]
    InvalidPrefix(String),

    #[error("invalid target URL {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("unsupported target scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("rewrite toggle must be \"true\" or \"false\", found {0:?}")]
    InvalidToggle(String),
}

/// A record dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based position of the record in the specification.
    pub index: usize,
    pub raw: String,
    pub error: RecordError,
}

/// Parse result: the table plus diagnostics for skipped records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProxySpec {
    pub table: ProxyTable,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse an encoded proxy specification.
pub fn parse_proxy_spec(spec: &str) -> ParsedProxySpec {
    let mut parsed = ParsedProxySpec::default();

    for (index, raw) in records(spec) {
        match parse_record(raw) {
            Ok(rule) => {
                if let Some(previous) = parsed.table.insert(rule) {
                    tracing::debug!(
                        prefix = %previous.prefix,
                        replaced_target = %previous.target,
                        "Duplicate proxy prefix, later record wins"
                    );
                }
            }
            Err(error) => {
                tracing::warn!(record = index, raw, %error, "Skipping malformed proxy record");
                parsed.skipped.push(SkippedRecord {
                    index,
                    raw: raw.to_string(),
                    error,
                });
            }
        }
    }

    parsed
}

/// Split into trimmed, non-blank records with their 1-based positions.
fn records(spec: &str) -> impl Iterator<Item = (usize, &str)> {
    spec.split(RECORD_DELIMITERS)
        .map(str::trim)
        .enumerate()
        .filter(|(_, raw)| !raw.is_empty())
        .map(|(i, raw)| (i + 1, raw))
}

fn parse_record(raw: &str) -> Result<ProxyRule, RecordError> {
    let fields: Vec<&str> = raw.split(FIELD_DELIMITER).map(str::trim).collect();
    let (prefix, target, toggle) = match fields.as_slice() {
        [prefix, target] => (*prefix, *target, None),
        [prefix, target, toggle] => (*prefix, *target, Some(*toggle)),
        other => return Err(RecordError::FieldCount(other.len())),
    };

    if !prefix.starts_with(ROUTE_DELIMITER) {
        return Err(RecordError::InvalidPrefix(prefix.to_string()));
    }

    let url = Url::parse(target).map_err(|e| RecordError::InvalidTarget {
        target: target.to_string(),
        reason: e.to_string(),
    })?;
    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(RecordError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.has_host() {
        return Err(RecordError::InvalidTarget {
            target: target.to_string(),
            reason: "missing host".to_string(),
        });
    }

    let rewrite = match toggle {
        None => false,
        Some("true") => true,
        Some("false") => false,
        Some(other) => return Err(RecordError::InvalidToggle(other.to_string())),
    };

    Ok(ProxyRule::new(prefix, target, rewrite, url.scheme() == "https"))
}
