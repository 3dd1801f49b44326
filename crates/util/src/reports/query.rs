//! Merging of the two report query input forms.
//!
//! Report commands accept query parameters both as a comma-separated
//! `key=value` list and as a JSON object string. The two are parsed
//! independently and merged into one ordered mapping, with JSON entries
//! overwriting `key=value` entries for identical keys. That precedence
//! is the canonical rule and is pinned by tests.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Ordered report query mapping, ready to be appended to a request.
pub type ReportQuery = IndexMap<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum QueryParseError {
    #[error("Invalid key=value pair: \"{0}\"")]
    InvalidPair(String),
    #[error("Invalid JSON for --query-json.")]
    InvalidJson,
    #[error("--query-json must be a JSON object.")]
    NotAnObject,
}

/// Parse a comma-separated `key=value` list.
///
/// Pairs are trimmed and empty segments skipped; a pair without `=`,
/// with an empty key, or with an empty value is an error naming the
/// offending pair. Absent/blank input yields an empty mapping.
pub fn parse_query_pairs(input: Option<&str>) -> Result<IndexMap<String, String>, QueryParseError> {
    let mut output = IndexMap::new();
    let Some(input) = input.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(output);
    };

    for pair in input.split(',').map(str::trim) {
        if pair.is_empty() {
            continue;
        }

        let Some((key, value)) = pair.split_once('=') else {
            return Err(QueryParseError::InvalidPair(pair.to_string()));
        };

        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(QueryParseError::InvalidPair(pair.to_string()));
        }

        output.insert(key.to_string(), value.to_string());
    }

    Ok(output)
}

/// Parse the `--query-json` form: it must decode to a JSON object;
/// valid JSON arrays, scalars, and `null` are rejected.
fn parse_query_json(input: Option<&str>) -> Result<ReportQuery, QueryParseError> {
    let Some(input) = input.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(ReportQuery::new());
    };

    let parsed: Value = serde_json::from_str(input).map_err(|_| QueryParseError::InvalidJson)?;
    match parsed {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => Err(QueryParseError::NotAnObject),
    }
}

/// Combine both query forms into one mapping. JSON-object entries
/// overwrite `key=value` entries for identical keys; `key=value`
/// entries not present in the JSON object are preserved.
pub fn merge_report_query_inputs(
    pairs: Option<&str>,
    json: Option<&str>,
) -> Result<ReportQuery, QueryParseError> {
    let mut merged: ReportQuery = parse_query_pairs(pairs)?
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    for (key, value) in parse_query_json(json)? {
        merged.insert(key, value);
    }

    Ok(merged)
}
