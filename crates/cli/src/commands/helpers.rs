//! Small validation and input-resolution helpers shared by commands.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::Value;
use voluum_api::QueryParams;

use crate::cli::DataArgs;
use crate::error::CommandError;

/// Accepts full RFC 3339 timestamps as well as bare `YYYY-MM-DD` dates.
pub fn assert_iso_date(value: &str, flag: &str) -> Result<(), CommandError> {
    let trimmed = value.trim();
    let parses = DateTime::parse_from_rfc3339(trimmed).is_ok()
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").is_ok();

    if parses {
        Ok(())
    } else {
        Err(CommandError::operational(format!(
            "Invalid {flag}. Expected an ISO date/time string."
        )))
    }
}

pub fn parse_json_arg(input: &str, flag: &str) -> Result<Value, CommandError> {
    serde_json::from_str(input)
        .map_err(|_| CommandError::operational(format!("Invalid JSON for {flag}.")))
}

/// Resolve a request body from `--data` or `--file` (exactly one).
pub async fn resolve_data_input(input: &DataArgs) -> Result<Value, CommandError> {
    match (&input.data, &input.file) {
        (Some(_), Some(_)) => {
            Err(CommandError::operational("Use either --data or --file, not both."))
        }
        (None, Some(path)) => read_data_file(path).await,
        (Some(data), None) => parse_json_arg(data, "--data"),
        (None, None) => Err(CommandError::operational("Either --data or --file is required.")),
    }
}

async fn read_data_file(path: &Path) -> Result<Value, CommandError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|error| {
        CommandError::operational(format!("Failed to read {}: {error}", path.display()))
    })?;

    serde_json::from_str(&content)
        .map_err(|_| CommandError::operational(format!("Invalid JSON in file: {}", path.display())))
}

pub fn string_pairs_to_query(pairs: IndexMap<String, String>) -> QueryParams {
    pairs.into_iter().map(|(key, value)| (key, Value::String(value))).collect()
}

pub fn validate_positive(value: Option<i64>, flag: &str) -> Result<(), CommandError> {
    match value {
        Some(value) if value <= 0 => {
            Err(CommandError::operational(format!("{flag} must be a positive integer.")))
        }
        _ => Ok(()),
    }
}

pub fn validate_non_negative(value: Option<i64>, flag: &str) -> Result<(), CommandError> {
    match value {
        Some(value) if value < 0 => {
            Err(CommandError::operational(format!("{flag} must be a non-negative integer.")))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn iso_dates_accept_common_forms() {
        assert!(assert_iso_date("2026-02-01", "--from").is_ok());
        assert!(assert_iso_date("2026-02-01T00:00:00.000Z", "--from").is_ok());
        assert!(assert_iso_date("2026-02-01T10:30:00+02:00", "--from").is_ok());
        assert!(assert_iso_date("2026-02-01T10:30:00", "--from").is_ok());
    }

    #[test]
    fn iso_dates_reject_garbage_with_the_flag_name() {
        let error = assert_iso_date("next tuesday", "--to").unwrap_err();
        assert_eq!(error.to_string(), "Invalid --to. Expected an ISO date/time string.");
    }

    #[test]
    fn limits_must_be_positive_and_offsets_non_negative() {
        assert!(validate_positive(None, "--limit").is_ok());
        assert!(validate_positive(Some(10), "--limit").is_ok());
        assert!(validate_positive(Some(0), "--limit").is_err());
        assert!(validate_positive(Some(-3), "--limit").is_err());

        assert!(validate_non_negative(Some(0), "--offset").is_ok());
        let error = validate_non_negative(Some(-1), "--offset").unwrap_err();
        assert_eq!(error.to_string(), "--offset must be a non-negative integer.");
    }

    #[tokio::test]
    async fn data_input_requires_exactly_one_source() {
        let both = DataArgs {
            data: Some("{}".to_string()),
            file: Some(std::path::PathBuf::from("body.json")),
        };
        let error = resolve_data_input(&both).await.unwrap_err();
        assert_eq!(error.to_string(), "Use either --data or --file, not both.");

        let neither = DataArgs::default();
        let error = resolve_data_input(&neither).await.unwrap_err();
        assert_eq!(error.to_string(), "Either --data or --file is required.");
    }

    #[tokio::test]
    async fn data_input_parses_inline_json() {
        let input = DataArgs { data: Some(r#"{"name":"Offer"}"#.to_string()), file: None };
        assert_eq!(resolve_data_input(&input).await.unwrap(), json!({"name": "Offer"}));

        let invalid = DataArgs { data: Some("{oops".to_string()), file: None };
        let error = resolve_data_input(&invalid).await.unwrap_err();
        assert_eq!(error.to_string(), "Invalid JSON for --data.");
    }

    #[tokio::test]
    async fn data_input_reads_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, r#"{"name":"From file"}"#).unwrap();

        let input = DataArgs { data: None, file: Some(path.clone()) };
        assert_eq!(resolve_data_input(&input).await.unwrap(), json!({"name": "From file"}));

        std::fs::write(&path, "not json").unwrap();
        let error = resolve_data_input(&input).await.unwrap_err();
        assert!(error.to_string().starts_with("Invalid JSON in file:"));
    }

    #[test]
    fn string_pairs_become_string_query_values() {
        let mut pairs = IndexMap::new();
        pairs.insert("country".to_string(), "US".to_string());
        let query = string_pairs_to_query(pairs);
        assert_eq!(query.get("country"), Some(&json!("US")));
    }
}
