//! Report schema extraction and filtering.

use serde_json::Value;
use voluum_types::{NormalizedReportType, ReportSchema, ReportSchemaColumn};

use crate::reports::mapping::normalize_voluum_column_type;

/// Pull the column metadata out of a report response.
///
/// Reads the top-level `columnMappings` array; a missing or non-array
/// field yields an empty schema. Individual entries are read
/// field-by-field with string/bool defaults, since the upstream shape
/// is not guaranteed.
pub fn extract_report_schema(response: &Value) -> ReportSchema {
    let Some(mappings) = response.get("columnMappings").and_then(Value::as_array) else {
        return ReportSchema::default();
    };

    let columns = mappings
        .iter()
        .map(|mapping| {
            let raw_type = string_or_default(mapping, "type");
            ReportSchemaColumn {
                key: string_or_default(mapping, "key"),
                label: string_or_default(mapping, "label"),
                normalized_type: normalize_voluum_column_type(&raw_type),
                voluum_type: raw_type,
                can_group_by: mapping.get("canGroupBy").and_then(Value::as_bool).unwrap_or(false),
                can_be_restricted: mapping
                    .get("canBeRestricted")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }
        })
        .collect();

    ReportSchema { columns }
}

fn string_or_default(mapping: &Value, key: &str) -> String {
    mapping.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Independent, AND-combined column filters. Each pass only narrows the
/// list, so application order never changes the result.
#[derive(Debug, Default, Clone)]
pub struct SchemaFilter {
    pub groupable: bool,
    pub restrictable: bool,
    pub normalized_type: Option<NormalizedReportType>,
    pub search: Option<String>,
}

pub fn filter_schema_columns(
    columns: &[ReportSchemaColumn],
    filter: &SchemaFilter,
) -> Vec<ReportSchemaColumn> {
    let search = filter
        .search
        .as_deref()
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty());

    columns
        .iter()
        .filter(|column| !filter.groupable || column.can_group_by)
        .filter(|column| !filter.restrictable || column.can_be_restricted)
        .filter(|column| {
            filter
                .normalized_type
                .is_none_or(|wanted| column.normalized_type == wanted)
        })
        .filter(|column| {
            search.as_deref().is_none_or(|needle| {
                column.key.to_lowercase().contains(needle)
                    || column.label.to_lowercase().contains(needle)
                    || column.voluum_type.to_lowercase().contains(needle)
                    || column.normalized_type.as_str().contains(needle)
            })
        })
        .cloned()
        .collect()
}
