use voluum_types::NormalizedReportType;

/// Map a raw Voluum column type string onto the normalized enumeration.
///
/// Matching is case-insensitive; any `monetary*` prefix counts as
/// money; unrecognized declarations map to
/// [`NormalizedReportType::Unknown`] rather than failing.
pub fn normalize_voluum_column_type(raw: &str) -> NormalizedReportType {
    let normalized = raw.trim().to_ascii_lowercase();

    match normalized.as_str() {
        "string" | "string-value" => NormalizedReportType::Text,
        "integer" => NormalizedReportType::Integer,
        "percentage" => NormalizedReportType::Percentage,
        "yesno" => NormalizedReportType::Boolean,
        "seconds-to-hhmmss" => NormalizedReportType::DurationSeconds,
        _ if normalized.starts_with("monetary") => NormalizedReportType::Money,
        _ => NormalizedReportType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_declarations() {
        assert_eq!(normalize_voluum_column_type("string"), NormalizedReportType::Text);
        assert_eq!(normalize_voluum_column_type("string-value"), NormalizedReportType::Text);
        assert_eq!(normalize_voluum_column_type("integer"), NormalizedReportType::Integer);
        assert_eq!(normalize_voluum_column_type("percentage"), NormalizedReportType::Percentage);
        assert_eq!(normalize_voluum_column_type("yesno"), NormalizedReportType::Boolean);
        assert_eq!(
            normalize_voluum_column_type("seconds-to-hhmmss"),
            NormalizedReportType::DurationSeconds
        );
    }

    #[test]
    fn any_monetary_prefix_maps_to_money() {
        assert_eq!(normalize_voluum_column_type("monetary"), NormalizedReportType::Money);
        assert_eq!(
            normalize_voluum_column_type("monetary-decimal-4"),
            NormalizedReportType::Money
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            normalize_voluum_column_type("SECONDS-TO-HHMMSS"),
            NormalizedReportType::DurationSeconds
        );
        assert_eq!(normalize_voluum_column_type("  YesNo "), NormalizedReportType::Boolean);
        assert_eq!(normalize_voluum_column_type("Monetary-Eur"), NormalizedReportType::Money);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(normalize_voluum_column_type("uuid"), NormalizedReportType::Unknown);
        assert_eq!(normalize_voluum_column_type(""), NormalizedReportType::Unknown);
    }
}
