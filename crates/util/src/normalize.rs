//! Response shape normalization.
//!
//! The upstream API is inconsistent about list responses (sometimes a
//! bare array, sometimes `{resourceName: [...]}`) and report responses
//! carry a pile of implementation-detail fields that drown the actual
//! data. Both adjustments here are deliberately forgiving: an
//! unexpected shape passes through unchanged rather than failing the
//! command.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

/// Fields removed from every report row before display. This is a
/// closed enumeration tied to one upstream schema, maintained as a
/// plain deny-list rather than any pattern scheme.
static STRIP_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "actions",
        "hour",
        "pixelUrl",
        "postbackUrl",
        "campaignUrl",
        "campaignUrlConfigured",
        "campaignIdMarker",
        "campaignNotes",
        "campaignTags",
        "campaignCountry",
        "campaignCurrencyCode",
        "campaignDailyBudget",
        "campaignWorkspaceId",
        "campaignWorkspaceName",
        "clickRedirectType",
        "costSources",
        "externalCampaignId",
        "externalStatus",
        "biddingStatus",
        "bidInfo",
        "bid",
        "type",
        "deleted",
        "created",
        "updated",
        "timeToInstallRange0",
        "timeToInstallRange1",
        "timeToInstallRange2",
    ])
});

/// Unwrap a list-shaped response.
///
/// A bare array is returned unchanged (the operation is idempotent); an
/// object whose `plural_field` holds an array yields that array; any
/// other shape passes through untouched.
pub fn unwrap_list(payload: Value, plural_field: &str) -> Value {
    match payload {
        Value::Array(_) => payload,
        Value::Object(mut object) => {
            if matches!(object.get(plural_field), Some(Value::Array(_)))
                && let Some(list) = object.remove(plural_field)
            {
                return list;
            }
            Value::Object(object)
        }
        _ => payload,
    }
}

/// Remove high-noise metadata from a report response before printing.
///
/// Drops the top-level `columnMappings` field and strips the fixed
/// deny-list from every object inside a top-level `rows` array, leaving
/// all other fields in their original per-row order. Non-object
/// responses and non-array `rows` values pass through unmodified.
pub fn strip_report_noise(payload: Value) -> Value {
    let object = match payload {
        Value::Object(object) => object,
        other => return other,
    };

    let mut out = Map::new();
    for (key, value) in object {
        if key == "columnMappings" {
            continue;
        }

        if key == "rows" {
            match value {
                Value::Array(rows) => {
                    let stripped = rows.into_iter().map(strip_row).collect();
                    out.insert(key, Value::Array(stripped));
                }
                other => {
                    out.insert(key, other);
                }
            }
            continue;
        }

        out.insert(key, value);
    }

    Value::Object(out)
}

fn strip_row(row: Value) -> Value {
    match row {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(key, _)| !STRIP_KEYS.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}
