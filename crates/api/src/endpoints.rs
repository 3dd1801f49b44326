//! Static catalog of Voluum routes and response-shape probes.
//!
//! Central mapping layer for the upstream API: resource path templates,
//! the report endpoints, the login/whoami paths, and the ordered
//! field-path probes used to dig the session token (and its expiry) out
//! of a login response of undocumented shape. Adjust here if the API
//! differs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.voluum.com";
pub const AUTH_HEADER_NAME: &str = "cwauth-token";

pub const LOGIN_PATH: &str = "/auth/session";
pub const ACCESS_LOGIN_PATH: &str = "/auth/access/session";
/// `None` disables the remote identity lookup in `auth whoami`.
pub const WHOAMI_PATH: Option<&str> = Some("/user/current");

pub const REPORT_SUMMARY_PATH: &str = "/report";
pub const REPORT_RAW_PATH: &str = "/report/conversions";

/// RFC 3986 unreserved bytes stay literal in interpolated id segments;
/// everything else is percent-encoded.
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The CRUD resource families the CLI exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Campaigns,
    Offers,
    Landers,
    Flows,
    TrafficSources,
    AffiliateNetworks,
    TrackerDomains,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Campaigns,
        Resource::Offers,
        Resource::Landers,
        Resource::Flows,
        Resource::TrafficSources,
        Resource::AffiliateNetworks,
        Resource::TrackerDomains,
    ];

    /// Collection path, also used for `list` and `create`.
    pub fn base_path(&self) -> &'static str {
        match self {
            Resource::Campaigns => "/campaign",
            Resource::Offers => "/offer",
            Resource::Landers => "/lander",
            Resource::Flows => "/flow",
            Resource::TrafficSources => "/traffic-source",
            Resource::AffiliateNetworks => "/affiliate-network",
            Resource::TrackerDomains => "/domain",
        }
    }

    /// Path for a single entity; the id is percent-encoded as a path
    /// segment.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base_path(), utf8_percent_encode(id, ID_SEGMENT))
    }

    /// Field some list responses wrap their array in
    /// (`{"campaigns": [...]}` instead of a bare array).
    pub fn plural_field(&self) -> &'static str {
        match self {
            Resource::Campaigns => "campaigns",
            Resource::Offers => "offers",
            Resource::Landers => "landers",
            Resource::Flows => "flows",
            Resource::TrafficSources => "trafficSources",
            Resource::AffiliateNetworks => "affiliateNetworks",
            Resource::TrackerDomains => "trackerDomains",
        }
    }

    /// Key the CLI envelopes single-entity responses under.
    pub fn singular_key(&self) -> &'static str {
        match self {
            Resource::Campaigns => "campaign",
            Resource::Offers => "offer",
            Resource::Landers => "lander",
            Resource::Flows => "flow",
            Resource::TrafficSources => "trafficSource",
            Resource::AffiliateNetworks => "affiliateNetwork",
            Resource::TrackerDomains => "trackerDomain",
        }
    }
}

/// Prefix `value` with a single `/`, collapsing any it already has.
pub fn ensure_leading_slash(value: &str) -> String {
    format!("/{}", value.trim_start_matches('/'))
}

const TOKEN_PATHS: &[&[&str]] = &[
    &["token"],
    &["sessionToken"],
    &["accessToken"],
    &["cwauthToken"],
    &["data", "token"],
    &["data", "sessionToken"],
    &["data", "accessToken"],
];

const TOKEN_EXPIRY_PATHS: &[&[&str]] = &[
    &["tokenExpiresAt"],
    &["expiresAt"],
    &["expirationDate"],
    &["expirationTimestamp"],
    &["data", "tokenExpiresAt"],
    &["data", "expiresAt"],
];

/// Best-effort token extraction from a login response of unknown shape.
///
/// The candidate paths are tried in priority order and the first
/// non-empty string wins. No match is a normal, reportable condition
/// (surfaced as a login failure by the command layer), not a parse
/// error.
pub fn extract_auth_token(payload: &Value) -> Option<String> {
    first_string_at(payload, TOKEN_PATHS)
}

/// Same probing strategy for the token expiry timestamp.
pub fn extract_token_expiry(payload: &Value) -> Option<String> {
    first_string_at(payload, TOKEN_EXPIRY_PATHS)
}

fn first_string_at(payload: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|segments| {
        let mut current = payload;
        for segment in *segments {
            current = current.get(segment)?;
        }

        match current {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn item_paths_encode_reserved_id_bytes() {
        assert_eq!(
            Resource::Campaigns.item_path("abc-123"),
            "/campaign/abc-123"
        );
        assert_eq!(
            Resource::Offers.item_path("team/offer one"),
            "/offer/team%2Foffer%20one"
        );
    }

    #[test]
    fn ensure_leading_slash_collapses_duplicates() {
        assert_eq!(ensure_leading_slash("report"), "/report");
        assert_eq!(ensure_leading_slash("/report"), "/report");
        assert_eq!(ensure_leading_slash("//report"), "/report");
    }

    #[test]
    fn token_probe_prefers_earlier_paths() {
        let payload = json!({"token": "top", "data": {"token": "nested"}});
        assert_eq!(extract_auth_token(&payload).as_deref(), Some("top"));
    }

    #[test]
    fn token_probe_reaches_nested_data_fields() {
        let payload = json!({"data": {"accessToken": "  nested-token  "}});
        assert_eq!(extract_auth_token(&payload).as_deref(), Some("nested-token"));
    }

    #[test]
    fn token_probe_skips_blank_and_non_string_values() {
        assert_eq!(extract_auth_token(&json!({"token": "   "})), None);
        assert_eq!(extract_auth_token(&json!({"token": 42})), None);
        assert_eq!(extract_auth_token(&json!("just a string")), None);
        assert_eq!(extract_auth_token(&json!({"session": "unrelated"})), None);
    }

    #[test]
    fn expiry_probe_follows_same_priority_order() {
        let payload = json!({
            "expirationDate": "2026-03-01T00:00:00Z",
            "data": {"expiresAt": "2026-04-01T00:00:00Z"}
        });
        assert_eq!(
            extract_token_expiry(&payload).as_deref(),
            Some("2026-03-01T00:00:00Z")
        );
        assert_eq!(extract_token_expiry(&json!({})), None);
    }

    #[test]
    fn every_resource_has_consistent_catalog_entries() {
        for resource in Resource::ALL {
            assert!(resource.base_path().starts_with('/'));
            assert!(!resource.plural_field().is_empty());
            assert!(!resource.singular_key().is_empty());
            assert!(resource.item_path("x").starts_with(resource.base_path()));
        }
    }
}
