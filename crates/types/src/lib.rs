//! Shared data model for the Voluum CLI workspace.
//!
//! This crate holds the types every other crate agrees on:
//!
//! - The [`Envelope`] each command emits on stdout
//! - The serializable [`ErrorBody`] inside failure envelopes and the
//!   reserved error [`codes`]
//! - The persisted [`SessionConfig`] payload
//! - Report schema column types and the [`NormalizedReportType`]
//!   enumeration
//!
//! Logic that operates on these shapes (normalization, filtering,
//! persistence) lives in `voluum-util`; this crate stays data-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved machine-readable error codes used across the CLI.
///
/// `NETWORK_ERROR` is produced by the HTTP client for transport-level
/// failures. The remaining codes exist only at the CLI presentation
/// boundary and are never attached inside the client.
pub mod codes {
    /// Transport-level failure before an HTTP response was obtainable.
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    /// Locally thrown validation or precondition failure.
    pub const OPERATIONAL_ERROR: &str = "OPERATIONAL_ERROR";
    /// Malformed CLI invocation (unknown option, missing argument).
    pub const USAGE_ERROR: &str = "USAGE_ERROR";
    /// Anything that matches no other classification.
    pub const UNEXPECTED: &str = "UNEXPECTED";
}

/// Serializable error record carried by failure envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The single success/failure document every invocation prints.
///
/// Serializes to `{"ok":true,"data":...}` (plus `meta` when present) or
/// `{"ok":false,"error":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success {
        ok: bool,
        data: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Map<String, Value>>,
    },
    Failure {
        ok: bool,
        error: ErrorBody,
    },
}

impl Envelope {
    /// Build a success envelope. Empty `meta` maps are treated as absent.
    pub fn success(data: Value, meta: Option<Map<String, Value>>) -> Self {
        let meta = meta.filter(|map| !map.is_empty());
        Envelope::Success { ok: true, data, meta }
    }

    pub fn failure(error: ErrorBody) -> Self {
        Envelope::Failure { ok: false, error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

/// Persisted per-user session state (`~/.voluum-cli/config.json`).
///
/// Every field is optional; whitespace-only values are normalized away
/// before the file is written, and the file is rewritten wholesale on
/// save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_email: Option<String>,
}

impl SessionConfig {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.token.is_none()
            && self.token_created_at.is_none()
            && self.token_expires_at.is_none()
            && self.last_login_email.is_none()
    }
}

/// Abstraction over the raw column type strings the report API declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedReportType {
    Text,
    Integer,
    Money,
    Percentage,
    Boolean,
    DurationSeconds,
    Unknown,
}

impl NormalizedReportType {
    pub const ALL: [NormalizedReportType; 7] = [
        NormalizedReportType::Text,
        NormalizedReportType::Integer,
        NormalizedReportType::Money,
        NormalizedReportType::Percentage,
        NormalizedReportType::Boolean,
        NormalizedReportType::DurationSeconds,
        NormalizedReportType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedReportType::Text => "text",
            NormalizedReportType::Integer => "integer",
            NormalizedReportType::Money => "money",
            NormalizedReportType::Percentage => "percentage",
            NormalizedReportType::Boolean => "boolean",
            NormalizedReportType::DurationSeconds => "duration_seconds",
            NormalizedReportType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NormalizedReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized normalized type name.
#[derive(Debug, Error)]
#[error("unrecognized normalized report type: {0}")]
pub struct UnknownReportTypeError(pub String);

impl FromStr for NormalizedReportType {
    type Err = UnknownReportTypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        NormalizedReportType::ALL
            .iter()
            .find(|candidate| candidate.as_str() == input)
            .copied()
            .ok_or_else(|| UnknownReportTypeError(input.to_string()))
    }
}

/// One column of a report schema, derived per request from the API's
/// `columnMappings` metadata. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSchemaColumn {
    pub key: String,
    pub label: String,
    pub voluum_type: String,
    pub normalized_type: NormalizedReportType,
    pub can_group_by: bool,
    pub can_be_restricted: bool,
}

/// The extracted schema for one report response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSchema {
    pub columns: Vec<ReportSchemaColumn>,
}
