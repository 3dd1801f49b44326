//! Voluum API client library.
//!
//! This crate centers on [`VoluumClient`], a thin wrapper over
//! `reqwest` that handles the parts of talking to the Voluum REST API
//! that every command needs:
//!
//! - URL construction against a single configured base URL (absolute
//!   URLs pass through for the generic `api` commands)
//! - The bespoke `cwauth-token` auth header, sourced from an injected
//!   [`TokenProvider`] at request time
//! - Tolerant response parsing (empty bodies, non-JSON payloads)
//! - Classification of every failure into [`ApiError`]
//! - Bounded retry with exponential backoff for transient failures
//!
//! The [`endpoints`] module is the static catalog of routes and the
//! best-effort token extraction probes used by `auth login`.

pub mod client;
pub mod endpoints;
mod error;

pub use client::{ClientBuildError, QueryParams, TokenProvider, VoluumClient};
pub use endpoints::Resource;
pub use error::ApiError;
