//! Per-invocation command context.
//!
//! Resolves the effective base URL and token (flag > environment >
//! session file) and constructs the API client once. The token is
//! handed to the client as a capability closure, so the same client
//! would observe a credential refreshed mid-invocation.

use tracing::debug;
use voluum_api::VoluumClient;
use voluum_api::endpoints::DEFAULT_BASE_URL;
use voluum_types::SessionConfig;
use voluum_util::session::{RuntimeOverrides, resolve_runtime_config};

use crate::cli::GlobalArgs;
use crate::error::CommandError;

pub struct CommandContext {
    pub base_url: String,
    pub token: Option<String>,
    pub client: VoluumClient,
    pub file_config: SessionConfig,
}

impl CommandContext {
    pub fn resolve(global: &GlobalArgs) -> Result<Self, CommandError> {
        let runtime = resolve_runtime_config(RuntimeOverrides {
            base_url: global.base_url.clone(),
            token: global.token.clone(),
        })?;

        let base_url = runtime.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = runtime.token;
        debug!(%base_url, has_token = token.is_some(), "resolved command context");
        let provider_token = token.clone();
        let client = VoluumClient::builder(base_url.clone(), move || provider_token.clone())
            .build()?;

        Ok(Self { base_url, token, client, file_config: runtime.file_config })
    }

    pub fn require_token(&self) -> Result<&str, CommandError> {
        self.token.as_deref().ok_or_else(|| {
            CommandError::operational(
                "No auth token found. Run `voluum auth login` or set VOLUUM_TOKEN.",
            )
        })
    }
}

#[cfg(test)]
pub(crate) fn test_context(base_url: &str, token: Option<&str>) -> CommandContext {
    use std::time::Duration;

    let token = token.map(str::to_string);
    let provider_token = token.clone();
    let client = VoluumClient::builder(base_url, move || provider_token.clone())
        .initial_retry_delay(Duration::from_millis(5))
        .build()
        .expect("test client");

    CommandContext {
        base_url: base_url.to_string(),
        token,
        client,
        file_config: SessionConfig::default(),
    }
}
