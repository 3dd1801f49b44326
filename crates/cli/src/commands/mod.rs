//! Command handlers, one module per subcommand group.

pub mod api;
pub mod auth;
pub mod helpers;
pub mod reports;
pub mod resources;

use serde_json::Value;
use voluum_api::Resource;

use crate::cli::{Cli, Commands};
use crate::error::CommandError;

/// Dispatch the parsed invocation to its handler. Every handler
/// returns the envelope's `data` payload; error classification and
/// printing happen in `main`.
pub async fn run(cli: &Cli) -> Result<Value, CommandError> {
    let global = &cli.global;

    match &cli.command {
        Commands::Auth { command } => auth::run(command, global).await,
        Commands::Campaigns { command } => resources::run(Resource::Campaigns, command, global).await,
        Commands::Offers { command } => resources::run(Resource::Offers, command, global).await,
        Commands::Landers { command } => resources::run(Resource::Landers, command, global).await,
        Commands::Flows { command } => resources::run(Resource::Flows, command, global).await,
        Commands::TrafficSources { command } => {
            resources::run(Resource::TrafficSources, command, global).await
        }
        Commands::AffiliateNetworks { command } => {
            resources::run(Resource::AffiliateNetworks, command, global).await
        }
        Commands::TrackerDomains { command } => {
            resources::run(Resource::TrackerDomains, command, global).await
        }
        Commands::Reports { command } => reports::run(command, global).await,
        Commands::Api { command } => api::run(command, global).await,
    }
}
