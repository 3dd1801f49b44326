//! Command-line interface definition.
//!
//! Flag spellings intentionally mirror the upstream web API's casing
//! (`--baseUrl`, `--groupBy`, `--accessKeyId`) rather than the usual
//! kebab-case, so values can be copied between the CLI and API docs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use voluum_api::endpoints::REPORT_SUMMARY_PATH;

const REPORT_QUERY_HELP_TEXT: &str = "
Examples:
  # Summary by group
  voluum reports query --query from=2026-02-01,to=2026-02-18,groupBy=country,columns=visits,conversions

  # Conversions query with paging + sort
  voluum reports query --path /report/conversions --query from=2026-02-01,to=2026-02-18,limit=100,offset=100,sort=visits,direction=desc

  # Merge --query with --query-json
  voluum reports query --path /report/conversions --query from=2026-02-01,to=2026-02-18,limit=100 --query-json '{\"limit\":25,\"offset\":50,\"sort\":\"visits\",\"direction\":\"asc\"}'
  --query-json overrides duplicate keys from --query.
";

const REPORT_SCHEMA_HELP_TEXT: &str = "
Examples:
  # Inspect schema columns for conversions
  voluum reports schema --path /report/conversions --query from=2026-02-01,to=2026-02-18 --groupable --type money --search revenue

  # Include query parameter catalog while filtering
  voluum reports schema --path /report/conversions --query from=2026-02-01,to=2026-02-18 --restrictable --with-query-params
";

const REPORT_BREAKDOWN_HELP_TEXT: &str = "
Presets:
  offer | offer-by-campaign | flow | traffic-source | lander

Examples:
  # Conversions and revenue by offer
  voluum reports breakdown --by offer --from 2026-02-01T00:00:00.000Z --to 2026-02-08T00:00:00.000Z

  # Offer breakdown within campaign context
  voluum reports breakdown --by offer-by-campaign --campaignId <id> --from 2026-02-01T00:00:00.000Z --to 2026-02-08T00:00:00.000Z

  # Flow and traffic-source views
  voluum reports breakdown --by flow --from 2026-02-01T00:00:00.000Z --to 2026-02-08T00:00:00.000Z
  voluum reports breakdown --by traffic-source --from 2026-02-01T00:00:00.000Z --to 2026-02-08T00:00:00.000Z --limit 200
";

#[derive(Parser, Debug)]
#[command(
    name = "voluum",
    version,
    about = "Community CLI wrapper for public Voluum REST APIs (unofficial)"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted on every invocation.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Override the Voluum API base URL
    #[arg(long = "baseUrl", global = true, value_name = "url")]
    pub base_url: Option<String>,

    /// Override the auth token for this command
    #[arg(long, global = true, value_name = "token")]
    pub token: Option<String>,

    /// Output as JSON (the default output format)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as pretty-printed JSON (implies --json)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Suppress stdout output
    #[arg(long, global = true)]
    pub silent: bool,

    /// Write the output document to a file
    #[arg(long, global = true, value_name = "file")]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Campaign operations
    Campaigns {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Offer operations
    Offers {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Lander operations
    Landers {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Flow operations
    Flows {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Traffic source operations
    TrafficSources {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Affiliate network operations
    AffiliateNetworks {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Tracker domain operations
    TrackerDomains {
        #[command(subcommand)]
        command: CrudCommand,
    },
    /// Reporting operations
    Reports {
        #[command(subcommand)]
        command: ReportsCommand,
    },
    /// Generic API passthrough
    Api {
        #[command(subcommand)]
        command: ApiCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Login and store the session token locally
    Login(LoginArgs),
    /// Show current auth identity or local token metadata
    Whoami,
    /// Remove the locally stored token
    Logout,
}

#[derive(Args, Debug, Default)]
pub struct LoginArgs {
    /// Voluum account email
    #[arg(long)]
    pub email: Option<String>,

    /// Voluum account password
    #[arg(long)]
    pub password: Option<String>,

    /// Voluum access ID
    #[arg(long = "accessId", value_name = "id")]
    pub access_id: Option<String>,

    /// Voluum access key ID
    #[arg(long = "accessKeyId", value_name = "id")]
    pub access_key_id: Option<String>,

    /// Voluum access key
    #[arg(long = "accessKey", value_name = "key")]
    pub access_key: Option<String>,
}

/// The shared list/get/create/update/delete surface every resource
/// group exposes.
#[derive(Subcommand, Debug)]
pub enum CrudCommand {
    /// List all entries
    List,
    /// Get a single entry by ID
    Get {
        #[arg(long, value_name = "id")]
        id: String,
    },
    /// Create a new entry
    Create {
        #[command(flatten)]
        input: DataArgs,
    },
    /// Update an existing entry
    Update {
        #[arg(long, value_name = "id")]
        id: String,
        #[command(flatten)]
        input: DataArgs,
    },
    /// Delete an entry
    Delete {
        #[arg(long, value_name = "id")]
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct DataArgs {
    /// JSON body string
    #[arg(long, value_name = "json")]
    pub data: Option<String>,

    /// Path to a JSON file
    #[arg(long, value_name = "path")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// Run summary report
    Summary(SummaryArgs),
    /// Run raw report
    Raw(RawArgs),
    /// Run report query against a selected report path
    Query(QueryArgs),
    /// Inspect and filter report schema metadata
    Schema(SchemaArgs),
    /// Run predefined report breakdowns by common entities
    Breakdown(BreakdownArgs),
}

#[derive(Args, Debug, Default)]
pub struct SummaryArgs {
    /// Start datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub from: String,

    /// End datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub to: String,

    /// Grouping field
    #[arg(long = "groupBy", value_name = "field")]
    pub group_by: Option<String>,

    /// Comma-separated key=value pairs
    #[arg(long, value_name = "pairs")]
    pub filters: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RawArgs {
    /// Start datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub from: String,

    /// End datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub to: String,

    /// Maximum rows
    #[arg(long, value_name = "n")]
    pub limit: Option<i64>,
}

#[derive(Args, Debug, Default)]
#[command(after_help = REPORT_QUERY_HELP_TEXT)]
pub struct QueryArgs {
    /// Report endpoint path
    #[arg(long, value_name = "path", default_value = REPORT_SUMMARY_PATH)]
    pub path: String,

    /// Comma-separated key=value query params
    #[arg(long, value_name = "pairs")]
    pub query: Option<String>,

    /// JSON object for report query params
    #[arg(long, value_name = "json")]
    pub query_json: Option<String>,
}

#[derive(Args, Debug, Default)]
#[command(after_help = REPORT_SCHEMA_HELP_TEXT)]
pub struct SchemaArgs {
    /// Report endpoint path
    #[arg(long, value_name = "path", default_value = REPORT_SUMMARY_PATH)]
    pub path: String,

    /// Comma-separated key=value query params
    #[arg(long, value_name = "pairs")]
    pub query: Option<String>,

    /// JSON object for report query params
    #[arg(long, value_name = "json")]
    pub query_json: Option<String>,

    /// Only include groupable columns
    #[arg(long)]
    pub groupable: bool,

    /// Only include restrictable columns
    #[arg(long)]
    pub restrictable: bool,

    /// Filter by normalized type
    #[arg(long = "type", value_name = "normalizedType")]
    pub column_type: Option<String>,

    /// Search schema columns by text
    #[arg(long, value_name = "text")]
    pub search: Option<String>,

    /// Include report query parameter catalog
    #[arg(long)]
    pub with_query_params: bool,
}

#[derive(Args, Debug, Default)]
#[command(after_help = REPORT_BREAKDOWN_HELP_TEXT)]
pub struct BreakdownArgs {
    /// Breakdown preset: offer | offer-by-campaign | flow | traffic-source | lander
    #[arg(long, value_name = "entity")]
    pub by: String,

    /// Start datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub from: String,

    /// End datetime (ISO string)
    #[arg(long, value_name = "iso")]
    pub to: String,

    /// Report endpoint path
    #[arg(long, value_name = "path", default_value = REPORT_SUMMARY_PATH)]
    pub path: String,

    /// Optional campaign filter
    #[arg(long = "campaignId", value_name = "id")]
    pub campaign_id: Option<String>,

    /// Comma-separated key=value filters
    #[arg(long, value_name = "pairs")]
    pub filters: Option<String>,

    /// Override default columns list
    #[arg(long, value_name = "list")]
    pub columns: Option<String>,

    /// Maximum rows
    #[arg(long, value_name = "n")]
    pub limit: Option<i64>,

    /// Pagination offset
    #[arg(long, value_name = "n")]
    pub offset: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// Send GET request to Voluum path
    Get {
        /// API path (e.g. /campaign)
        path: String,

        /// Comma-separated key=value query params
        #[arg(long, value_name = "pairs")]
        query: Option<String>,
    },
    /// Send POST request to Voluum path
    Post {
        /// API path (e.g. /report)
        path: String,

        /// JSON body string
        #[arg(long, value_name = "json")]
        body: String,

        /// Comma-separated key=value query params
        #[arg(long, value_name = "pairs")]
        query: Option<String>,
    },
}
