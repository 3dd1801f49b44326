//! Reporting commands: summary, raw, query, schema, and breakdown.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use voluum_api::QueryParams;
use voluum_api::endpoints::{REPORT_RAW_PATH, REPORT_SUMMARY_PATH, ensure_leading_slash};
use voluum_types::NormalizedReportType;
use voluum_util::normalize::strip_report_noise;
use voluum_util::reports::{
    SchemaFilter, extract_report_schema, filter_schema_columns, merge_report_query_inputs,
    parse_query_pairs,
};

use crate::cli::{
    BreakdownArgs, GlobalArgs, QueryArgs, RawArgs, ReportsCommand, SchemaArgs, SummaryArgs,
};
use crate::commands::helpers::{assert_iso_date, validate_non_negative, validate_positive};
use crate::context::CommandContext;
use crate::error::CommandError;

pub async fn run(command: &ReportsCommand, global: &GlobalArgs) -> Result<Value, CommandError> {
    match command {
        ReportsCommand::Summary(args) => {
            assert_iso_date(&args.from, "--from")?;
            assert_iso_date(&args.to, "--to")?;
            let context = resolve_with_token(global)?;
            summary(args, &context).await
        }
        ReportsCommand::Raw(args) => {
            assert_iso_date(&args.from, "--from")?;
            assert_iso_date(&args.to, "--to")?;
            validate_positive(args.limit, "--limit")?;
            let context = resolve_with_token(global)?;
            raw(args, &context).await
        }
        ReportsCommand::Query(args) => {
            let context = resolve_with_token(global)?;
            query(args, &context).await
        }
        ReportsCommand::Schema(args) => {
            let context = resolve_with_token(global)?;
            schema(args, &context).await
        }
        ReportsCommand::Breakdown(args) => {
            assert_iso_date(&args.from, "--from")?;
            assert_iso_date(&args.to, "--to")?;
            validate_positive(args.limit, "--limit")?;
            validate_non_negative(args.offset, "--offset")?;
            let context = resolve_with_token(global)?;
            breakdown(args, &context).await
        }
    }
}

fn resolve_with_token(global: &GlobalArgs) -> Result<CommandContext, CommandError> {
    let context = CommandContext::resolve(global)?;
    context.require_token()?;
    Ok(context)
}

pub(crate) async fn summary(
    args: &SummaryArgs,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    let filters = parse_query_pairs(args.filters.as_deref())?;
    let group_by = args.group_by.clone().unwrap_or_else(|| "campaign".to_string());

    let mut report_query: QueryParams = IndexMap::new();
    report_query.insert("from".to_string(), json!(args.from));
    report_query.insert("to".to_string(), json!(args.to));
    report_query.insert("groupBy".to_string(), json!(group_by));
    for (key, value) in filters {
        report_query.insert(key, Value::String(value));
    }

    let response = context.client.get(REPORT_SUMMARY_PATH, Some(&report_query)).await?;
    let clean = strip_report_noise(response);
    Ok(echo_window(&args.from, &args.to, Some(&group_by), clean))
}

pub(crate) async fn raw(args: &RawArgs, context: &CommandContext) -> Result<Value, CommandError> {
    let mut report_query: QueryParams = IndexMap::new();
    report_query.insert("from".to_string(), json!(args.from));
    report_query.insert("to".to_string(), json!(args.to));
    if let Some(limit) = args.limit {
        report_query.insert("limit".to_string(), json!(limit));
    }

    let response = context.client.get(REPORT_RAW_PATH, Some(&report_query)).await?;
    let clean = strip_report_noise(response);
    Ok(echo_window(&args.from, &args.to, None, clean))
}

pub(crate) async fn query(
    args: &QueryArgs,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    let report_path = ensure_leading_slash(args.path.trim());
    let report_query = merge_report_query_inputs(args.query.as_deref(), args.query_json.as_deref())?;

    let response = context.client.get(&report_path, Some(&report_query)).await?;
    let clean = strip_report_noise(response);
    Ok(json!({ "path": report_path, "query": report_query, "response": clean }))
}

pub(crate) async fn schema(
    args: &SchemaArgs,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    let filter = SchemaFilter {
        groupable: args.groupable,
        restrictable: args.restrictable,
        normalized_type: parse_schema_type(args.column_type.as_deref())?,
        search: args.search.clone(),
    };

    let report_path = ensure_leading_slash(args.path.trim());
    let report_query = merge_report_query_inputs(args.query.as_deref(), args.query_json.as_deref())?;

    let response = context.client.get(&report_path, Some(&report_query)).await?;
    let columns = filter_schema_columns(&extract_report_schema(&response).columns, &filter);

    let mut data = Map::new();
    data.insert("path".to_string(), json!(report_path));
    data.insert("query".to_string(), json!(report_query));
    data.insert("columns".to_string(), json!(columns));
    if args.with_query_params {
        data.insert("queryParameters".to_string(), query_parameter_catalog());
    }
    Ok(Value::Object(data))
}

pub(crate) async fn breakdown(
    args: &BreakdownArgs,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    let preset = BreakdownPreset::parse(&args.by)?;
    let report_path = ensure_leading_slash(args.path.trim());
    let filters = parse_query_pairs(args.filters.as_deref())?;

    let columns = args
        .columns
        .as_deref()
        .map(str::trim)
        .filter(|columns| !columns.is_empty())
        .unwrap_or_else(|| preset.columns());

    let mut report_query: QueryParams = IndexMap::new();
    report_query.insert("from".to_string(), json!(args.from));
    report_query.insert("to".to_string(), json!(args.to));
    report_query.insert("groupBy".to_string(), json!(preset.group_by()));
    report_query.insert("columns".to_string(), json!(columns));
    if let Some(limit) = args.limit {
        report_query.insert("limit".to_string(), json!(limit));
    }
    if let Some(offset) = args.offset {
        report_query.insert("offset".to_string(), json!(offset));
    }
    if let Some(campaign_id) =
        args.campaign_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    {
        report_query.insert("campaignId".to_string(), json!(campaign_id));
    }
    for (key, value) in filters {
        report_query.insert(key, Value::String(value));
    }

    let response = context.client.get(&report_path, Some(&report_query)).await?;
    let clean = strip_report_noise(response);
    Ok(json!({
        "preset": preset.name(),
        "path": report_path,
        "query": report_query,
        "response": clean,
    }))
}

/// Named default `(groupBy, columns)` pairs for the common breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BreakdownPreset {
    Offer,
    OfferByCampaign,
    Flow,
    TrafficSource,
    Lander,
}

impl BreakdownPreset {
    const ALL: [BreakdownPreset; 5] = [
        BreakdownPreset::Offer,
        BreakdownPreset::OfferByCampaign,
        BreakdownPreset::Flow,
        BreakdownPreset::TrafficSource,
        BreakdownPreset::Lander,
    ];

    pub(crate) fn name(&self) -> &'static str {
        match self {
            BreakdownPreset::Offer => "offer",
            BreakdownPreset::OfferByCampaign => "offer-by-campaign",
            BreakdownPreset::Flow => "flow",
            BreakdownPreset::TrafficSource => "traffic-source",
            BreakdownPreset::Lander => "lander",
        }
    }

    pub(crate) fn group_by(&self) -> &'static str {
        match self {
            BreakdownPreset::Offer => "offerId",
            BreakdownPreset::OfferByCampaign => "campaignId,offerId",
            BreakdownPreset::Flow => "flowId",
            BreakdownPreset::TrafficSource => "trafficSourceId",
            BreakdownPreset::Lander => "landerId",
        }
    }

    pub(crate) fn columns(&self) -> &'static str {
        match self {
            BreakdownPreset::Offer => {
                "offerId,offerName,conversions,revenue,profit,roi,visits,cv,epc"
            }
            BreakdownPreset::OfferByCampaign => {
                "campaignId,campaignName,offerId,offerName,conversions,revenue,profit,roi,visits,cv,epc"
            }
            BreakdownPreset::Flow => {
                "flowId,flowName,conversions,revenue,profit,roi,visits,cv,epc"
            }
            BreakdownPreset::TrafficSource => {
                "trafficSourceId,trafficSourceName,conversions,revenue,profit,roi,visits,cv,epc"
            }
            BreakdownPreset::Lander => {
                "landerId,landerName,conversions,revenue,profit,roi,visits,cv,epc"
            }
        }
    }

    pub(crate) fn parse(input: &str) -> Result<Self, CommandError> {
        let normalized = input.trim().to_lowercase();
        BreakdownPreset::ALL
            .iter()
            .find(|preset| preset.name() == normalized)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> =
                    BreakdownPreset::ALL.iter().map(BreakdownPreset::name).collect();
                CommandError::operational(format!(
                    "Invalid --by value. Expected one of: {}.",
                    names.join(", ")
                ))
            })
    }
}

fn parse_schema_type(
    input: Option<&str>,
) -> Result<Option<NormalizedReportType>, CommandError> {
    let Some(input) = input.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    input.to_lowercase().parse::<NormalizedReportType>().map(Some).map_err(|_| {
        let supported: Vec<&str> =
            NormalizedReportType::ALL.iter().map(NormalizedReportType::as_str).collect();
        CommandError::operational(format!(
            "Invalid --type value. Expected one of: {}.",
            supported.join(", ")
        ))
    })
}

fn query_parameter_catalog() -> Value {
    json!({
        "required": ["from", "to"],
        "common": ["groupBy", "limit", "offset", "sort", "columns"],
        "passthrough": "Additional Voluum query parameters are forwarded as-is.",
    })
}

/// Echo the report window ahead of the (object) response fields; a
/// non-object response lands under `result` instead.
fn echo_window(from: &str, to: &str, group_by: Option<&str>, response: Value) -> Value {
    let mut data = Map::new();
    data.insert("from".to_string(), json!(from));
    data.insert("to".to_string(), json!(to));
    if let Some(group_by) = group_by {
        data.insert("groupBy".to_string(), json!(group_by));
    }

    match response {
        Value::Object(fields) => data.extend(fields),
        other => {
            data.insert("result".to_string(), other);
        }
    }
    Value::Object(data)
}
