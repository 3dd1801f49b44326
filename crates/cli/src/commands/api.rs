//! Generic API passthrough: `api get` / `api post` against an
//! arbitrary path. No token requirement, so unauthenticated endpoints
//! stay reachable; absolute URLs pass straight through the client.

use serde_json::{Value, json};
use voluum_api::endpoints::ensure_leading_slash;
use voluum_util::reports::parse_query_pairs;

use crate::cli::{ApiCommand, GlobalArgs};
use crate::commands::helpers::{parse_json_arg, string_pairs_to_query};
use crate::context::CommandContext;
use crate::error::CommandError;

pub async fn run(command: &ApiCommand, global: &GlobalArgs) -> Result<Value, CommandError> {
    let context = CommandContext::resolve(global)?;
    run_with_context(command, &context).await
}

pub(crate) async fn run_with_context(
    command: &ApiCommand,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    match command {
        ApiCommand::Get { path, query } => {
            let request_path = ensure_leading_slash(path.trim());
            let query = parse_query_pairs(query.as_deref()).map(string_pairs_to_query)?;
            let query = (!query.is_empty()).then_some(query);

            let response = context.client.get(&request_path, query.as_ref()).await?;
            Ok(json!({ "method": "GET", "path": request_path, "response": response }))
        }
        ApiCommand::Post { path, body, query } => {
            let request_path = ensure_leading_slash(path.trim());
            let query = parse_query_pairs(query.as_deref()).map(string_pairs_to_query)?;
            let query = (!query.is_empty()).then_some(query);
            let body = parse_json_arg(body, "--body")?;

            let response = context.client.post(&request_path, Some(&body), query.as_ref()).await?;
            Ok(json!({ "method": "POST", "path": request_path, "response": response }))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::context::test_context;

    use super::*;

    #[tokio::test]
    async fn get_normalizes_the_path_and_forwards_query_pairs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/campaign"))
            .and(query_param("workspace", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "c-1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let context = test_context(&server.uri(), None);
        let command = ApiCommand::Get {
            path: "campaign".to_string(),
            query: Some("workspace=main".to_string()),
        };

        let data = run_with_context(&command, &context).await.unwrap();
        assert_eq!(
            data,
            json!({"method": "GET", "path": "/campaign", "response": [{"id": "c-1"}]})
        );
    }

    #[tokio::test]
    async fn post_requires_a_valid_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/report"))
            .and(body_json(json!({"groupBy": "campaign"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
            .expect(1)
            .mount(&server)
            .await;

        let context = test_context(&server.uri(), None);
        let command = ApiCommand::Post {
            path: "/report".to_string(),
            body: r#"{"groupBy":"campaign"}"#.to_string(),
            query: None,
        };
        let data = run_with_context(&command, &context).await.unwrap();
        assert_eq!(data["response"], json!({"rows": []}));

        let invalid = ApiCommand::Post {
            path: "/report".to_string(),
            body: "{broken".to_string(),
            query: None,
        };
        let error = run_with_context(&invalid, &context).await.unwrap_err();
        assert_eq!(error.to_string(), "Invalid JSON for --body.");
    }

    #[tokio::test]
    async fn malformed_query_pairs_are_rejected() {
        let context = test_context("https://api.voluum.com", None);
        let command = ApiCommand::Get {
            path: "/campaign".to_string(),
            query: Some("workspace".to_string()),
        };

        let error = run_with_context(&command, &context).await.unwrap_err();
        assert!(error.to_string().contains("Invalid key=value pair"));
    }
}
