//! `auth login` / `auth whoami` / `auth logout`.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use voluum_api::VoluumClient;
use voluum_api::endpoints::{
    ACCESS_LOGIN_PATH, LOGIN_PATH, WHOAMI_PATH, extract_auth_token, extract_token_expiry,
};
use voluum_util::mask_token;
use voluum_util::session::{clear_stored_token, save_config};

use crate::cli::{AuthCommand, GlobalArgs, LoginArgs};
use crate::context::CommandContext;
use crate::error::CommandError;

pub async fn run(command: &AuthCommand, global: &GlobalArgs) -> Result<Value, CommandError> {
    match command {
        AuthCommand::Login(args) => {
            // Flag validation happens before any config or network work.
            let login_method = validate_login_options(args)?;
            let context = CommandContext::resolve(global)?;
            login_with_context(args, login_method, &context).await
        }
        AuthCommand::Whoami => {
            let context = CommandContext::resolve(global)?;
            whoami(&context).await
        }
        AuthCommand::Logout => logout(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginMethod {
    EmailPassword,
    AccessKeys,
}

/// The two auth methods are mutually exclusive and each requires both
/// of its flags.
pub(crate) fn validate_login_options(args: &LoginArgs) -> Result<LoginMethod, CommandError> {
    let access_id = args.access_id.as_deref().or(args.access_key_id.as_deref());
    let has_email_password = args.email.is_some() || args.password.is_some();
    let has_access_keys = access_id.is_some() || args.access_key.is_some();

    if !has_email_password && !has_access_keys {
        return Err(CommandError::operational(
            "Provide either --email with --password, or --accessKeyId with --accessKey.",
        ));
    }

    if has_email_password && has_access_keys {
        return Err(CommandError::operational(
            "Use one auth method only: either --email/--password OR --accessKeyId/--accessKey.",
        ));
    }

    if has_email_password {
        if args.email.is_none() || args.password.is_none() {
            return Err(CommandError::operational(
                "Both --email and --password are required together.",
            ));
        }
        return Ok(LoginMethod::EmailPassword);
    }

    if access_id.is_none() || args.access_key.is_none() {
        return Err(CommandError::operational(
            "Both --accessId (or --accessKeyId) and --accessKey are required together.",
        ));
    }
    Ok(LoginMethod::AccessKeys)
}

pub(crate) async fn login_with_context(
    args: &LoginArgs,
    login_method: LoginMethod,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    // Login runs unauthenticated regardless of any resolved token.
    let login_client = VoluumClient::builder(context.base_url.clone(), || None).build()?;

    let access_id = args.access_id.as_deref().or(args.access_key_id.as_deref());
    let (login_path, payload) = match login_method {
        LoginMethod::AccessKeys => (
            ACCESS_LOGIN_PATH,
            json!({ "accessId": access_id, "accessKey": args.access_key }),
        ),
        LoginMethod::EmailPassword => (
            LOGIN_PATH,
            json!({ "email": args.email, "password": args.password }),
        ),
    };

    let response = login_client.post(login_path, Some(&payload), None).await?;
    let token = extract_auth_token(&response).ok_or_else(|| {
        CommandError::operational("Login succeeded but no token was found in the response.")
    })?;

    let token_created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let token_expires_at = extract_token_expiry(&response);

    let mut config = context.file_config.clone();
    config.base_url = Some(context.base_url.clone());
    config.token = Some(token.clone());
    config.token_created_at = Some(token_created_at.clone());
    config.token_expires_at = token_expires_at.clone();
    config.last_login_email = args.email.clone().or(config.last_login_email);
    save_config(&config)?;

    Ok(json!({
        "tokenSaved": true,
        "tokenMasked": mask_token(&token),
        "baseUrl": context.base_url,
        "tokenCreatedAt": token_created_at,
        "tokenExpiresAt": token_expires_at,
    }))
}

pub(crate) async fn whoami(context: &CommandContext) -> Result<Value, CommandError> {
    let token = context.require_token()?.to_string();
    let metadata = local_metadata(context, &token);

    let Some(whoami_path) = WHOAMI_PATH else {
        return Ok(tagged("local", None, metadata));
    };

    match context.client.get(whoami_path, None).await {
        Ok(identity) => {
            let mut data = Map::new();
            data.insert("source".to_string(), json!("remote"));
            data.insert("identity".to_string(), identity);
            data.extend(metadata);
            Ok(Value::Object(data))
        }
        Err(error) if error.status == Some(404) => Ok(tagged(
            "local",
            Some("whoami endpoint not found; returning local token metadata."),
            metadata,
        )),
        Err(error) => Err(error.into()),
    }
}

fn logout() -> Result<Value, CommandError> {
    clear_stored_token()?;
    Ok(json!({
        "tokenRemoved": true,
        "note": "Environment token VOLUUM_TOKEN (if set) still takes precedence for runtime auth.",
    }))
}

fn local_metadata(context: &CommandContext, token: &str) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("tokenMasked".to_string(), json!(mask_token(token)));
    metadata.insert("tokenCreatedAt".to_string(), json!(context.file_config.token_created_at));
    metadata.insert("tokenExpiresAt".to_string(), json!(context.file_config.token_expires_at));
    metadata.insert("baseUrl".to_string(), json!(context.base_url));
    metadata
}

fn tagged(source: &str, note: Option<&str>, metadata: Map<String, Value>) -> Value {
    let mut data = Map::new();
    data.insert("source".to_string(), json!(source));
    if let Some(note) = note {
        data.insert("note".to_string(), json!(note));
    }
    data.extend(metadata);
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;
    use voluum_util::session::{CONFIG_PATH_ENV, load_config, save_config};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::context::test_context;

    use super::*;

    fn with_temp_config<R>(run: impl FnOnce() -> R) -> R {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        temp_env::with_var(CONFIG_PATH_ENV, Some(config_path.to_str().unwrap()), run)
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(future)
    }

    #[test]
    fn login_requires_some_auth_method() {
        let error = validate_login_options(&LoginArgs::default()).unwrap_err();
        assert!(error.to_string().starts_with("Provide either --email"));
    }

    #[test]
    fn login_rejects_mixed_auth_methods_before_any_network_call() {
        let args = LoginArgs {
            email: Some("user@example.com".to_string()),
            password: Some("pw".to_string()),
            access_key: Some("key".to_string()),
            ..Default::default()
        };
        let error = validate_login_options(&args).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Use one auth method only: either --email/--password OR --accessKeyId/--accessKey."
        );
    }

    #[test]
    fn login_requires_complete_flag_pairs() {
        let email_only = LoginArgs { email: Some("user@example.com".to_string()), ..Default::default() };
        assert_eq!(
            validate_login_options(&email_only).unwrap_err().to_string(),
            "Both --email and --password are required together."
        );

        let key_only = LoginArgs { access_key: Some("key".to_string()), ..Default::default() };
        assert_eq!(
            validate_login_options(&key_only).unwrap_err().to_string(),
            "Both --accessId (or --accessKeyId) and --accessKey are required together."
        );
    }

    #[test]
    fn login_accepts_either_access_id_spelling() {
        let args = LoginArgs {
            access_key_id: Some("key-id".to_string()),
            access_key: Some("key".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_login_options(&args).unwrap(), LoginMethod::AccessKeys);

        let args = LoginArgs {
            access_id: Some("key-id".to_string()),
            access_key: Some("key".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_login_options(&args).unwrap(), LoginMethod::AccessKeys);
    }

    #[test]
    fn login_persists_token_metadata_and_masks_output() {
        with_temp_config(|| {
            block_on(async {
                let server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/auth/session"))
                    .and(body_json(json!({"email": "user@example.com", "password": "pw"})))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                        "token": "secret-token-123456",
                        "tokenExpiresAt": "2026-03-01T00:00:00Z"
                    })))
                    .expect(1)
                    .mount(&server)
                    .await;

                let context = test_context(&server.uri(), None);
                let args = LoginArgs {
                    email: Some("user@example.com".to_string()),
                    password: Some("pw".to_string()),
                    ..Default::default()
                };

                let data = login_with_context(&args, LoginMethod::EmailPassword, &context)
                    .await
                    .unwrap();

                assert_eq!(data["tokenSaved"], json!(true));
                assert_eq!(data["tokenMasked"], json!("secr…3456"));
                assert_eq!(data["tokenExpiresAt"], json!("2026-03-01T00:00:00Z"));
                assert_eq!(data["baseUrl"], json!(server.uri()));
            });

            let saved = load_config().unwrap();
            assert_eq!(saved.token.as_deref(), Some("secret-token-123456"));
            assert_eq!(saved.token_expires_at.as_deref(), Some("2026-03-01T00:00:00Z"));
            assert_eq!(saved.last_login_email.as_deref(), Some("user@example.com"));
            assert!(saved.token_created_at.is_some());
        });
    }

    #[test]
    fn access_key_login_posts_to_the_access_session_path() {
        with_temp_config(|| {
            block_on(async {
                let server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/auth/access/session"))
                    .and(body_json(json!({"accessId": "key-id", "accessKey": "key-secret"})))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                        "data": {"sessionToken": "nested-session-token"}
                    })))
                    .expect(1)
                    .mount(&server)
                    .await;

                let context = test_context(&server.uri(), None);
                let args = LoginArgs {
                    access_key_id: Some("key-id".to_string()),
                    access_key: Some("key-secret".to_string()),
                    ..Default::default()
                };

                let data = login_with_context(&args, LoginMethod::AccessKeys, &context)
                    .await
                    .unwrap();
                assert_eq!(data["tokenSaved"], json!(true));
            });

            let saved = load_config().unwrap();
            assert_eq!(saved.token.as_deref(), Some("nested-session-token"));
            assert!(saved.last_login_email.is_none());
        });
    }

    #[test]
    fn login_without_a_recognizable_token_is_an_error() {
        with_temp_config(|| {
            block_on(async {
                let server = MockServer::start().await;
                Mock::given(method("POST"))
                    .and(path("/auth/session"))
                    .respond_with(
                        ResponseTemplate::new(200).set_body_json(json!({"greeting": "hi"})),
                    )
                    .mount(&server)
                    .await;

                let context = test_context(&server.uri(), None);
                let args = LoginArgs {
                    email: Some("user@example.com".to_string()),
                    password: Some("pw".to_string()),
                    ..Default::default()
                };

                let error = login_with_context(&args, LoginMethod::EmailPassword, &context)
                    .await
                    .unwrap_err();
                assert!(error.to_string().contains("no token was found"));
            });

            assert!(load_config().unwrap().token.is_none());
        });
    }

    #[tokio::test]
    async fn whoami_reports_remote_identity_with_local_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/current"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"email": "user@example.com"})),
            )
            .mount(&server)
            .await;

        let context = test_context(&server.uri(), Some("secret-token-123456"));
        let data = whoami(&context).await.unwrap();

        assert_eq!(data["source"], json!("remote"));
        assert_eq!(data["identity"], json!({"email": "user@example.com"}));
        assert_eq!(data["tokenMasked"], json!("secr…3456"));
        assert_eq!(data["tokenCreatedAt"], json!(null));
    }

    #[tokio::test]
    async fn whoami_falls_back_to_local_metadata_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/current"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let context = test_context(&server.uri(), Some("secret-token-123456"));
        let data = whoami(&context).await.unwrap();

        assert_eq!(data["source"], json!("local"));
        assert!(data["note"].as_str().unwrap().contains("whoami endpoint not found"));
    }

    #[tokio::test]
    async fn whoami_propagates_other_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/current"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let context = test_context(&server.uri(), Some("tok"));
        let error = whoami(&context).await.unwrap_err();
        assert!(matches!(error, CommandError::Api(ref api) if api.status == Some(403)));
    }

    #[test]
    fn logout_clears_only_token_fields() {
        with_temp_config(|| {
            save_config(&voluum_types::SessionConfig {
                base_url: Some("https://api.voluum.com".to_string()),
                token: Some("tok".to_string()),
                token_created_at: Some("2026-02-01T00:00:00.000Z".to_string()),
                ..Default::default()
            })
            .unwrap();

            let data = logout().unwrap();
            assert_eq!(data["tokenRemoved"], json!(true));

            let config = load_config().unwrap();
            assert!(config.token.is_none());
            assert_eq!(config.base_url.as_deref(), Some("https://api.voluum.com"));
        });
    }
}
