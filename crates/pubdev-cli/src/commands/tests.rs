//! Unit tests for CLI commands.

use super::*;
use clap::Parser;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::Cli;

fn context_for(server: &MockServer) -> CommandContext {
    let settings = Settings {
        api_base_url: format!("{}/api", server.uri()),
        site_base_url: server.uri(),
        ..Settings::default()
    };
    CommandContext::from_settings(settings).unwrap()
}

#[test]
fn test_cli_defaults_to_no_command() {
    let cli = Cli::try_parse_from(["pubdev-mcp"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.config_overrides().is_empty());
}

#[test]
fn test_cli_call_with_overrides() {
    let cli = Cli::try_parse_from([
        "pubdev-mcp",
        "call",
        "get_package_info",
        "--args",
        r#"{"package_name":"http"}"#,
        "--api-url",
        "http://127.0.0.1:8080/api",
        "--timeout",
        "5",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Some(Commands::Call {
            tool: "get_package_info".to_string(),
            args: r#"{"package_name":"http"}"#.to_string(),
        })
    );

    let overrides = cli.config_overrides();
    assert_eq!(
        overrides.get(pubdev_config::merge::CLI_API_URL).map(String::as_str),
        Some("http://127.0.0.1:8080/api")
    );
    assert_eq!(
        overrides.get(pubdev_config::merge::CLI_TIMEOUT).map(String::as_str),
        Some("5")
    );
}

#[test]
fn test_parse_call_args() {
    assert_eq!(parse_call_args("").unwrap(), json!({}));
    assert_eq!(
        parse_call_args(r#"{"page": 2}"#).unwrap(),
        json!({ "page": 2 })
    );
    assert!(parse_call_args("[1, 2]").is_err());
    assert!(parse_call_args("{not json").is_err());
}

#[tokio::test]
async fn test_run_tool_unknown_name() {
    let ctx = CommandContext::from_settings(Settings::default()).unwrap();

    let err = run_tool("get_package_scor", "{}", &ctx.toolbox).await.unwrap_err();
    match err {
        PubError::UnknownTool { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("get_package_score"));
        }
        other => panic!("Expected UnknownTool error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_tool_renders_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/packages/bloc/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "grantedPoints": 150,
            "maxPoints": 160,
            "likeCount": 5000,
            "tags": ["sdk:dart"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = context_for(&mock_server);
    let text = run_tool(
        "get_package_score",
        r#"{"package_name": "bloc"}"#,
        &ctx.toolbox,
    )
    .await
    .unwrap();

    assert!(text.contains("**150/160 points** (94%)"));
    assert!(text.contains("- sdk:dart"));
}

#[tokio::test]
async fn test_context_from_explicit_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    tokio::fs::write(&config_path, "[output]\nreadme_char_limit = 300\n")
        .await
        .unwrap();

    let ctx = CommandContext::new(Some(config_path), HashMap::new())
        .await
        .unwrap();
    assert_eq!(ctx.settings.readme_char_limit, 300);
}
