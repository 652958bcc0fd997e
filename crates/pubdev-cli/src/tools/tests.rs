//! Handler tests against a mocked registry

use super::*;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn toolbox_for(server: &MockServer) -> Toolbox {
    let settings = Settings {
        api_base_url: format!("{}/api", server.uri()),
        site_base_url: server.uri(),
        ..Settings::default()
    };
    Toolbox::from_settings(&settings).unwrap()
}

fn http_package() -> Value {
    json!({
        "name": "http",
        "latest": {
            "version": "1.2.1",
            "pubspec": {
                "name": "http",
                "description": "A composable, Future-based library for making HTTP requests.",
                "repository": "https://github.com/dart-lang/http/tree/master/pkgs/http",
                "dependencies": { "async": "^2.5.0", "meta": "^1.3.0" }
            },
            "published": "2024-03-01T12:00:00Z"
        },
        "versions": [
            { "version": "1.2.0", "pubspec": {} },
            { "version": "1.2.1", "pubspec": {} }
        ]
    })
}

async fn mount_package(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/packages/http"))
        .respond_with(ResponseTemplate::new(200).set_body_json(http_package()))
        .mount(server)
        .await;
}

#[test]
fn test_tool_names_round_trip() {
    for kind in ToolKind::ALL {
        assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ToolKind::from_name("get_package"), None);
}

#[test]
fn test_suggest_similar_tool() {
    assert_eq!(
        suggest_similar_tool("get_pakage_info"),
        Some("get_package_info".to_string())
    );
    assert_eq!(
        suggest_similar_tool("search_package"),
        Some("search_packages".to_string())
    );
    assert_eq!(suggest_similar_tool("delete_everything"), None);
}

#[test]
fn test_edit_distance() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("abc", "abc"), 0);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
}

#[test]
fn test_normalize_page() {
    assert_eq!(normalize_page(None), 1);
    assert_eq!(normalize_page(Some(0)), 1);
    assert_eq!(normalize_page(Some(7)), 7);
}

#[tokio::test]
async fn test_dispatch_unknown_tool() {
    let toolbox = Toolbox::from_settings(&Settings::default()).unwrap();

    match toolbox.dispatch("get_pakage_info", json!({})).await {
        Err(PubError::UnknownTool { name, suggestion }) => {
            assert_eq!(name, "get_pakage_info");
            assert_eq!(suggestion.as_deref(), Some("get_package_info"));
        }
        other => panic!("Expected UnknownTool error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dispatch_missing_required_argument() {
    let toolbox = Toolbox::from_settings(&Settings::default()).unwrap();

    let err = toolbox
        .dispatch("get_package_info", json!({ "name": "http" }))
        .await
        .unwrap_err();
    assert!(matches!(err, PubError::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_package_info_handler() {
    let mock_server = MockServer::start().await;
    mount_package(&mock_server).await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("get_package_info", json!({ "package_name": "http" }))
        .await
        .unwrap();

    assert!(text.starts_with("# http v1.2.1"));
    assert!(text.contains("- async: ^2.5.0\n- meta: ^1.3.0"));
    assert!(text.contains(&format!("- **Pub.dev:** {}/packages/http", mock_server.uri())));
}

#[tokio::test]
async fn test_package_info_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/packages/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let err = toolbox.package_info("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_search_handler_forwards_query_and_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "http client"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "packages": [{ "package": "dio" }, { "package": "http" }],
            "next": "next-page"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("search_packages", json!({ "query": "http client", "page": 2 }))
        .await
        .unwrap();

    assert!(text.contains("\"http client\""));
    assert!(text.contains("## 1. dio"));
    assert!(text.contains("## 2. http"));
    assert!(text.contains("*Use page 3 for more results*"));
}

#[tokio::test]
async fn test_search_handler_defaults_to_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "packages": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("search_packages", json!({ "query": "nothing" }))
        .await
        .unwrap();
    assert!(text.contains("No packages found"));
}

#[tokio::test]
async fn test_versions_handler() {
    let mock_server = MockServer::start().await;
    mount_package(&mock_server).await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("get_package_versions", json!({ "package_name": "http" }))
        .await
        .unwrap();

    assert!(text.contains("1. v1.2.1 **(latest)**\n2. v1.2.0"));
    assert!(text.contains("**2 versions available**"));
}

#[tokio::test]
async fn test_documentation_handler_strips_page() {
    let mock_server = MockServer::start().await;
    mount_package(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/packages/http/versions/1.2.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>http</h1><p>Use &lt;Client&gt;</p></body></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch(
            "get_package_documentation",
            json!({ "package_name": "http", "version": "1.2.0" }),
        )
        .await
        .unwrap();

    assert!(text.contains("- **Version:** 1.2.0"));
    assert!(text.contains("## README\nhttpUse <Client>\n"));
    assert!(text.contains("[Source Code](https://github.com/dart-lang/http/tree/master/pkgs/http)"));
}

#[tokio::test]
async fn test_documentation_handler_missing_page() {
    let mock_server = MockServer::start().await;
    mount_package(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/packages/http"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox.package_documentation("http", None).await.unwrap();

    assert!(text.contains("- **Version:** 1.2.1"));
    assert!(text.contains(render::README_NOT_FOUND));
}

#[tokio::test]
async fn test_score_handler() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/packages/http/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "grantedPoints": 160,
            "maxPoints": 160,
            "likeCount": 7800,
            "popularityScore": 1.0,
            "tags": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("get_package_score", json!({ "package_name": "http" }))
        .await
        .unwrap();

    assert!(text.starts_with("# http - Package Scores"));
    assert!(text.contains("**160/160 points** (100%)"));
    assert!(text.contains("- **Likes:** 7800"));
    assert!(text.contains("No tags"));
}

#[tokio::test]
async fn test_trending_handler_without_arguments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("sort", "popularity"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "packages": [{ "package": "provider" }, { "package": "http" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("get_trending_packages", Value::Null)
        .await
        .unwrap();

    assert!(text.contains("# Trending Flutter Packages (Page 1)"));
    assert!(text.contains("## 1. provider"));
    assert!(text.contains("## 2. http"));
    assert!(text.contains("*Use page 2 for more*"));
}

#[tokio::test]
async fn test_trending_handler_highest_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("sort", "popularity"))
        .and(query_param("page", "4294967295"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "packages": [{ "package": "provider" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let toolbox = toolbox_for(&mock_server);
    let text = toolbox
        .dispatch("get_trending_packages", json!({ "page": u32::MAX }))
        .await
        .unwrap();

    assert!(text.contains("# Trending Flutter Packages (Page 4294967295)"));
    assert!(text.contains("provider"));
    assert!(!text.contains("for more"));
}
