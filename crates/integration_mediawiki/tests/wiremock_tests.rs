//! Integration tests for the MediaWiki client using wiremock
//!
//! These tests run the login and edit sequence against a mock `api.php`.

use integration_mediawiki::{MediaWikiClient, MediaWikiConfig, MediaWikiError, WikiClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param, query_param_is_missing},
};

/// Create a test client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer) -> MediaWikiClient {
    let config = MediaWikiConfig::new(format!("{}/api.php", mock_server.uri()), "bot", "s3cret")
        .with_timeout_secs(5);
    #[allow(clippy::expect_used)]
    MediaWikiClient::new(config).expect("Failed to create client")
}

async fn setup_login_token_mock(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("meta", "tokens"))
        .and(query_param("type", "login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "wikisession=abc; Path=/")
                .set_body_json(serde_json::json!({
                    "batchcomplete": "",
                    "query": { "tokens": { "logintoken": "abc123+\\" } }
                })),
        )
        .mount(mock_server)
        .await;
}

async fn setup_login_mock(mock_server: &MockServer, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(mock_server)
        .await;
}

async fn setup_csrf_token_mock(mock_server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("meta", "tokens"))
        .and(query_param_is_missing("type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "batchcomplete": "",
            "query": { "tokens": { "csrftoken": token } }
        })))
        .mount(mock_server)
        .await;
}

async fn setup_edit_mock(mock_server: &MockServer, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(mock_server)
        .await;
}

fn login_success() -> serde_json::Value {
    serde_json::json!({
        "login": { "result": "Success", "lguserid": 7, "lgusername": "Bot" }
    })
}

fn edit_success() -> serde_json::Value {
    serde_json::json!({
        "edit": {
            "result": "Success",
            "pageid": 42,
            "title": "Termine",
            "oldrevid": 100,
            "newrevid": 101
        }
    })
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_replace_page_full_flow() {
    let mock_server = MockServer::start().await;

    setup_login_token_mock(&mock_server).await;
    setup_login_mock(&mock_server, login_success()).await;
    setup_csrf_token_mock(&mock_server, "csrf456+\\").await;
    setup_edit_mock(&mock_server, edit_success()).await;

    let client = create_test_client(&mock_server);
    let result = client
        .replace_page("Termine", "{|\n|}", "refreshed via script")
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let outcome = result.unwrap();
    assert_eq!(outcome.new_revid, Some(101));
    assert!(!outcome.no_change);
}

#[tokio::test]
async fn test_edit_without_change() {
    let mock_server = MockServer::start().await;

    setup_login_token_mock(&mock_server).await;
    setup_login_mock(&mock_server, login_success()).await;
    setup_csrf_token_mock(&mock_server, "csrf456+\\").await;
    setup_edit_mock(
        &mock_server,
        serde_json::json!({
            "edit": { "result": "Success", "title": "Termine", "nochange": "" }
        }),
    )
    .await;

    let client = create_test_client(&mock_server);
    let outcome = client
        .replace_page("Termine", "same text", "summary")
        .await
        .unwrap();

    assert!(outcome.no_change);
    assert_eq!(outcome.new_revid, None);
}

// ============================================================================
// Request contents
// ============================================================================

#[tokio::test]
async fn test_login_sends_credentials_and_token() {
    let mock_server = MockServer::start().await;

    setup_login_token_mock(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=login"))
        .and(body_string_contains("lgname=bot"))
        .and(body_string_contains("lgpassword=s3cret"))
        .and(body_string_contains("lgtoken=abc123%2B%5C"))
        .and(body_string_contains("format=json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_session_cookie_is_sent_back() {
    let mock_server = MockServer::start().await;

    setup_login_token_mock(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(header("cookie", "wikisession=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_edit_sends_page_and_bot_flag() {
    let mock_server = MockServer::start().await;

    setup_csrf_token_mock(&mock_server, "csrf456+\\").await;
    Mock::given(method("POST"))
        .and(path("/api.php"))
        .and(body_string_contains("action=edit"))
        .and(body_string_contains("title=Termine"))
        .and(body_string_contains("summary=refreshed+via+script"))
        .and(body_string_contains("bot=1"))
        .and(body_string_contains("token=csrf456%2B%5C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(edit_success()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client
        .edit_page("Termine", "text", "refreshed via script")
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_wrong_password_is_login_failed() {
    let mock_server = MockServer::start().await;

    setup_login_token_mock(&mock_server).await;
    setup_login_mock(
        &mock_server,
        serde_json::json!({
            "login": {
                "result": "Failed",
                "reason": "Incorrect username or password entered."
            }
        }),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.replace_page("Termine", "text", "summary").await;

    assert!(
        matches!(&result, Err(MediaWikiError::LoginFailed(reason)) if reason.contains("Incorrect")),
        "Expected LoginFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_login_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "query": { "tokens": {} } })),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(
        matches!(result, Err(MediaWikiError::MissingToken("login"))),
        "Expected MissingToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_anonymous_csrf_token_is_rejected() {
    let mock_server = MockServer::start().await;

    setup_csrf_token_mock(&mock_server, "+\\").await;

    let client = create_test_client(&mock_server);
    let result = client.edit_page("Termine", "text", "summary").await;

    assert!(
        matches!(result, Err(MediaWikiError::LoginFailed(_))),
        "Expected LoginFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_edit_api_error_carries_code() {
    let mock_server = MockServer::start().await;

    setup_csrf_token_mock(&mock_server, "csrf456+\\").await;
    setup_edit_mock(
        &mock_server,
        serde_json::json!({
            "error": { "code": "protectedpage", "info": "This page has been protected." }
        }),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.edit_page("Termine", "text", "summary").await;

    assert!(
        matches!(&result, Err(MediaWikiError::Api { code, .. }) if code == "protectedpage"),
        "Expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_edit_failure_result() {
    let mock_server = MockServer::start().await;

    setup_csrf_token_mock(&mock_server, "csrf456+\\").await;
    setup_edit_mock(
        &mock_server,
        serde_json::json!({ "edit": { "result": "Failure" } }),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.edit_page("Termine", "text", "summary").await;

    assert!(
        matches!(result, Err(MediaWikiError::EditFailed(_))),
        "Expected EditFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_returns_service_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(
        matches!(result, Err(MediaWikiError::ServiceUnavailable(_))),
        "Expected ServiceUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_client_error_returns_request_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(
        matches!(result, Err(MediaWikiError::RequestFailed(_))),
        "Expected RequestFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.login().await;

    assert!(
        matches!(result, Err(MediaWikiError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_wiki() {
    let config = MediaWikiConfig::new("http://127.0.0.1:9/api.php", "bot", "pw")
        .with_timeout_secs(2);
    let client = MediaWikiClient::new(config).unwrap();

    let result = client.login().await;

    assert!(
        matches!(
            result,
            Err(MediaWikiError::ConnectionFailed(_) | MediaWikiError::RequestFailed(_))
        ),
        "Expected connection error, got: {result:?}"
    );
}
