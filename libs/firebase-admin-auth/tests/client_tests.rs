//! HTTP-level tests for the auth client against a mock Identity Toolkit
//! backend.

use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use firebase_admin_auth::AuthClient;
use firebase_admin_core::{ErrorKind, HttpTransport};

fn client(endpoint: &str) -> AuthClient {
    let transport = Arc::new(HttpTransport::new("test-token"));
    AuthClient::new("demo", transport).with_endpoint(endpoint)
}

#[tokio::test]
async fn test_list_users_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .and(query_param("maxResults", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "users": [
                    {"localId": "uid-1", "email": "one@example.com"},
                    {"localId": "uid-2", "disabled": true}
                ],
                "nextPageToken": "cursor-1"
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server.uri()).list_users(None, None).await.unwrap();

    assert_eq!(page.users.len(), 2);
    assert_eq!(page.users[0].uid, "uid-1");
    assert_eq!(page.users[0].email.as_deref(), Some("one@example.com"));
    assert!(page.users[1].disabled);
    assert!(page.has_next_page());
    assert_eq!(page.next_page_token.as_deref(), Some("cursor-1"));
}

#[tokio::test]
async fn test_list_users_continues_from_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .and(query_param("maxResults", "50"))
        .and(query_param("nextPageToken", "cursor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"users": [{"localId": "uid-3"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server.uri())
        .list_users(Some(50), Some("cursor-1"))
        .await
        .unwrap();

    assert_eq!(page.users.len(), 1);
    // No token on the final page
    assert!(!page.has_next_page());
}

#[tokio::test]
async fn test_list_users_empty_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let page = client(&server.uri()).list_users(None, None).await.unwrap();
    assert!(page.users.is_empty());
    assert!(!page.has_next_page());
}

#[tokio::test]
async fn test_list_users_classifies_structured_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"status":"PERMISSION_DENIED","message":"caller lacks permission"}}"#,
        ))
        .mount(&server)
        .await;

    let error = client(&server.uri()).list_users(None, None).await.unwrap_err();

    // The structured status overrides the 400-derived kind
    assert_eq!(error.kind(), ErrorKind::PermissionDenied);
    assert_eq!(error.to_string(), "caller lacks permission");
}

#[tokio::test]
async fn test_list_users_generic_failure_keeps_status_kind() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream maintenance"))
        .mount(&server)
        .await;

    let error = client(&server.uri()).list_users(None, None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Unavailable);
    assert!(error
        .to_string()
        .contains("Unexpected HTTP response with status: 503"));
}

#[tokio::test]
async fn test_list_users_rejects_out_of_range_max_results() {
    let server = MockServer::start().await;

    let error = client(&server.uri())
        .list_users(Some(1001), None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);

    let error = client(&server.uri())
        .list_users(Some(0), None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);

    // Nothing was mounted; no request may have been made
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_users_url_encodes_page_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/accounts:batchGet"))
        .and(query_param("nextPageToken", "a b/c+d"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server.uri())
        .list_users(None, Some("a b/c+d"))
        .await
        .unwrap();
}
