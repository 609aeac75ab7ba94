//! Integration tests for the portal HTTP client

use portal_http::types::ResetMethod;
use portal_http::{ClientConfig, ClientError, Host, MemoryHost, PortalClient};
use serde_json::json;
use std::rc::Rc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJlAAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6 alice@laptop";

fn client_for(server: &MockServer, host: Rc<MemoryHost>) -> PortalClient {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    PortalClient::new(Rc::new(config), host).unwrap()
}

fn user_json() -> serde_json::Value {
    json!({
        "dn": "uid=alice,ou=people,dc=example,dc=com",
        "username": "alice",
        "email": "alice@example.com",
        "firstName": "Alice",
        "lastName": "Liddell",
        "sshKeys": null
    })
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let host = Rc::new(MemoryHost::at_path("/dashboard").with_item("token", "stored-token"));
    let client = client_for(&mock_server, host);

    let user = client.profile().await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.ssh_keys.is_empty());
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    client.profile().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_json_content_type_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/ssh-keys"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sshKeys": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    let keys = client.ssh_keys().await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })),
        )
        .mount(&mock_server)
        .await;

    let host = Rc::new(
        MemoryHost::at_path("/dashboard")
            .with_item("token", "expired")
            .with_item("user", "{}")
            .with_item("theme", "dark"),
    );
    let client = client_for(&mock_server, host.clone());

    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationFailed(ref msg) if msg == "Invalid token"));
    assert!(err.is_auth_expired());

    assert!(!host.contains("token"));
    assert!(!host.contains("user"));
    assert!(host.contains("theme"));
    assert_eq!(host.navigations(), vec!["/login".to_string()]);
    assert_eq!(host.pathname(), "/login");
}

#[tokio::test]
async fn test_unauthorized_on_login_page_does_not_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&mock_server)
        .await;

    let host = Rc::new(MemoryHost::at_path("/login").with_item("token", "stale"));
    let client = client_for(&mock_server, host.clone());

    let err = client.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::AuthenticationFailed(_)));
    assert!(!host.contains("token"));
    assert!(host.navigations().is_empty());
}

#[tokio::test]
async fn test_custom_login_path_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .login_path("/portal/sign-in")
        .build()
        .unwrap();
    let host = Rc::new(MemoryHost::at_path("/profile").with_item("token", "t"));
    let client = PortalClient::new(Rc::new(config), host.clone()).unwrap();

    let err = client.profile().await.unwrap_err();
    // Empty body falls back to the status text
    assert!(matches!(err, ClientError::AuthenticationFailed(ref msg) if msg.contains("401")));
    assert_eq!(host.navigations(), vec!["/portal/sign-in".to_string()]);
}

#[tokio::test]
async fn test_server_error_leaves_session_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to get user" })),
        )
        .mount(&mock_server)
        .await;

    let host = Rc::new(MemoryHost::at_path("/dashboard").with_item("token", "t"));
    let client = client_for(&mock_server, host.clone());

    let err = client.profile().await.unwrap_err();
    match err {
        ClientError::ServerError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to get user");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(host.contains("token"));
    assert!(host.navigations().is_empty());
}

#[tokio::test]
async fn test_login_stores_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({ "username": "alice", "password": "Secret123!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "user": user_json()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let host = Rc::new(MemoryHost::at_path("/login"));
    let client = client_for(&mock_server, host.clone());

    assert!(!client.is_authenticated());
    let user = client.login("alice", "Secret123!").await.unwrap();
    assert_eq!(user.display_name(), "Alice Liddell");

    assert_eq!(host.get_item("token").as_deref(), Some("fresh-token"));
    assert!(client.is_authenticated());
    assert_eq!(client.stored_user().unwrap().username, "alice");

    client.logout();
    assert!(!client.is_authenticated());
    assert!(client.stored_user().is_none());
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, Rc::new(MemoryHost::at_path("/login")));

    let err = client.login("  ", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_ssh_key_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ssh-keys"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));

    let err = client.add_ssh_key("laptop", "ssh-rsa AAAA").await.unwrap_err();
    match err {
        ClientError::Validation(messages) => {
            assert_eq!(messages, vec!["SSH key data appears to be too short".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_add_ssh_key_sends_trimmed_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/ssh-keys"))
        .and(body_json(json!({ "name": "laptop", "publicKey": VALID_KEY })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "SSH key added" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    let padded = format!("  {VALID_KEY}\n");

    let response = client.add_ssh_key(" laptop ", &padded).await.unwrap();
    assert_eq!(response.message, "SSH key added");
}

#[tokio::test]
async fn test_delete_ssh_key_by_index() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/ssh-keys/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "SSH key removed" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    client.delete_ssh_key(2).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/ssh-keys/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "SSH key not found" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    let err = client.delete_ssh_key(9).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref msg) if msg == "SSH key not found"));
}

#[tokio::test]
async fn test_change_password_mismatch() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));

    let err = client
        .change_password("Old-pass1", "NewPass123!", "NewPass123?")
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(messages) => {
            assert_eq!(messages, vec!["Passwords do not match".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_change_password_weak() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));

    let err = client
        .change_password("Old-pass1", "short", "short")
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(messages) => {
            assert!(messages.contains(&"Password must be at least 8 characters long".to_string()));
            assert!(
                messages.contains(&"Password must contain at least one uppercase letter".to_string())
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_change_password() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/password"))
        .and(body_json(json!({
            "currentPassword": "Old-pass1",
            "newPassword": "NewPass123!",
            "confirmPassword": "NewPass123!"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Password changed successfully" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    let response = client
        .change_password("Old-pass1", "NewPass123!", "NewPass123!")
        .await
        .unwrap();
    assert_eq!(response.message, "Password changed successfully");
}

#[tokio::test]
async fn test_password_reset_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/reset-password"))
        .and(body_json(json!({ "username": "alice", "method": "email" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Reset code sent",
            "token": "reset-123",
            "method": "email"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/reset-password/confirm"))
        .and(body_json(json!({
            "token": "reset-123",
            "code": "123456",
            "newPassword": "NewPass123!"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Password reset" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::at_path("/reset")));

    let pending = client
        .request_password_reset(" alice ", ResetMethod::Email)
        .await
        .unwrap();
    assert_eq!(pending.method, ResetMethod::Email);

    client
        .confirm_password_reset(&pending.token, " 123456 ", "NewPass123!")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_sms() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/verify-sms"))
        .and(body_json(json!({ "code": "654321", "token": "v-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "verified": true, "phone": "+15551234567" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Rc::new(MemoryHost::new()));
    let result = client.verify_sms("v-1", "654321").await.unwrap();
    assert!(result.verified);
    assert_eq!(result.phone, "+15551234567");
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let host = Rc::new(MemoryHost::at_path("/dashboard").with_item("token", "t"));
    let client = PortalClient::new(Rc::new(config), host.clone()).unwrap();

    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, ClientError::Request(ref e) if e.is_timeout()));
    assert!(host.contains("token"));
}
