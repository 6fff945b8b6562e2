//! End-to-end session scenarios against a stubbed backend.

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use vault_console::api::AUTH_WITH_PASSWORD_PATH;
use vault_console::router::{DEFAULT_LANDING_ROUTE, LOGIN_ROUTE};
use vault_console::storage::{CREDENTIAL_KEY, IDENTITY_KEY};
use vault_console::{
    Console, ConsoleClient, FileStorage, KeyValueStorage, MemoryStorage, NavigationOutcome,
    RouteTable,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(AUTH_WITH_PASSWORD_PATH))
        .and(body_json(serde_json::json!({
            "identity": "admin@example.com",
            "password": "secret",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "token": "abc123", "record": { "id": "u1" } }
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(AUTH_WITH_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": "INVALID_CREDENTIALS", "message": "Invalid identity or password" }
        })))
        .mount(&server)
        .await;

    server
}

fn boot(server: &MockServer, storage: Arc<dyn KeyValueStorage>) -> Console {
    let transport = ConsoleClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    Console::bootstrap_with(transport, RouteTable::console(), storage, "/")
}

fn assert_entered(outcome: &NavigationOutcome, name: &str) {
    match outcome {
        NavigationOutcome::Entered(loc) => assert_eq!(loc.name, name),
        other => panic!("expected to enter {name}, got {other:?}"),
    }
}

fn assert_redirected(outcome: &NavigationOutcome, name: &str) {
    match outcome {
        NavigationOutcome::Redirected { to, .. } => assert_eq!(to.name, name),
        other => panic!("expected redirect to {name}, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_logout_login_scenario() {
    let server = backend().await;
    let mut console = boot(&server, Arc::new(MemoryStorage::new()));
    assert!(!console.session().is_authenticated());

    // A: login, then a protected route proceeds.
    assert!(
        console
            .session()
            .authenticate("admin@example.com", "secret")
            .await
    );
    assert!(console.session().is_authenticated());
    assert_eq!(console.session().identity().unwrap().id(), Some("u1"));
    assert_entered(&console.navigate("/collections"), "Collections");

    // B: logout, the same route now redirects to Login.
    console.session().logout();
    assert_redirected(&console.navigate("/collections"), LOGIN_ROUTE);

    // C: login again, Login redirects to the landing route.
    assert!(
        console
            .session()
            .authenticate("admin@example.com", "secret")
            .await
    );
    assert_redirected(&console.navigate("/login"), DEFAULT_LANDING_ROUTE);
}

#[tokio::test]
async fn test_failed_login_leaves_user_on_login() {
    let server = backend().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut console = boot(&server, storage.clone());

    assert!(!console.login("admin@example.com", "wrong").await);

    assert!(!console.session().is_authenticated());
    assert!(storage.is_empty());
    assert_eq!(console.router().current().unwrap().name, LOGIN_ROUTE);
}

#[tokio::test]
async fn test_login_discards_deep_link_and_lands_on_default_route() {
    let server = backend().await;
    let mut console = boot(&server, Arc::new(MemoryStorage::new()));

    assert_redirected(&console.navigate("/collections/posts/edit/r1"), LOGIN_ROUTE);
    assert!(console.login("admin@example.com", "secret").await);

    assert_eq!(console.router().current().unwrap().name, DEFAULT_LANDING_ROUTE);
}

#[tokio::test]
async fn test_requests_carry_bearer_after_login_and_not_after_logout() {
    let server = backend().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/collections"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "id": "c1", "name": "posts", "type": "base" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut console = boot(&server, Arc::new(MemoryStorage::new()));
    assert!(console.login("admin@example.com", "secret").await);

    let collections = console.client().list_collections().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "posts");

    console.logout();

    let req = console
        .client()
        .build_request(Method::GET, "/api/admin/collections")
        .unwrap();
    assert!(req.headers().get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_logout_clears_durable_slots() {
    let server = backend().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut console = boot(&server, storage.clone());
    assert!(console.login("admin@example.com", "secret").await);
    assert_eq!(
        storage.get(CREDENTIAL_KEY).unwrap().as_deref(),
        Some("abc123")
    );

    console.logout();

    assert!(!console.session().is_authenticated());
    assert!(storage.get(CREDENTIAL_KEY).unwrap().is_none());
    assert!(storage.get(IDENTITY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_session_survives_restart_on_disk() {
    let server = backend().await;
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    {
        let mut console = boot(&server, Arc::new(FileStorage::new(&session_file)));
        assert!(console.login("admin@example.com", "secret").await);
    }

    let console = boot(&server, Arc::new(FileStorage::new(&session_file)));

    let session = console.session().session().unwrap();
    assert_eq!(session.credential.as_str(), "abc123");
    assert_eq!(session.identity.id(), Some("u1"));
    assert_eq!(console.router().current().unwrap().name, DEFAULT_LANDING_ROUTE);
}

#[tokio::test]
async fn test_corrupt_session_file_boots_unauthenticated() {
    let server = backend().await;
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, r#"{"token":"abc123","user":"not-json"}"#).unwrap();

    let console = boot(&server, Arc::new(FileStorage::new(&session_file)));

    assert!(!console.session().is_authenticated());
    assert_eq!(console.router().current().unwrap().name, LOGIN_ROUTE);
}

#[tokio::test]
async fn test_login_recovers_from_unreadable_session_file() {
    let server = backend().await;
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(&session_file, "not json at all").unwrap();

    let mut console = boot(&server, Arc::new(FileStorage::new(&session_file)));
    assert!(!console.session().is_authenticated());

    assert!(console.login("admin@example.com", "secret").await);
    assert!(console.session().is_authenticated());

    let reopened = FileStorage::new(&session_file);
    assert_eq!(
        reopened.get(CREDENTIAL_KEY).unwrap().as_deref(),
        Some("abc123")
    );

    console.logout();
    assert!(reopened.get(CREDENTIAL_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_empty_token_from_backend_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(AUTH_WITH_PASSWORD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "token": "", "record": { "id": "u1" } }
        })))
        .mount(&server)
        .await;
    let storage = Arc::new(MemoryStorage::new());
    let mut console = boot(&server, storage.clone());

    assert!(!console.login("admin@example.com", "secret").await);

    assert!(!console.session().is_authenticated());
    assert!(storage.is_empty());
    assert_eq!(console.router().current().unwrap().name, LOGIN_ROUTE);
}

#[tokio::test]
async fn test_unreachable_backend_fails_login_without_panicking() {
    let transport = ConsoleClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let mut console = Console::bootstrap_with(
        transport,
        RouteTable::console(),
        Arc::new(MemoryStorage::new()),
        "/",
    );

    assert!(!console.login("admin@example.com", "secret").await);
    assert!(!console.session().is_authenticated());
}
