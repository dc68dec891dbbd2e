//! End-to-end tests: session controller against the reference auth server

use std::sync::Arc;
use std::time::Duration;

use tutorlink::auth::{
    AuthController, AuthState, FileStore, Guard, GuardDecision, KeyValueStore, Redirect,
    Registration, Role, Route, SessionStore,
};
use tutorlink::client::{AuthBackend, HttpBackend};
use tutorlink::config::{SeedUser, ServerConfig, UnknownRolePolicy};
use tutorlink::error::Error;
use tutorlink::server;

const TEST_COST: u32 = 4;

fn server_config() -> ServerConfig {
    ServerConfig {
        bcrypt_cost: TEST_COST,
        seed_users: vec![
            SeedUser {
                name: "Platform Admin".to_string(),
                email: "admin@tutorlink.local".to_string(),
                password: "admin123".to_string(),
                role: Role::Admin,
                subjects: Vec::new(),
                bio: String::new(),
            },
            SeedUser {
                name: "Ana".to_string(),
                email: "ana@tutorlink.local".to_string(),
                password: "tutor123".to_string(),
                role: Role::Tutor,
                subjects: vec!["Math".to_string()],
                bio: "Calculus".to_string(),
            },
        ],
        ..ServerConfig::default()
    }
}

/// Start the server on an ephemeral port and return its API base URL
async fn start_test_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = server_config();

    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, &config).await {
            eprintln!("test server stopped: {e}");
        }
    });

    format!("http://{}/api", addr)
}

fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(base_url, Duration::from_secs(5)).unwrap()
}

async fn controller(base_url: &str, storage: &FileStore) -> AuthController<HttpBackend> {
    let store = SessionStore::new(Arc::new(storage.clone()), "token");
    AuthController::bootstrap(backend(base_url), store, UnknownRolePolicy::Student).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let base_url = start_test_server().await;

    let response = reqwest::get(format!("{}/health", base_url)).await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_restore_logout_cycle() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));

    let first = controller(&base_url, &storage).await;
    assert_eq!(first.state(), AuthState::Anonymous);

    let outcome = first.login("ANA@tutorlink.local", "tutor123").await;
    let identity = outcome.identity().expect("seeded tutor should sign in");
    assert_eq!(identity.role(), Role::Tutor);
    assert_eq!(identity.subjects, vec!["Math".to_string()]);
    assert!(first.has_access("planner"));
    assert!(!first.has_access("tutors"));
    let token = storage.get("token").unwrap().expect("token should be persisted");

    // A new controller over the same storage picks the session back up
    let second = controller(&base_url, &storage).await;
    assert_eq!(second.identity().map(|i| i.email), Some("ana@tutorlink.local".to_string()));

    second.logout().await;
    assert_eq!(second.state(), AuthState::Anonymous);
    assert_eq!(storage.get("token").unwrap(), None);

    // The server no longer honours the old token
    let result = backend(&base_url).me(&token).await;
    assert!(matches!(result, Err(Error::Backend { status: 401, .. })));
}

#[tokio::test]
async fn test_bad_password_is_reported() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    let controller = controller(&base_url, &storage).await;

    let outcome = controller.login("ana@tutorlink.local", "bad").await;

    assert_eq!(outcome.error(), Some("Invalid email or password"));
    assert_eq!(controller.state(), AuthState::Anonymous);
    assert_eq!(storage.get("token").unwrap(), None);
}

#[tokio::test]
async fn test_register_then_guards() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    let controller = controller(&base_url, &storage).await;

    let registration = Registration {
        name: "Sam".to_string(),
        email: "sam@example.test".to_string(),
        password: "pw".to_string(),
        role: "Both Learn and Teach".to_string(),
        subjects: vec!["Math".to_string()],
        bio: String::new(),
    };
    let outcome = controller.register(&registration).await;
    let identity = outcome.identity().expect("registration should succeed");
    assert_eq!(identity.role(), Role::Both);
    assert_eq!(identity.allowed_routes().len(), Route::ALL.len());

    assert_eq!(
        Guard::any_of([Route::CreateExam, Route::Chat]).resolve(&controller).await,
        GuardDecision::Allow
    );
    assert_eq!(
        Guard::admin().resolve(&controller).await,
        GuardDecision::Redirect(Redirect::Home)
    );

    // Same email again is a conflict
    let again = controller.register(&registration).await;
    assert!(again.error().unwrap().contains("already exists"));
    assert!(controller.state().is_authenticated());
}

#[tokio::test]
async fn test_register_cannot_claim_admin() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    let controller = controller(&base_url, &storage).await;

    let outcome = controller
        .register(&Registration {
            name: "Mallory".to_string(),
            email: "mallory@example.test".to_string(),
            password: "pw".to_string(),
            role: "admin".to_string(),
            ..Registration::default()
        })
        .await;

    assert!(!outcome.is_success());
    assert_eq!(controller.state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_admin_guard_for_seeded_admin() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    let controller = controller(&base_url, &storage).await;

    assert!(controller.login("admin@tutorlink.local", "admin123").await.is_success());
    assert_eq!(Guard::admin().resolve(&controller).await, GuardDecision::Allow);
    assert!(Route::ALL.iter().all(|route| controller.can_open(*route)));
}

#[tokio::test]
async fn test_garbage_stored_token_is_purged_on_restore() {
    let base_url = start_test_server().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    storage.set("token", "not-a-jwt").unwrap();

    let controller = controller(&base_url, &storage).await;

    assert_eq!(controller.state(), AuthState::Anonymous);
    assert_eq!(storage.get("token").unwrap(), None);
}

#[tokio::test]
async fn test_unreachable_backend_fails_softly() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStore::new(dir.path().join("storage.json"));
    storage.set("token", "stale").unwrap();
    let controller = controller(&format!("http://{}/api", addr), &storage).await;

    assert_eq!(controller.state(), AuthState::Anonymous);
    assert_eq!(storage.get("token").unwrap(), None);

    let outcome = controller.login("ana@tutorlink.local", "tutor123").await;
    assert_eq!(outcome.error(), Some("Login failed"));

    controller.logout().await;
    assert_eq!(controller.state(), AuthState::Anonymous);
}
