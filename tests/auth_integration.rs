use chirpy_auth::auth::{
    hash_password, validate_access_token, Claims, Credential, SessionManager,
    EXPIRY_RESOLUTION_SECONDS,
};
use chirpy_auth::configuration::AuthSettings;
use chirpy_auth::startup::run;
use chirpy_auth::store::InMemoryStore;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";
const EMAIL: &str = "u@x.com";
const PASSWORD: &str = "secret";

pub struct TestApp {
    pub address: String,
    pub user_id: Uuid,
    pub client: reqwest::Client,
}

impl TestApp {
    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/login", &self.address))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", &self.address, path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn me(&self, token: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}/api/me", &self.address))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    let user_id = Uuid::new_v4();
    store
        .insert_credential(Credential {
            user_id,
            email: EMAIL.to_string(),
            hashed_password: hash_password(PASSWORD).expect("Failed to hash password"),
        })
        .expect("Failed to seed credential");

    let sessions = SessionManager::new(store.clone(), store, AuthSettings::new(SECRET))
        .expect("Failed to build session manager");
    let server = run(listener, sessions).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        user_id,
        client: reqwest::Client::new(),
    }
}

fn claims_of(token: &str) -> Claims {
    validate_access_token(token, SECRET.as_bytes()).expect("Failed to validate token")
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn login_returns_tokens_for_valid_credentials() {
    let app = spawn_app().await;

    let response = app.login(EMAIL, PASSWORD).await;
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user_id"], app.user_id.to_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(body["refresh_token"].as_str().unwrap().len(), 64);
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;

    let wrong_password = app.login(EMAIL, "not-the-password").await;
    let unknown_email = app.login("nobody@x.com", PASSWORD).await;

    assert_eq!(401, wrong_password.status().as_u16());
    assert_eq!(401, unknown_email.status().as_u16());

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_email: Value = unknown_email.json().await.unwrap();
    assert_eq!(wrong_password["code"], unknown_email["code"]);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn access_token_authenticates_protected_route() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();

    let response = app.me(body["token"].as_str().unwrap()).await;
    assert_eq!(200, response.status().as_u16());

    let me: Value = response.json().await.unwrap();
    assert_eq!(me["user_id"], app.user_id.to_string());
}

#[tokio::test]
async fn protected_route_rejects_bad_credentials() {
    let app = spawn_app().await;

    let missing = app
        .client
        .get(&format!("{}/api/me", &app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, missing.status().as_u16());

    let wrong_scheme = app
        .client
        .get(&format!("{}/api/me", &app.address))
        .header("Authorization", "ApiKey xyz")
        .send()
        .await
        .unwrap();
    assert_eq!(401, wrong_scheme.status().as_u16());

    let garbage = app.me("not.a.token").await;
    assert_eq!(401, garbage.status().as_u16());

    // Header detail stays server-side
    let body: Value = wrong_scheme.json().await.unwrap();
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn refresh_works_until_revoked() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let mut previous = claims_of(body["token"].as_str().unwrap());
    for _ in 0..3 {
        let response = app.post_with_bearer("/api/refresh", &refresh_token).await;
        assert_eq!(200, response.status().as_u16());

        let refreshed: Value = response.json().await.unwrap();
        let token = refreshed["token"].as_str().unwrap();
        let claims = claims_of(token);
        assert_ne!(claims.jti, previous.jti);
        assert!(claims.exp >= previous.exp);
        assert!(claims.exp - previous.exp <= EXPIRY_RESOLUTION_SECONDS);
        assert_eq!(200, app.me(token).await.status().as_u16());
        previous = claims;
    }

    let revoked = app.post_with_bearer("/api/revoke", &refresh_token).await;
    assert_eq!(204, revoked.status().as_u16());

    let response = app.post_with_bearer("/api/refresh", &refresh_token).await;
    assert_eq!(401, response.status().as_u16());

    // Revoking again is still fine
    let revoked = app.post_with_bearer("/api/revoke", &refresh_token).await;
    assert_eq!(204, revoked.status().as_u16());
}

#[tokio::test]
async fn back_to_back_refreshes_return_distinct_tokens() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();
    let refresh_token = body["refresh_token"].as_str().unwrap();

    let (first, second) = tokio::join!(
        app.post_with_bearer("/api/refresh", refresh_token),
        app.post_with_bearer("/api/refresh", refresh_token),
    );
    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();

    assert_ne!(first["token"], second["token"]);
    assert_ne!(body["token"], first["token"]);
}

#[tokio::test]
async fn refresh_rejects_access_token_and_unknown_token() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();

    let with_access_token = app
        .post_with_bearer("/api/refresh", body["token"].as_str().unwrap())
        .await;
    assert_eq!(401, with_access_token.status().as_u16());

    let unknown = app.post_with_bearer("/api/refresh", "deadbeef").await;
    assert_eq!(401, unknown.status().as_u16());

    let no_header = app
        .client
        .post(&format!("{}/api/refresh", &app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(401, no_header.status().as_u16());
}

#[tokio::test]
async fn change_password_requires_access_token() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let unauthenticated = app
        .client
        .put(&format!("{}/api/users/password", &app.address))
        .json(&json!({ "password": "brand new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(401, unauthenticated.status().as_u16());

    let changed = app
        .client
        .put(&format!("{}/api/users/password", &app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "password": "brand new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(204, changed.status().as_u16());

    assert_eq!(401, app.login(EMAIL, PASSWORD).await.status().as_u16());
    assert_eq!(200, app.login(EMAIL, "brand new").await.status().as_u16());
}

#[tokio::test]
async fn change_password_rejects_empty_password() {
    let app = spawn_app().await;
    let body: Value = app.login(EMAIL, PASSWORD).await.json().await.unwrap();

    let response = app
        .client
        .put(&format!("{}/api/users/password", &app.address))
        .header("Authorization", format!("Bearer {}", body["token"].as_str().unwrap()))
        .json(&json!({ "password": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(400, response.status().as_u16());
}
