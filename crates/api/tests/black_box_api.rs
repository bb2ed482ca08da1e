use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use logbook_infra::AppConfig;
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let mut config = AppConfig::with_secret(JWT_SECRET);
        // Minimum bcrypt cost keeps the suite fast.
        config.bcrypt_cost = 4;

        // Build app (same router as prod), but bind to an ephemeral port.
        let app = logbook_api::app::build_app_from_config(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/register", json!({ "username": username, "password": password }))
            .await
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/login", json!({ "username": username, "password": password }))
            .await
    }

    async fn token_for(&self, username: &str, password: &str) -> String {
        let res = self.login(username, password).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sign a token outside the server, the way any HS256 client library would.
fn mint_jwt(secret: &str, claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .get(srv.url("/products"))
        .header("origin", "http://example.test")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn register_then_login_with_right_and_wrong_password() {
    let srv = TestServer::spawn().await;

    let res = srv.register("alice", "pw1").await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");

    let token = srv.token_for("alice", "pw1").await;
    assert_eq!(token.split('.').count(), 3);

    let res = srv.login("alice", "wrong").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid password");
}

#[tokio::test]
async fn login_for_unknown_user_is_bad_request() {
    let srv = TestServer::spawn().await;

    let res = srv.login("nobody", "pw").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn forgot_password_replaces_the_old_password() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.register("alice", "pw1").await.status(), StatusCode::CREATED);

    let res = srv
        .post(
            "/api/forgot-password",
            json!({ "username": "alice", "newPassword": "pw2" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Password updated successfully");

    assert_eq!(srv.login("alice", "pw1").await.status(), StatusCode::BAD_REQUEST);
    srv.token_for("alice", "pw2").await;
}

#[tokio::test]
async fn forgot_password_for_unknown_user_is_bad_request() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(
            "/api/forgot-password",
            json!({ "username": "ghost", "newPassword": "pw2" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.register("alice", "pw1").await.status(), StatusCode::CREATED);

    let res = srv.register("alice", "other").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The original password is untouched.
    srv.token_for("alice", "pw1").await;
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/api/register", json!({ "username": "alice" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.register("   ", "pw").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .post(srv.url("/api/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logs_require_a_token() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/api/logs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .post(srv.url("/api/logs"))
        .json(&json!({ "message": "m", "level": "info" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .header("authorization", "Bearer")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The token is the second space-separated part; here that part is empty.
    let token = mint_jwt(
        JWT_SECRET,
        json!({ "username": "bob", "iat": Utc::now().timestamp() }),
    );
    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .header("authorization", format!("Bearer  {token}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_tokens_are_forbidden() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Any scheme word is accepted; the credential after it is still verified.
    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .header("authorization", "Basic dXNlcjpwdw==")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let foreign = mint_jwt(
        "some-other-secret",
        json!({ "username": "mallory", "iat": Utc::now().timestamp() }),
    );
    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .bearer_auth(foreign)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let now = Utc::now();
    let expired = mint_jwt(
        JWT_SECRET,
        json!({
            "username": "bob",
            "iat": (now - ChronoDuration::minutes(10)).timestamp(),
            "exp": (now - ChronoDuration::minutes(5)).timestamp(),
        }),
    );
    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn empty_log_register_is_not_found() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;
    let token = srv.token_for("alice", "pw1").await;

    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "No logs found" }));
}

#[tokio::test]
async fn appended_logs_carry_the_token_identity_in_order() {
    let srv = TestServer::spawn().await;
    srv.register("alice", "pw1").await;
    let alice = srv.token_for("alice", "pw1").await;
    // Identity comes from the token alone; "bob" never registered.
    let bob = mint_jwt(
        JWT_SECRET,
        json!({ "username": "bob", "iat": Utc::now().timestamp() }),
    );

    let res = srv
        .client
        .post(srv.url("/api/logs"))
        .bearer_auth(&alice)
        .json(&json!({ "message": "A", "level": "info" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let a: serde_json::Value = res.json().await.unwrap();
    assert_eq!(a["user"], "alice");
    assert_eq!(a["message"], "A");
    assert_eq!(a["level"], "info");
    assert!(a["timestamp"].is_string());

    let res = srv
        .client
        .post(srv.url("/api/logs"))
        .bearer_auth(&bob)
        .json(&json!({ "message": "B", "level": "error" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let b: serde_json::Value = res.json().await.unwrap();
    assert_eq!(b["user"], "bob");

    let res = srv
        .client
        .get(srv.url("/api/logs"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: serde_json::Value = res.json().await.unwrap();
    assert_eq!(all, json!([a, b]));
}

#[tokio::test]
async fn log_append_requires_message_and_level() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(
        JWT_SECRET,
        json!({ "username": "bob", "iat": Utc::now().timestamp() }),
    );

    let res = srv
        .client
        .post(srv.url("/api/logs"))
        .bearer_auth(&token)
        .json(&json!({ "message": "no level" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn products_are_created_and_listed() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));

    let res = srv
        .post(
            "/products",
            json!({
                "title": "Hammer",
                "description": "Steel claw hammer",
                "categories": "tools, hardware,, ",
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["message"], "Product added successfully");
    assert_eq!(created["product"]["title"], "Hammer");
    assert_eq!(created["product"]["categories"], json!(["tools", "hardware"]));
    assert!(created["product"]["id"].is_string());

    let res = srv.client.get(srv.url("/products")).send().await.unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([created["product"].clone()]));
}

#[tokio::test]
async fn product_without_title_is_rejected() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post("/products", json!({ "title": " ", "categories": "x" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv.post("/products", json!({ "categories": "x" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
