// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use student_portal::{create_router_with_config, AdminBootstrap, AppConfig, MetricsKind};
use tower::ServiceExt;

pub const ADMIN_ID: &str = "ADMIN01";
pub const ADMIN_PASSWORD: &str = "admin-pass";

// ============================================================================
// Test Setup
// ============================================================================

/// An in-memory application driven without a socket.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    // ---
    /// Memory storage, no-op metrics and a bootstrap admin account.
    pub async fn new() -> Self {
        // ---
        Self::with_metrics(MetricsKind::Noop).await
    }

    pub async fn with_metrics(metrics: MetricsKind) -> Self {
        // ---
        if std::env::var("TEST_DEBUG").is_ok() {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        }

        let mut config = AppConfig::in_memory();
        config.metrics = metrics;
        config.admin = Some(AdminBootstrap {
            student_id: ADMIN_ID.into(),
            password: ADMIN_PASSWORD.into(),
        });

        let router = create_router_with_config(config)
            .await
            .expect("Should be able to create router");
        Self { router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        // ---
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Send a request and return the status with the raw body text.
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, String) {
        // ---
        let response = self.send(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a JSON request, optionally authenticated, and decode the JSON reply.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        // ---
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let (status, text) = self.send_raw(request).await;
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, token, None).await
    }

    // ============================================================================
    // Accounts
    // ============================================================================

    /// Register a Year 2 / Semester 1 student; returns `(internal id, token)`.
    pub async fn register(&self, student_id: &str) -> (String, String) {
        // ---
        let (status, body) = self
            .post(
                "/api/user/register",
                None,
                json!({
                    "studentId": student_id,
                    "password": "secret",
                    "year": "Year 2",
                    "semester": "Semester 1",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["user"]["id"].as_str().expect("user id").to_string(),
            body["token"].as_str().expect("token").to_string(),
        )
    }

    pub async fn admin_token(&self) -> String {
        // ---
        let (status, body) = self
            .post(
                "/api/user/login",
                None,
                json!({ "studentId": ADMIN_ID, "password": ADMIN_PASSWORD, "isAdmin": true }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }
}
