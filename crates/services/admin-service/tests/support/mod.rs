//! Shared helpers for API integration tests.
//!
//! Each test gets a fresh router over the in-memory store with one
//! super-admin already seeded.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use admin_service_lib::api::{create_router, AppState};
use admin_service_lib::repository::MemoryAdminStore;
use admin_service_lib::service::{AdminManager, AdminService};
use common::JwtConfig;

pub const SUPER_EMAIL: &str = "root@wldu.edu.et";
pub const SUPER_PASSWORD: &str = "super-secret-1";
pub const WOLDIA: &str = "Woldia University";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAdminStore>,
    pub token: String,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-testing-only-32chars".to_string(),
        expiration_hours: 1,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryAdminStore::new());
        AdminManager::new(store.clone())
            .seed_super_admin(
                "Root".to_string(),
                SUPER_EMAIL.to_string(),
                SUPER_PASSWORD.to_string(),
            )
            .await
            .expect("seed super-admin");

        let router = create_router(AppState::from_repository(store.clone(), jwt_config()));
        let mut app = Self {
            router,
            store,
            token: String::new(),
        };
        app.token = app.login(SUPER_EMAIL, SUPER_PASSWORD).await;
        app
    }

    /// Log in and return the access token, panicking on failure
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Request as the seeded super-admin
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.token), body).await
    }

    /// Create an admin through the API and return its id
    pub async fn create_admin(&self, name: &str, email: &str, university: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/super/admins",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "Initial#2024",
                    "university": university,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["id"].as_str().expect("id").to_string()
    }
}
