//! Integration tests for login and password changes.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;

use domain::{Password, RecordId};
use support::{TestApp, SUPER_EMAIL, WOLDIA};

const INITIAL_PASSWORD: &str = "Initial#2024";

#[tokio::test]
async fn login_returns_bearer_token() {
    let app = TestApp::spawn().await;
    app.create_admin("A", "a@x.com", WOLDIA).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "A@X.com", "password": INITIAL_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["requirePasswordChange"], true);
    assert!(body["accessToken"].as_str().is_some());
}

#[tokio::test]
async fn failed_logins_are_counted_and_reset() {
    let app = TestApp::spawn().await;
    let id = app.create_admin("A", "a@x.com", WOLDIA).await;
    let id = RecordId::parse(&id, "admin").unwrap();

    for _ in 0..2 {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "a@x.com", "password": "wrong-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }
    assert_eq!(app.store.account(&id).await.unwrap().failed_login_attempts, 2);

    app.login("a@x.com", INITIAL_PASSWORD).await;
    assert_eq!(app.store.account(&id).await.unwrap().failed_login_attempts, 0);
}

#[tokio::test]
async fn unknown_email_is_unauthorized() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ghost@x.com", "password": "whatever1" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inactive_admin_cannot_log_in() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .call(
            Method::POST,
            "/api/super/admins",
            Some(json!({
                "name": "A",
                "email": "a@x.com",
                "password": INITIAL_PASSWORD,
                "university": WOLDIA,
                "status": "Inactive",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": INITIAL_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User is inactive");
}

#[tokio::test]
async fn change_password_clears_flag_and_syncs_memberships() {
    let app = TestApp::spawn().await;
    let id = app.create_admin("A", "a@x.com", WOLDIA).await;
    app.call(
        Method::PATCH,
        &format!("/api/super/admins/{id}"),
        Some(json!({ "university": WOLDIA })),
    )
    .await;
    let token = app.login("a@x.com", INITIAL_PASSWORD).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/change-password",
            Some(&token),
            Some(json!({ "currentPassword": INITIAL_PASSWORD, "newPassword": "Brand-new-42" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");

    let account = app
        .store
        .account(&RecordId::parse(&id, "admin").unwrap())
        .await
        .unwrap();
    assert!(!account.require_password_change);
    for link in app.store.memberships_for("a@x.com").await {
        assert!(Password::from_hash(link.password_hash).verify("Brand-new-42"));
    }

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "Brand-new-42" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requirePasswordChange"], false);
}

#[tokio::test]
async fn change_password_checks_current_password() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "not-it-at-all", "newPassword": "Brand-new-42" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is incorrect");

    // Old password still works
    app.login(SUPER_EMAIL, support::SUPER_PASSWORD).await;
}

#[tokio::test]
async fn change_password_requires_a_token() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/change-password",
            None,
            Some(json!({ "currentPassword": "whatever1", "newPassword": "Brand-new-42" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
