//! HTTP-level integration tests for login and the bearer-token gate.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;
use trakker_db::repositories::UserRepo;

const LOGIN: &str = "/api/users/login";

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let user = common::seed_tenant(&pool, "acme").await;
    let app = common::build_test_app(pool);

    let body = json!({"username": "acme-admin", "password": TEST_PASSWORD});
    let response = post_json(app.clone(), LOGIN, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["employee_id"], "acme-emp-1");
    assert_eq!(json["data"]["user"]["company_id"], user.company_id);
    assert!(json["data"]["user"].get("password_hash").is_none());

    // The issued token opens protected routes.
    let token = json["data"]["token"].as_str().unwrap();
    let response = get_auth(app, "/api/scorecards/tableHeaders", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::seed_tenant(&pool, "acme").await;
    let app = common::build_test_app(pool);

    let body = json!({"username": "acme-admin", "password": "incorrect_password"});
    let response = post_json(app, LOGIN, body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({"username": "ghost", "password": "whatever"});
    let response = post_json(app, LOGIN, body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_deleted_user(pool: PgPool) {
    let user = common::seed_tenant(&pool, "acme").await;
    UserRepo::soft_delete(&pool, user.id).await.unwrap();
    let app = common::build_test_app(pool);

    let body = json!({"username": "acme-admin", "password": TEST_PASSWORD});
    let response = post_json(app, LOGIN, body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_missing_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    for body in [
        json!({"username": "acme-admin"}),
        json!({"password": TEST_PASSWORD}),
        json!({"username": ["acme-admin"], "password": {"$ne": ""}}),
    ] {
        let response = post_json(app.clone(), LOGIN, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Username and password are required");
    }
}

// ---------------------------------------------------------------------------
// Bearer gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/role-levels/tableHeaders").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Unauthorized access"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/role-levels/getRoleLevels",
        json!({}),
        "not-a-real-token",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Unauthorized access"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_bearer_scheme_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .uri("/api/scorecards/getScorecardData")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
