//! Shared helpers for API integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use trakker_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use trakker_api::auth::password::hash_password;
use trakker_api::config::{LogFormat, ServerConfig};
use trakker_api::router::build_app_router;
use trakker_api::state::AppState;
use trakker_core::types::DbId;
use trakker_db::models::template::{CreateTemplate, TemplateKind};
use trakker_db::models::user::CreateUser;
use trakker_db::repositories::{CompanyRepo, TemplateRepo, UserRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_body_bytes: 64 * 1024,
        log_format: LogFormat::Text,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router through the same builder `main.rs`
/// uses, so tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        request(Method::GET, uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(
        app,
        request(Method::POST, uri, None)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(
        app,
        request(Method::POST, uri, Some(token))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// POST a raw body with an explicit content type.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
    token: &str,
) -> Response {
    send(
        app,
        request(Method::POST, uri, Some(token))
            .header(CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap(),
    )
    .await
}

pub async fn post_form_auth(app: Router, uri: &str, body: &str, token: &str) -> Response {
    post_raw_auth(
        app,
        uri,
        "application/x-www-form-urlencoded",
        body.to_string(),
        token,
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        request(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// A seeded user together with a valid access token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: DbId,
    pub company_id: DbId,
    pub username: String,
    pub employee_id: String,
    pub token: String,
}

pub async fn seed_company(pool: &PgPool, name: &str) -> DbId {
    CompanyRepo::create(pool, name)
        .await
        .expect("company creation should succeed")
        .id
}

/// Create a user with [`TEST_PASSWORD`] and mint a token for it.
pub async fn seed_user(
    pool: &PgPool,
    company_id: DbId,
    username: &str,
    employee_id: &str,
) -> TestUser {
    let input = CreateUser {
        company_id,
        username: username.to_string(),
        employee_id: employee_id.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: "admin".to_string(),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");

    let subject = TokenSubject {
        user_id: user.id,
        company_id: user.company_id,
        username: &user.username,
        employee_id: &user.employee_id,
        role: &user.role,
    };
    let token = generate_access_token(&subject, &test_config().jwt).unwrap();

    TestUser {
        id: user.id,
        company_id: user.company_id,
        username: user.username,
        employee_id: user.employee_id,
        token,
    }
}

/// A fresh company with one user named `<name>-admin`.
pub async fn seed_tenant(pool: &PgPool, name: &str) -> TestUser {
    let company_id = seed_company(pool, name).await;
    seed_user(pool, company_id, &format!("{name}-admin"), &format!("{name}-emp-1")).await
}

pub fn level_structure() -> Value {
    json!([
        {
            "id": "level_info",
            "label": "Level information",
            "fields": [
                {"id": "level_name", "label": "Level", "type": "text", "is_required": true},
                {"id": "rank", "label": "Rank/Order", "type": "number"},
                {"id": "description", "label": "Description", "type": "textarea"}
            ]
        },
        {
            "id": "custom_fields",
            "fields": [{"id": "notes", "label": "Notes", "type": "text"}]
        }
    ])
}

pub fn scorecard_structure() -> Value {
    json!([
        {
            "id": "scorecard_info",
            "fields": [
                {"id": "objective", "label": "Objective", "type": "text"},
                {"id": "weight", "label": "Weight", "customize_field_label": "Weight (%)", "type": "number"}
            ]
        }
    ])
}

pub async fn seed_template(pool: &PgPool, kind: TemplateKind, company_id: DbId, structure: Value) -> DbId {
    let input = CreateTemplate {
        name: "Test template".to_string(),
        structure,
    };
    TemplateRepo::create(pool, kind, company_id, &input)
        .await
        .expect("template creation should succeed")
        .id
}

pub async fn seed_level_template(pool: &PgPool, company_id: DbId) -> DbId {
    seed_template(pool, TemplateKind::Level, company_id, level_structure()).await
}

pub async fn seed_scorecard_template(pool: &PgPool, company_id: DbId) -> DbId {
    seed_template(pool, TemplateKind::Scorecard, company_id, scorecard_structure()).await
}

/// Insert a level template under a fixed id.
pub async fn seed_level_template_with_id(pool: &PgPool, company_id: DbId, id: DbId) {
    sqlx::query("INSERT INTO level_templates (id, company_id, name, structure) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(company_id)
        .bind("Fixed template")
        .bind(level_structure())
        .execute(pool)
        .await
        .expect("template insert should succeed");
}
