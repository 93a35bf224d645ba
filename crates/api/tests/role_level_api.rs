//! HTTP-level integration tests for the `/role-levels` endpoints.

mod common;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use common::{body_json, get_auth, post_form_auth, post_json_auth, post_raw_auth, TestUser};
use serde_json::{json, Value};
use sqlx::PgPool;
use trakker_core::pagination::MAX_LIMIT;
use trakker_core::types::DbId;
use trakker_db::models::role_level::CreateRoleLevel;
use trakker_db::repositories::RoleLevelRepo;

const ADD: &str = "/api/role-levels/addRoleLevel";
const LIST: &str = "/api/role-levels/getRoleLevels";
const DETAILS: &str = "/api/role-levels/getRoleLevelDetails";
const EDIT: &str = "/api/role-levels/getEditRoleLevelDetail";
const UPDATE: &str = "/api/role-levels/updateRoleLevel";
const DELETE: &str = "/api/role-levels/deleteRoleLevel";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup(pool: &PgPool) -> (TestUser, DbId) {
    let user = common::seed_tenant(pool, "acme").await;
    let template_id = common::seed_level_template(pool, user.company_id).await;
    (user, template_id)
}

async fn add_level(
    app: Router,
    user: &TestUser,
    template_id: DbId,
    id: &str,
    name: &str,
    rank: i64,
) -> Response {
    let body = json!({
        "template_id": template_id,
        "roleLevelUniqueId": id,
        "answers": {"level_info": {"level_name": name, "rank": rank}}
    });
    post_json_auth(app, ADD, body, &user.token).await
}

async fn message(response: Response) -> String {
    body_json(response).await["message"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_role_level_success(pool: PgPool) {
    let user = common::seed_tenant(&pool, "acme").await;
    common::seed_level_template_with_id(&pool, user.company_id, 4001).await;
    let app = common::build_test_app(pool);

    let response = add_level(app, &user, 4001, "rl-test-1", "Test", 10).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Role level saved successfully");
    assert_eq!(json["data"]["level_unique_id"], "rl-test-1");
    assert!(json["data"]["answer_id"].is_i64());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_without_template_id_names_the_field(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "roleLevelUniqueId": "rl-1",
        "answers": {"level_info": {"level_name": "Test", "rank": 1}}
    });
    let response = post_json_auth(app, ADD, body, &user.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message(response).await.contains("template_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_without_unique_id(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "template_id": template_id,
        "answers": {"level_info": {"level_name": "Test"}}
    });
    let response = post_json_auth(app, ADD, body, &user.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message(response).await.contains("role level unique id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_rejects_bad_answers(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    for answers in [
        json!("invalid json string"),
        json!({"other_info": {"level_name": "x"}}),
        json!({"level_info": "flat"}),
        json!([1, 2, 3]),
        json!({"level_info": {"level_name": "  ", "rank": 1}}),
    ] {
        let body = json!({
            "template_id": template_id,
            "roleLevelUniqueId": "rl-bad",
            "answers": answers
        });
        let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(message(response).await.starts_with("Failed to save level"));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_accepts_string_encoded_answers(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "template_id": template_id.to_string(),
        "level_unique_id": "rl-str",
        "answers": r#"{"level_info": {"level_name": "Encoded", "rank": "4"}}"#
    });
    let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, DETAILS, json!({"level_unique_id": "rl-str"}), &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Encoded");
    assert_eq!(json["data"]["rank"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_via_form_body(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = format!(
        "template_id={template_id}&roleLevelUniqueId=rl-form&answers=\
         %7B%22level_info%22%3A%7B%22level_name%22%3A%22Form%22%2C%22rank%22%3A3%7D%7D"
    );
    let response = post_form_auth(app, ADD, &body, &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["level_unique_id"], "rl-form");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_rejects_unknown_or_foreign_template(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let other = common::seed_tenant(&pool, "globex").await;
    let foreign_template = common::seed_level_template(&pool, other.company_id).await;
    let app = common::build_test_app(pool);

    for template_id in [json!(999_999), json!(foreign_template), json!("abc")] {
        let body = json!({
            "template_id": template_id,
            "roleLevelUniqueId": "rl-1",
            "answers": {"level_info": {"level_name": "Test"}}
        });
        let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message(response).await, "Invalid template ID.");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_rejects_template_without_level_info(pool: PgPool) {
    let user = common::seed_tenant(&pool, "acme").await;
    let template_id = common::seed_template(
        &pool,
        trakker_db::models::template::TemplateKind::Level,
        user.company_id,
        common::scorecard_structure(),
    )
    .await;
    let app = common::build_test_app(pool);

    let response = add_level(app, &user, template_id, "rl-1", "Test", 1).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Invalid template ID.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_rejects_invalid_unique_id(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = add_level(app, &user, template_id, "../../etc/passwd", "Test", 1).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Invalid role level unique id");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_unique_id_conflicts(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let first = add_level(app.clone(), &user, template_id, "rl-dup", "One", 1).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = add_level(app, &user, template_id, "rl-dup", "Two", 2).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["success"], false);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_table_headers(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/role-levels/tableHeaders", &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!([
            {"id": "level", "label": "Level"},
            {"id": "rank/order", "label": "Rank/Order"}
        ])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_table_headers_without_template(pool: PgPool) {
    let user = common::seed_tenant(&pool, "acme").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/role-levels/tableHeaders", &user.token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(response).await, "No role levels template found.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_not_found(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({"level_unique_id": "NONEXISTENT_RL"});
    let response = post_json_auth(app, DETAILS, body, &user.token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(message(response).await.contains("not found"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_require_unique_id(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, DETAILS, json!({}), &user.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Missing level unique id");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_round_trip(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let answers = json!({
        "level_info": {"level_name": "Senior", "rank": 3, "description": "Owns a service"},
        "custom_fields": {"notes": "n/a", "extra": [1, 2]}
    });
    let body = json!({"template_id": template_id, "roleLevelUniqueId": "rl-rt", "answers": answers});
    let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app.clone(), DETAILS, json!({"level_unique_id": "rl-rt"}), &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["answers"], answers);
    assert_eq!(json["data"]["name"], "Senior");
    assert_eq!(json["data"]["rank"], 3);
    assert_eq!(json["data"]["fields"]["Level"], "Senior");
    assert_eq!(json["data"]["fields"]["Description"], "Owns a service");
    assert!(json["data"].get("structure").is_none());

    let response = post_json_auth(app, EDIT, json!({"level_unique_id": "rl-rt"}), &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["structure"], common::level_structure());
    assert_eq!(
        json["data"]["fields"]["level_info"],
        json!({"level_name": "Senior", "rank": 3, "description": "Owns a service"})
    );
    assert_eq!(json["data"]["fields"]["custom_fields"], json!({"notes": "n/a"}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_invalid_paging_uses_defaults(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);
    add_level(app.clone(), &user, template_id, "rl-1", "One", 1).await;

    let body = json!({"page": -1, "limit": 0});
    let response = post_json_auth(app, LIST, body, &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_sorts_and_searches(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);
    add_level(app.clone(), &user, template_id, "rl-a", "Senior Engineer", 3).await;
    add_level(app.clone(), &user, template_id, "rl-b", "Junior Engineer", 1).await;
    add_level(app.clone(), &user, template_id, "rl-c", "Staff Engineer", 2).await;

    let body = json!({"sortField": "rank/order", "sortOrder": "asc"});
    let response = post_json_auth(app.clone(), LIST, body, &user.token).await;
    let json = body_json(response).await;
    let ids: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["level_unique_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["rl-b", "rl-c", "rl-a"]);
    assert_eq!(json["data"][0]["fields"]["rank/order"], 1);
    assert_eq!(json["total"], 3);

    let body = json!({"search": "SENIOR"});
    let response = post_json_auth(app.clone(), LIST, body, &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "Senior Engineer");

    let body = json!({"search": "%"});
    let response = post_json_auth(app, LIST, body, &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_limit_is_capped(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    for i in 0..(MAX_LIMIT + 5) {
        let input = CreateRoleLevel {
            level_unique_id: format!("rl-{i}"),
            template_id,
            name: Some(format!("Level {i}")),
            rank: Some(i as i32),
            answers: json!({"level_info": {"level_name": format!("Level {i}"), "rank": i}}),
        };
        RoleLevelRepo::create(&pool, user.company_id, &input).await.unwrap();
    }
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, LIST, json!({"limit": 100_000}), &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len() as i64, MAX_LIMIT);
    assert_eq!(json["total"], MAX_LIMIT + 5);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_answers(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);
    let body = json!({
        "template_id": template_id,
        "roleLevelUniqueId": "rl-up",
        "answers": {"level_info": {"level_name": "Old", "rank": 1}, "custom_fields": {"notes": "x"}}
    });
    post_json_auth(app.clone(), ADD, body, &user.token).await;

    let new_answers = json!({"level_info": {"level_name": "New", "rank": 7}});
    let body = json!({"template_id": template_id, "level_unique_id": "rl-up", "answers": new_answers});
    let response = post_json_auth(app.clone(), UPDATE, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, DETAILS, json!({"level_unique_id": "rl-up"}), &user.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["answers"], new_answers);
    assert_eq!(json["data"]["name"], "New");
    assert_eq!(json["data"]["rank"], 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_validation(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({"level_unique_id": "rl-1", "answers": {"level_info": {}}});
    let response = post_json_auth(app.clone(), UPDATE, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message(response).await.contains("template_id"));

    let body = json!({
        "template_id": template_id,
        "level_unique_id": "missing",
        "answers": {"level_info": {"level_name": "X"}}
    });
    let response = post_json_auth(app, UPDATE, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_hides_record(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool.clone());
    add_level(app.clone(), &user, template_id, "rl-del", "Gone", 1).await;

    let response = post_json_auth(app.clone(), DELETE, json!({"role_level_id": "rl-del"}), &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message(response).await, "Role level deleted successfully");

    let response = post_json_auth(app.clone(), DETAILS, json!({"level_unique_id": "rl-del"}), &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(app.clone(), LIST, json!({}), &user.token).await;
    assert_eq!(body_json(response).await["total"], 0);

    // A second delete is a 404, never a 500.
    let response = post_json_auth(app, DELETE, json!({"level_unique_id": "rl-del"}), &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The row itself is kept.
    let deleted: bool = sqlx::query_scalar("SELECT deleted FROM role_levels WHERE level_unique_id = 'rl-del'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(deleted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_requires_id(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, DELETE, json!({}), &user.token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Missing role_level_id");
}

// ---------------------------------------------------------------------------
// Tenancy and hostile input
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_tenant_cannot_see_or_delete(pool: PgPool) {
    let (owner, template_id) = setup(&pool).await;
    let intruder = common::seed_tenant(&pool, "globex").await;
    let app = common::build_test_app(pool);
    add_level(app.clone(), &owner, template_id, "rl-private", "Private", 1).await;

    let body = json!({"level_unique_id": "rl-private"});
    let response = post_json_auth(app.clone(), DETAILS, body.clone(), &intruder.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(app.clone(), LIST, json!({}), &intruder.token).await;
    assert_eq!(body_json(response).await["total"], 0);

    let response = post_json_auth(app.clone(), DELETE, body.clone(), &intruder.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(app, DETAILS, body, &owner.token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_script_input_is_stored_escaped(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = add_level(
        app.clone(),
        &user,
        template_id,
        "rl-xss",
        "<script>alert('x')</script>",
        1,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, DETAILS, json!({"level_unique_id": "rl-xss"}), &user.token).await;
    let json = body_json(response).await;
    assert!(!json.to_string().contains("<script>"));
    assert_eq!(
        json["data"]["name"],
        "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_injection_strings_never_error(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);
    add_level(app.clone(), &user, template_id, "rl-1", "One", 1).await;

    let hostile: Vec<Value> = vec![
        json!({"search": "'; DROP TABLE role_levels; --"}),
        json!({"sort_field": "name; DROP TABLE role_levels", "sort_order": "asc; --"}),
        json!({"page": {"$gt": 0}, "limit": [1, 2], "search": ["x"]}),
    ];
    for body in hostile {
        let response = post_json_auth(app.clone(), LIST, body, &user.token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let text = body_json(response).await.to_string();
        assert!(!text.contains("SQL"));
    }

    let body = json!({"level_unique_id": "' OR '1'='1"});
    let response = post_json_auth(app, DETAILS, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_body_is_400(pool: PgPool) {
    let (user, _) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_raw_auth(app.clone(), ADD, "application/json", "{not json", &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(response).await, "Malformed request body");

    let response = post_raw_auth(app, ADD, "application/json", "[1, 2]", &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Rank conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rank_conflicts_are_reported(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);
    add_level(app.clone(), &user, template_id, "rl-a", "A", 1).await;
    add_level(app.clone(), &user, template_id, "rl-b", "B", 1).await;
    add_level(app.clone(), &user, template_id, "rl-c", "C", 2).await;

    let response = get_auth(app, "/api/role-levels/checkRankConflicts", &user.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["has_conflicts"], true);
    assert_eq!(json["data"]["conflict_count"], 1);
    assert_eq!(json["data"]["conflicts"][0]["rank"], 1);
    assert_eq!(json["data"]["conflicts"][0]["count"], 2);
}

// ---------------------------------------------------------------------------
// Hostile input
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nul_characters_are_not_server_errors(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.clone(), LIST, json!({"search": "a\u{0}b"}), &user.token).await;
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.status(), StatusCode::OK);

    let response = add_level(app.clone(), &user, template_id, "rl-nul", "x\u{0}", 1).await;
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({
        "template_id": template_id,
        "roleLevelUniqueId": "rl-nul-2",
        "answers": {"level_info": {"level_name": "Lead", "rank": 2, "note\u{0}": "a\u{0}"}}
    });
    let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, DETAILS, json!({"level_unique_id": "rl-nul"}), &user.token).await;
    assert_eq!(body_json(response).await["data"]["name"], "x");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_markup_in_answer_keys_is_escaped(pool: PgPool) {
    let (user, template_id) = setup(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "template_id": template_id,
        "roleLevelUniqueId": "rl-keys",
        "answers": {"level_info": {"level_name": "Lead", "rank": 1, "<script>x</script>": "v"}}
    });
    let response = post_json_auth(app.clone(), ADD, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app.clone(), DETAILS, json!({"level_unique_id": "rl-keys"}), &user.token).await;
    let json = body_json(response).await;
    assert!(!json.to_string().contains("<script>"));
    assert_eq!(json["data"]["answers"]["level_info"]["&lt;script&gt;x&lt;/script&gt;"], "v");

    let body = json!({
        "template_id": template_id,
        "roleLevelUniqueId": "rl-group",
        "answers": {"level_info": {"level_name": "Lead"}, "<script>g</script>": "flat"}
    });
    let response = post_json_auth(app, ADD, body, &user.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = message(response).await;
    assert!(text.starts_with("Failed to save level"));
    assert!(!text.contains("<script>"));
}
