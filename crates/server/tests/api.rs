mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_submission, register_and_login, send, test_app};

#[tokio::test]
async fn health_reports_connected_database() {
    let (app, _media) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn register_login_me_flow() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@x.com");
    assert_eq!(body["role"], "student");
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (app, _media) = test_app().await;

    register_and_login(&app, "Alice", "alice@x.com", "student").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Impostor",
            "email": "alice@x.com",
            "password": "other-pw",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already registered.");
}

#[tokio::test]
async fn admin_role_cannot_be_self_assigned() {
    let (app, _media) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Eve",
            "email": "eve@x.com",
            "password": "pw",
            "role": "admin",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (app, _media) = test_app().await;

    register_and_login(&app, "Alice", "alice@x.com", "student").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "alice@x.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");
}

#[tokio::test]
async fn authenticated_routes_reject_missing_and_garbage_tokens() {
    let (app, _media) = test_app().await;

    let (status, _) = send(&app, "GET", "/api/submissions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "GET",
        "/api/submissions",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mentors_cannot_create_submissions() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Bob", "bob@x.com", "mentor").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&token),
        Some(json!({
            "title": "sort.py",
            "description": "",
            "code_content": "pass",
            "language": "python",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only students can create submissions.");
}

#[tokio::test]
async fn submission_starts_pending_with_its_tags() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let id = create_submission(&app, &token, "sort.py", "python", &["algorithms"]).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/submissions/{id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["tags"], json!(["algorithms"]));
    assert_eq!(body["title"], "sort.py");
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["reviews"], json!([]));
}

#[tokio::test]
async fn students_cannot_read_each_others_submissions() {
    let (app, _media) = test_app().await;

    let alice = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let bob = register_and_login(&app, "Bob", "bob@x.com", "student").await;
    let id = create_submission(&app, &alice, "sort.py", "python", &[]).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/submissions/{id}"),
        Some(&bob),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    // The body must not leak any submission content.
    assert!(body.get("code_content").is_none());

    let mentor = register_and_login(&app, "Mia", "mia@x.com", "mentor").await;
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/submissions/{id}"),
        Some(&mentor),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_submission_is_not_found() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;

    let (status, _) = send(
        &app,
        "GET",
        "/api/submissions/00000000-0000-4000-8000-000000000000",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_can_update_a_pending_submission() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let id = create_submission(&app, &token, "sort.py", "python", &[]).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/submissions/{id}"),
        Some(&token),
        Some(json!({"title": "quicksort.py"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "quicksort.py");
    assert_eq!(body["status"], "pending");

    let (_, detail) = send(
        &app,
        "GET",
        &format!("/api/submissions/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(detail["title"], "quicksort.py");
    // Fields that were not in the payload are untouched.
    assert_eq!(detail["language"], "python");
}

#[tokio::test]
async fn only_the_author_can_update_or_delete() {
    let (app, _media) = test_app().await;

    let alice = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let bob = register_and_login(&app, "Bob", "bob@x.com", "student").await;
    let id = create_submission(&app, &alice, "sort.py", "python", &[]).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/submissions/{id}"),
        Some(&bob),
        Some(json!({"title": "stolen"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/submissions/{id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn author_can_delete_a_pending_submission() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let id = create_submission(&app, &token, "sort.py", "python", &[]).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/submissions/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/submissions/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tags_are_created_once_and_shared() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    create_submission(&app, &token, "first.py", "python", &["algorithms", "sorting"]).await;
    create_submission(&app, &token, "second.py", "python", &["algorithms"]).await;

    let (status, body) = send(&app, "GET", "/api/tags", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("tags should be an array")
        .iter()
        .map(|tag| tag["name"].as_str().expect("tag name"))
        .collect();
    assert_eq!(names, vec!["algorithms", "sorting"]);
}

#[tokio::test]
async fn listing_paginates_and_reports_totals() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    for i in 0..5 {
        create_submission(&app, &token, &format!("sub-{i}.py"), "python", &[]).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/submissions?skip=0&limit=2",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["showing"], 2);
    assert_eq!(body["submissions"].as_array().expect("rows").len(), 2);

    let (_, last_page) = send(
        &app,
        "GET",
        "/api/submissions?skip=4&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(last_page["total"], 5);
    assert_eq!(last_page["page"], 3);
    assert_eq!(last_page["pages"], 3);
    assert_eq!(last_page["showing"], 1);
}

#[tokio::test]
async fn list_limit_is_clamped_to_the_allowed_range() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    for i in 0..3 {
        create_submission(&app, &token, &format!("sub-{i}.py"), "python", &[]).await;
    }

    // limit=500 behaves like limit=100.
    let (status, body) = send(
        &app,
        "GET",
        "/api/submissions?limit=500",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["showing"], 3);
    assert_eq!(body["pages"], 1);

    // limit=0 behaves like limit=1.
    let (_, body) = send(&app, "GET", "/api/submissions?limit=0", Some(&token), None).await;
    assert_eq!(body["showing"], 1);
    assert_eq!(body["pages"], 3);
}

#[tokio::test]
async fn listing_filters_by_language_and_status() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    create_submission(&app, &token, "sort.py", "python", &[]).await;
    create_submission(&app, &token, "sort.rs", "rust", &[]).await;

    let (_, body) = send(
        &app,
        "GET",
        "/api/submissions?language=rust",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["language"], "rust");

    let (_, body) = send(
        &app,
        "GET",
        "/api/submissions?status=pending",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(
        &app,
        "GET",
        "/api/submissions?status=reviewed",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 0);

    let (status, _) = send(
        &app,
        "GET",
        "/api/submissions?status=bogus",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_scoped_and_projected_per_role() {
    let (app, _media) = test_app().await;

    let alice = register_and_login(&app, "Alice", "alice@x.com", "student").await;
    let bob = register_and_login(&app, "Bob", "bob@x.com", "student").await;
    create_submission(&app, &alice, "alice.py", "python", &[]).await;
    create_submission(&app, &bob, "bob.py", "python", &[]).await;

    // Students only see their own rows, without an author object.
    let (_, body) = send(&app, "GET", "/api/submissions", Some(&alice), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["title"], "alice.py");
    assert!(body["submissions"][0].get("user").is_none());

    // Mentors see everything, with the author attached.
    let mentor = register_and_login(&app, "Mia", "mia@x.com", "mentor").await;
    let (_, body) = send(&app, "GET", "/api/submissions", Some(&mentor), None).await;
    assert_eq!(body["total"], 2);
    for row in body["submissions"].as_array().expect("rows") {
        assert!(row["user"]["name"].is_string());
    }
}

#[tokio::test]
async fn malformed_json_body_is_a_validation_error() {
    let (app, _media) = test_app().await;

    let token = register_and_login(&app, "Alice", "alice@x.com", "student").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/submissions",
        Some(&token),
        Some(json!({"title": "missing everything else"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
