//! HTTP-level integration tests for the course resource.
//!
//! Tests cover the public listing, admin-only mutations, the subscriber gate
//! on lecture reads, thumbnail staging and binding, and the orphan ledger
//! entries left by thumbnail replacement and course deletion.

mod common;

use axum::http::header::CACHE_CONTROL;
use axum::http::{Method, StatusCode};
use common::{
    add_lecture, admin_token, body_json, course_form, create_course, delete_auth, get, get_auth,
    get_with_cookie, lecture_form, multipart_request, subscriber_token, user_token, Form,
};
use lms_db::CourseStore;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";
const MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// The listing is public, uncached and omits lectures.
#[tokio::test]
async fn list_courses_is_public_and_uncached() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;
    add_lecture(&app, course["id"].as_i64().unwrap(), lecture_form("Intro")).await;

    let response = app.send(get("/api/v1/courses")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CACHE_CONTROL],
        "no-store, no-cache, must-revalidate, private"
    );
    let json = body_json(response).await;
    let courses = json["data"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Rust 101");
    assert_eq!(courses[0]["number_of_lectures"], 1);
    assert!(courses[0].get("lectures").is_none());
}

#[tokio::test]
async fn list_courses_empty() {
    let app = common::build_test_app();

    let json = body_json(app.send(get("/api/v1/courses")).await).await;

    assert_eq!(json["data"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Without a file the course gets the placeholder thumbnail.
#[tokio::test]
async fn create_course_without_thumbnail_uses_placeholder() {
    let app = common::build_test_app();

    let course = create_course(&app, course_form("Rust 101")).await;

    assert_eq!(course["title"], "Rust 101");
    assert_eq!(course["created_by"], "Jane Doe");
    assert_eq!(course["thumbnail"]["object_id"], "Dummy");
    assert_eq!(course["thumbnail"]["url"], "Dummy");
    assert_eq!(course["number_of_lectures"], 0);
    assert_eq!(course["lectures"], serde_json::json!([]));
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn create_course_with_thumbnail_binds_uploaded_image() {
    let app = common::build_test_app();

    let course = create_course(
        &app,
        course_form("Rust 101").file("thumbnail", "cover.PNG", PNG),
    )
    .await;

    let object_id = course["thumbnail"]["object_id"].as_str().unwrap();
    assert!(object_id.starts_with("lms/image/"));
    assert!(object_id.ends_with(".png"));
    assert_eq!(course["thumbnail"]["url"], format!("memory://{object_id}"));
    assert!(app.objects.contains(object_id).await);
    assert_eq!(app.objects.size_of(object_id).await, Some(PNG.len() as u64));
    assert_eq!(app.staged_file_count(), 0, "staged file must be removed");
}

#[tokio::test]
async fn create_course_accepts_camel_case_creator() {
    let app = common::build_test_app();
    let form = Form::new()
        .text("title", "Rust 101")
        .text("description", "Learn it properly")
        .text("category", "Programming")
        .text("createdBy", "Jane Doe");

    let course = create_course(&app, form).await;

    assert_eq!(course["created_by"], "Jane Doe");
}

#[tokio::test]
async fn create_course_requires_token() {
    let app = common::build_test_app();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            None,
            course_form("Rust 101"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    assert_eq!(app.courses.course_count().await, 0);
}

#[tokio::test]
async fn create_course_rejects_non_admin_before_staging() {
    let app = common::build_test_app();
    let token = user_token();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            course_form("Rust 101").file("thumbnail", "cover.png", PNG),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.courses.course_count().await, 0);
    assert!(app.objects.is_empty().await);
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn create_course_rejects_invalid_token() {
    let app = common::build_test_app();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some("not-a-jwt"),
            course_form("Rust 101"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.courses.course_count().await, 0);
}

#[tokio::test]
async fn create_course_missing_field_returns_400() {
    let app = common::build_test_app();
    let token = admin_token();
    let form = Form::new()
        .text("title", "Rust 101")
        .text("description", "   ")
        .text("created_by", "Jane Doe")
        .file("thumbnail", "cover.png", PNG);

    let response = app
        .send(multipart_request(Method::POST, "/api/v1/courses", Some(&token), form))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("category"));
    assert!(message.contains("description"));
    assert_eq!(app.courses.course_count().await, 0);
    assert!(app.objects.is_empty().await);
    assert_eq!(app.staged_file_count(), 0);
}

/// A disallowed extension is rejected before anything is written.
#[tokio::test]
async fn create_course_rejects_unsupported_extension() {
    let app = common::build_test_app();
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            course_form("Rust 101").file("thumbnail", "notes.txt", b"plain text"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(app.courses.course_count().await, 0);
    assert!(app.objects.is_empty().await);
    assert_eq!(app.staged_file_count(), 0);
}

/// A file under a name the endpoint does not take is refused, and a
/// thumbnail already staged from the same form is discarded.
#[tokio::test]
async fn create_course_rejects_unexpected_file_field() {
    let app = common::build_test_app();
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            course_form("Rust 101")
                .file("thumbnail", "cover.png", PNG)
                .file("lecture", "intro.mp4", MP4),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("lecture"));
    assert_eq!(app.courses.course_count().await, 0);
    assert!(app.objects.is_empty().await);
    assert_eq!(app.staged_file_count(), 0);
}

/// An untouched file input arrives with an empty file name and means no file.
#[tokio::test]
async fn create_course_ignores_empty_file_part() {
    let app = common::build_test_app();

    let course = create_course(&app, course_form("Rust 101").file("lecture", "", b"")).await;

    assert_eq!(course["title"], "Rust 101");
    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn update_course_malformed_id_returns_json_400() {
    let app = common::build_test_app();
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            "/api/v1/courses/abc",
            Some(&token),
            Form::new().text("title", "Renamed"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn create_course_rejects_oversized_upload() {
    let app = common::build_test_app_with(|config| config.media.max_upload_bytes = 16);
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            course_form("Rust 101").file("thumbnail", "cover.png", &[0u8; 64]),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.courses.course_count().await, 0);
    assert_eq!(app.staged_file_count(), 0);
}

/// The course row survives a failed thumbnail upload with the placeholder.
#[tokio::test]
async fn create_course_upload_failure_keeps_placeholder_course() {
    let app = common::build_test_app();
    app.objects.set_fail_uploads(true);
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::POST,
            "/api/v1/courses",
            Some(&token),
            course_form("Rust 101").file("thumbnail", "cover.png", PNG),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "UPLOAD_ERROR");
    let courses = app.courses.list_summaries().await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].thumbnail.object_id, "Dummy");
    assert_eq!(app.staged_file_count(), 0);
}

// ---------------------------------------------------------------------------
// Lecture reads (subscriber gate)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn course_lectures_require_authentication() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;

    let response = app
        .send(get(&format!("/api/v1/courses/{}", course["id"])))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn course_lectures_forbidden_without_subscription() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;

    let response = app
        .send(get_auth(
            &format!("/api/v1/courses/{}", course["id"]),
            &user_token(),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn course_lectures_visible_to_subscriber_and_admin() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;
    let id = course["id"].as_i64().unwrap();
    add_lecture(&app, id, lecture_form("Intro")).await;
    add_lecture(&app, id, lecture_form("Ownership")).await;

    for token in [subscriber_token(), admin_token()] {
        let response = app
            .send(get_auth(&format!("/api/v1/courses/{id}"), &token))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let titles: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["Intro", "Ownership"]);
    }
}

/// The session cookie is accepted when no Authorization header is sent.
#[tokio::test]
async fn course_lectures_accept_token_cookie() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;

    let response = app
        .send(get_with_cookie(
            &format!("/api/v1/courses/{}", course["id"]),
            &subscriber_token(),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn course_lectures_unknown_course_returns_404() {
    let app = common::build_test_app();

    let response = app
        .send(get_auth("/api/v1/courses/999", &admin_token()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Only supplied, non-blank fields change.
#[tokio::test]
async fn update_course_merges_supplied_fields() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            &format!("/api/v1/courses/{}", course["id"]),
            Some(&token),
            Form::new().text("description", "Now with async").text("title", ""),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["title"], "Rust 101");
    assert_eq!(updated["description"], "Now with async");
    assert_eq!(updated["category"], "Programming");
    assert_eq!(updated["thumbnail"]["object_id"], "Dummy");
}

#[tokio::test]
async fn update_course_unknown_id_returns_404() {
    let app = common::build_test_app();
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            "/api/v1/courses/42",
            Some(&token),
            Form::new().text("title", "Anything"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_course_requires_admin() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;
    let token = subscriber_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            &format!("/api/v1/courses/{}", course["id"]),
            Some(&token),
            Form::new().text("title", "Hijacked"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let stored = app
        .courses
        .find_by_id(course["id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Rust 101");
}

/// Replacing a thumbnail keeps the old object and records it for cleanup.
#[tokio::test]
async fn update_course_thumbnail_records_replaced_object() {
    let app = common::build_test_app();
    let course = create_course(
        &app,
        course_form("Rust 101").file("thumbnail", "old.png", PNG),
    )
    .await;
    let old_object = course["thumbnail"]["object_id"].as_str().unwrap().to_string();
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            &format!("/api/v1/courses/{}", course["id"]),
            Some(&token),
            Form::new().file("thumbnail", "new.webp", PNG),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    let new_object = updated["thumbnail"]["object_id"].as_str().unwrap();
    assert_ne!(new_object, old_object);
    assert!(new_object.ends_with(".webp"));
    assert!(app.objects.contains(&old_object).await);

    let orphans = app.courses.list_orphans().await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].object_id, old_object);
    assert_eq!(orphans[0].reason, "replaced");
}

/// An uploaded thumbnail the save fails to reference goes to the ledger.
#[tokio::test]
async fn update_course_thumbnail_save_failure_records_orphan() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;
    app.courses.set_fail_saves(true);
    let token = admin_token();

    let response = app
        .send(multipart_request(
            Method::PUT,
            &format!("/api/v1/courses/{}", course["id"]),
            Some(&token),
            Form::new().file("thumbnail", "cover.jpg", PNG),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
    let orphans = app.courses.list_orphans().await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].reason, "save_failed");
    assert_eq!(orphans[0].resource_type, "image");
    assert!(app.objects.contains(&orphans[0].object_id).await);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_course_records_media_for_cleanup() {
    let app = common::build_test_app();
    let course = create_course(
        &app,
        course_form("Rust 101").file("thumbnail", "cover.png", PNG),
    )
    .await;
    let id = course["id"].as_i64().unwrap();
    add_lecture(&app, id, lecture_form("Intro").file("lecture", "intro.mp4", MP4)).await;
    add_lecture(&app, id, lecture_form("No video yet")).await;

    let response = app
        .send(delete_auth(&format!("/api/v1/courses/{id}"), &admin_token()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["deleted"], true);
    assert_eq!(app.courses.course_count().await, 0);

    let orphans = app.courses.list_orphans().await.unwrap();
    assert_eq!(orphans.len(), 2, "thumbnail and one bound video");
    assert!(orphans.iter().all(|o| o.reason == "course_deleted"));
    assert!(orphans.iter().all(|o| o.course_id == Some(id)));
    assert_eq!(app.objects.len().await, 2, "objects are retained");

    let response = app
        .send(get_auth(&format!("/api/v1/courses/{id}"), &admin_token()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_course_unknown_id_returns_404() {
    let app = common::build_test_app();

    let response = app
        .send(delete_auth("/api/v1/courses/7", &admin_token()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_course_requires_admin() {
    let app = common::build_test_app();
    let course = create_course(&app, course_form("Rust 101")).await;

    let response = app
        .send(delete_auth(
            &format!("/api/v1/courses/{}", course["id"]),
            &user_token(),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.courses.course_count().await, 1);
}
