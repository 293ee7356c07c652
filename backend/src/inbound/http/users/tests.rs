//! Tests for user profile API handlers.

use super::*;
use crate::domain::ContinuationKey;
use crate::inbound::http::test_utils::memory_state;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

async fn call(
    request: actix_test::TestRequest,
    state: &web::Data<HttpState>,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(App::new().app_data(state.clone()).configure(configure))
        .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

async fn create(state: &web::Data<HttpState>, username: &str) -> Value {
    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "username": username, "email": format!("{username}@example.com") })),
        state,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["user"].clone()
}

fn id_of(user: &Value) -> String {
    user["id"].as_str().expect("id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn create_returns_fresh_profile_with_zero_views() {
    let state = memory_state();
    let user = create(&state, "x").await;

    assert_eq!(user["view"], json!(0));
    assert_eq!(user["createdAt"], user["updatedAt"]);
    assert_eq!(user["email"], json!("x@example.com"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_conflicts() {
    let state = memory_state();
    create(&state, "x").await;

    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "username": "x", "email": "other@example.com" })),
        &state,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("conflict"));
}

#[rstest]
#[case(json!({ "email": "a@b.com" }), "username")]
#[case(json!({ "username": "ada" }), "email")]
#[case(json!({ "username": "  ", "email": "a@b.com" }), "username")]
#[actix_web::test]
async fn create_requires_username_and_email(#[case] body: Value, #[case] field: &str) {
    let state = memory_state();
    let (status, body) = call(
        actix_test::TestRequest::post().uri("/users").set_json(body),
        &state,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], json!(field));
}

#[rstest]
#[actix_web::test]
async fn fetch_by_id_and_username() {
    let state = memory_state();
    let user = create(&state, "ada").await;
    let id = id_of(&user);

    let (status, body) = call(
        actix_test::TestRequest::get().uri(&format!("/users/{id}")),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], json!(id));

    let (status, body) = call(
        actix_test::TestRequest::get().uri("/users/username/ada"),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], json!(id));
    assert_eq!(body["message"], json!("User retrieved successfully"));
}

#[rstest]
#[case("/users/3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[case("/users/not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("/users/username/nobody", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn missing_or_malformed_ids(#[case] uri: &str, #[case] expected: StatusCode) {
    let state = memory_state();
    let (status, body) = call(actix_test::TestRequest::get().uri(uri), &state).await;

    assert_eq!(status, expected);
    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[actix_web::test]
async fn update_replaces_fields_and_rejects_empty_bodies() {
    let state = memory_state();
    let id = id_of(&create(&state, "ada").await);

    let (status, body) = call(
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "bio": "Stage actor", "view": 99 })),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["bio"], json!("Stage actor"));
    assert_eq!(body["user"]["view"], json!(0));

    let (status, body) = call(
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "unknown": true })),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("no valid fields to update"));
}

#[rstest]
#[actix_web::test]
async fn renaming_to_a_taken_username_conflicts() {
    let state = memory_state();
    create(&state, "ada").await;
    let id = id_of(&create(&state, "grace").await);

    let (status, _) = call(
        actix_test::TestRequest::put()
            .uri(&format!("/users/{id}"))
            .set_json(json!({ "username": "ada" })),
        &state,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn delete_then_fetch_is_not_found() {
    let state = memory_state();
    let id = id_of(&create(&state, "ada").await);

    let (status, body) = call(
        actix_test::TestRequest::delete().uri(&format!("/users/{id}")),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], json!(id));

    let (status, _) = call(
        actix_test::TestRequest::delete().uri(&format!("/users/{id}")),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn views_count_up_from_zero() {
    let state = memory_state();
    let id = id_of(&create(&state, "ada").await);

    for expected in 1..=2 {
        let (status, body) = call(
            actix_test::TestRequest::put().uri(&format!("/users/{id}/view")),
            &state,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["views"], json!(expected));
    }
}

#[rstest]
#[actix_web::test]
async fn work_experience_appends_one_entry_with_fresh_id() {
    let state = memory_state();
    let id = id_of(&create(&state, "ada").await);

    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri(&format!("/users/{id}/work-experience"))
            .set_json(json!({ "title": "Hamlet", "id": "spoofed" })),
        &state,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let entry = &body["workExperience"];
    assert_ne!(entry["id"], json!("spoofed"));
    assert_eq!(entry["title"], json!("Hamlet"));
    assert_eq!(body["user"]["workExperience"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn portfolio_requires_a_title() {
    let state = memory_state();
    let id = id_of(&create(&state, "ada").await);

    let (status, _) = call(
        actix_test::TestRequest::post()
            .uri(&format!("/users/{id}/portfolio"))
            .set_json(json!({ "url": "https://example.com/reel" })),
        &state,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn connections_reject_duplicates_and_missing_targets() {
    let state = memory_state();
    let ada = id_of(&create(&state, "ada").await);
    let grace = id_of(&create(&state, "grace").await);

    let (status, _) = call(
        actix_test::TestRequest::post()
            .uri(&format!("/users/{ada}/connections"))
            .set_json(json!({})),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let connect = || {
        actix_test::TestRequest::post()
            .uri(&format!("/users/{ada}/connections"))
            .set_json(json!({ "userId": grace }))
    };
    let (status, body) = call(connect(), &state).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["connection"]["userId"], json!(grace));

    let (status, _) = call(connect(), &state).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn connection_requests_land_on_both_profiles() {
    let state = memory_state();
    let ada = id_of(&create(&state, "ada").await);
    let grace = id_of(&create(&state, "grace").await);

    let (status, body) = call(
        actix_test::TestRequest::post()
            .uri(&format!("/users/{ada}/connection-requests"))
            .set_json(json!({ "toUserId": grace, "note": "Loved your reel" })),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let request_id = body["connectionRequest"]["id"].clone();

    let (_, body) = call(
        actix_test::TestRequest::get().uri(&format!("/users/{grace}")),
        &state,
    )
    .await;
    let received = &body["user"]["connectionRequestsReceived"][0];
    assert_eq!(received["id"], request_id);
    assert_eq!(received["fromUserId"], json!(ada));
    assert_eq!(received["note"], json!("Loved your reel"));
}

#[rstest]
#[actix_web::test]
async fn paging_visits_every_profile_once() {
    let state = memory_state();
    for name in ["a", "b", "c", "d", "e"] {
        create(&state, name).await;
    }

    let mut seen = Vec::new();
    let mut uri = "/users?limit=2".to_owned();
    loop {
        let (status, body) = call(actix_test::TestRequest::get().uri(&uri), &state).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let users = body["users"].as_array().expect("users");
        assert_eq!(body["count"], json!(users.len()));
        seen.extend(users.iter().map(|user| user["username"].clone()));
        match body["lastKey"].as_str() {
            Some(token) => uri = format!("/users?limit=2&lastKey={token}"),
            None => break,
        }
    }

    seen.sort_by_key(ToString::to_string);
    assert_eq!(seen, vec![json!("a"), json!("b"), json!("c"), json!("d"), json!("e")]);
}

#[rstest]
#[case("/users?limit=0")]
#[case("/users?limit=101")]
#[case("/users?lastKey=%25%25")]
#[actix_web::test]
async fn invalid_paging_parameters_are_rejected(#[case] uri: &str) {
    let state = memory_state();
    let (status, _) = call(actix_test::TestRequest::get().uri(uri), &state).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn well_formed_tokens_for_another_key_are_invalid_cursors() {
    let state = memory_state();
    create(&state, "ada").await;
    let token = ContinuationKey::single("foo", "bar").to_token().expect("token");

    let (status, body) = call(
        actix_test::TestRequest::get().uri(&format!("/users?lastKey={token}")),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!("lastKey"));
    assert_eq!(body["details"]["code"], json!("invalid_cursor"));
}

#[rstest]
#[actix_web::test]
async fn search_filters_by_type() {
    let state = memory_state();
    create(&state, "ada").await;
    create(&state, "grace").await;

    let (status, body) = call(
        actix_test::TestRequest::get().uri("/users/search?q=AD&type=username"),
        &state,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["users"][0]["username"], json!("ada"));
}

#[rstest]
#[case("/users/search")]
#[case("/users/search?q=ada&type=shoe-size")]
#[actix_web::test]
async fn search_rejects_missing_query_and_unknown_type(#[case] uri: &str) {
    let state = memory_state();
    let (status, _) = call(actix_test::TestRequest::get().uri(uri), &state).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
