//! Tests for the user profile service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{ContinuationKey, Email, ErrorCode, USER_PATCH_FIELDS, UserSearchType};
use crate::test_support::{MutableClock, fixture_timestamp};

fn profile(username: &str) -> UserProfile {
    UserProfile::create(
        NewUserProfile::new(
            Username::new(username).expect("username"),
            Email::new(format!("{username}@example.com")).expect("email"),
        ),
        fixture_timestamp(),
    )
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

fn service(repo: MockUserRepository) -> UserProfileService<MockUserRepository> {
    UserProfileService::new(Arc::new(repo), Arc::new(MutableClock::default()))
}

#[fixture]
fn ada() -> UserProfile {
    profile("ada")
}

#[rstest]
#[tokio::test]
async fn create_profile_rejects_taken_username(ada: UserProfile) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(Some(ada)));
    repo.expect_insert().times(0);

    let draft = NewUserProfile::new(
        Username::new("ada").expect("username"),
        Email::new("other@example.com").expect("email"),
    );
    let err = service(repo)
        .create_profile(draft)
        .await
        .expect_err("duplicate username");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.details(), Some(&json!({ "field": "username" })));
}

#[rstest]
#[tokio::test]
async fn create_profile_persists_fresh_profile() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .withf(|p| p.view == 0 && p.username.as_ref() == "x")
        .times(1)
        .return_once(|_| Ok(()));

    let draft = NewUserProfile::new(
        Username::new("x").expect("username"),
        Email::new("x@y.com").expect("email"),
    );
    let created = service(repo)
        .create_profile(draft)
        .await
        .expect("profile created");

    assert_eq!(created.created_at, fixture_timestamp());
    assert_eq!(created.created_at, created.updated_at);
}

#[rstest]
#[tokio::test]
async fn insert_conflicts_surface_as_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().return_once(|_| Ok(None));
    repo.expect_insert()
        .return_once(|p| Err(UserRepositoryError::conflict(p.id.to_string())));

    let draft = NewUserProfile::new(
        Username::new("x").expect("username"),
        Email::new("x@y.com").expect("email"),
    );
    let err = service(repo).create_profile(draft).await.expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn renaming_to_own_username_is_allowed(ada: UserProfile) {
    let id = ada.id;
    let updated = ada.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(Some(ada)));
    repo.expect_update_fields()
        .times(1)
        .return_once(move |_, _, _| Ok(updated));

    let patch = FieldPatch::from_body(fields(json!({ "username": "ada" })), USER_PATCH_FIELDS)
        .expect("patch");
    let result = service(repo).update_profile(&id, patch).await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn renaming_to_another_users_username_conflicts(ada: UserProfile) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(Some(ada)));
    repo.expect_update_fields().times(0);

    let patch = FieldPatch::from_body(fields(json!({ "username": "ada" })), USER_PATCH_FIELDS)
        .expect("patch");
    let err = service(repo)
        .update_profile(&UserId::random(), patch)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn updates_without_username_skip_the_index() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_username().times(0);
    repo.expect_update_fields()
        .times(1)
        .return_once(|id, _, _| Err(UserRepositoryError::not_found(id.to_string())));

    let patch =
        FieldPatch::from_body(fields(json!({ "bio": "Actor" })), USER_PATCH_FIELDS).expect("patch");
    let err = service(repo)
        .update_profile(&UserId::random(), patch)
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn connection_failures_become_internal_errors_with_details() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Err(UserRepositoryError::connection("dial tcp: timeout")));

    let err = service(repo)
        .fetch_profile(&UserId::random())
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.details(), Some(&json!("dial tcp: timeout")));
}

#[rstest]
#[tokio::test]
async fn rejected_continuation_keys_are_validation_errors() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .return_once(|_| Err(UserRepositoryError::invalid_cursor("missing string attribute 'id'")));

    let request = PageRequest {
        limit: PageLimit::default(),
        after: Some(ContinuationKey::single("foo", "bar")),
    };
    let err = service(repo)
        .list_profiles(request)
        .await
        .expect_err("foreign key");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().map(|d| &d["code"]), Some(&json!("invalid_cursor")));
}

#[rstest]
#[tokio::test]
async fn work_experience_requires_a_title() {
    let mut repo = MockUserRepository::new();
    repo.expect_append().times(0);

    let err = service(repo)
        .add_work_experience(&UserId::random(), fields(json!({ "company": "Globe" })))
        .await
        .expect_err("missing title");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details(), Some(&json!({ "missing": ["title"] })));
}

#[rstest]
#[tokio::test]
async fn work_experience_is_appended_with_a_generated_id(ada: UserProfile) {
    let id = ada.id;
    let mut repo = MockUserRepository::new();
    repo.expect_append()
        .withf(|_, list, entry, _| {
            *list == UserList::WorkExperience && entry.field_str("title") == Some("Macbeth")
        })
        .times(1)
        .return_once(move |_, _, entry, _| {
            let mut stored = ada;
            stored.work_experience.push(entry.clone());
            Ok(stored)
        });

    let appended = service(repo)
        .add_work_experience(&id, fields(json!({ "title": "Macbeth", "id": "mine" })))
        .await
        .expect("appended");
    assert_eq!(appended.profile.work_experience.len(), 1);
    assert_eq!(appended.profile.work_experience[0].id, appended.entry.id);
    assert_ne!(appended.entry.id.to_string(), "mine");
}

#[rstest]
#[tokio::test]
async fn users_cannot_connect_to_themselves(ada: UserProfile) {
    let repo = MockUserRepository::new();
    let err = service(repo)
        .add_connection(&ada.id, &ada.id, Map::new())
        .await
        .expect_err("self connection");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn duplicate_connections_conflict(ada: UserProfile) {
    let other = profile("grace");
    let other_id = other.id;
    let mut connected = ada.clone();
    connected.connections.push(ListEntry::new(
        fields(json!({ "userId": other_id.to_string() })),
        fixture_timestamp(),
    ));

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(2).returning(move |id| {
        Ok(Some(if *id == other_id {
            other.clone()
        } else {
            connected.clone()
        }))
    });
    repo.expect_append().times(0);

    let err = service(repo)
        .add_connection(&ada.id, &other_id, Map::new())
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn connection_requests_write_both_profiles_with_one_id(ada: UserProfile) {
    let receiver = profile("grace");
    let sender_id = ada.id;
    let receiver_id = receiver.id;
    let sender_copy = ada.clone();
    let receiver_copy = receiver.clone();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().times(2).returning(move |id| {
        Ok(Some(if *id == receiver_id {
            receiver_copy.clone()
        } else {
            sender_copy.clone()
        }))
    });
    let written = Arc::new(std::sync::Mutex::new(Vec::new()));
    let log = Arc::clone(&written);
    repo.expect_append()
        .times(2)
        .returning(move |id, list, entry, _| {
            log.lock()
                .expect("log lock")
                .push((*id, list, entry.clone()));
            Ok(ada.clone())
        });

    let sent = service(repo)
        .send_connection_request(&sender_id, &receiver_id, fields(json!({ "message": "Hi" })))
        .await
        .expect("request sent");

    let written = written.lock().expect("log lock");
    assert_eq!(written.len(), 2);
    let (first_id, first_list, first_entry) = &written[0];
    let (second_id, second_list, second_entry) = &written[1];
    assert_eq!((*first_id, *first_list), (sender_id, UserList::ConnectionRequestsSent));
    assert_eq!(
        (*second_id, *second_list),
        (receiver_id, UserList::ConnectionRequestsReceived)
    );
    assert_eq!(first_entry.id, second_entry.id);
    assert_eq!(sent.id, first_entry.id);
    assert_eq!(
        second_entry.field_str("fromUserId"),
        Some(sender_id.to_string().as_str())
    );
    assert_eq!(first_entry.field_str("status"), Some("pending"));
    assert_eq!(second_entry.field_str("message"), Some("Hi"));
}

#[rstest]
#[tokio::test]
async fn search_pages_through_the_table_until_the_limit_is_met() {
    let first_page = Page {
        items: vec![profile("stage_manager"), profile("grace")],
        next: Some(ContinuationKey::single("id", "cursor-1")),
    };
    let second_page = Page {
        items: vec![profile("stagehand"), profile("stage_door")],
        next: Some(ContinuationKey::single("id", "cursor-2")),
    };

    let mut repo = MockUserRepository::new();
    let mut seq = mockall::Sequence::new();
    repo.expect_list()
        .withf(|request| request.after.is_none() && request.limit == PageLimit::MAX)
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(first_page));
    repo.expect_list()
        .withf(|request| request.after.as_ref().and_then(|k| k.get_str("id")) == Some("cursor-1"))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(second_page));

    let search = UserSearch::new(
        "stage",
        UserSearchType::Username,
        PageLimit::new(2).expect("limit"),
    )
    .expect("search");
    let found = service(repo).search_profiles(search).await.expect("search");

    let names: Vec<_> = found.iter().map(|p| p.username.to_string()).collect();
    assert_eq!(names, vec!["stage_manager", "stagehand"]);
}

#[rstest]
#[tokio::test]
async fn search_stops_when_the_table_is_exhausted() {
    let mut repo = MockUserRepository::new();
    repo.expect_list().times(1).return_once(|_| {
        Ok(Page {
            items: vec![profile("grace")],
            next: None,
        })
    });

    let search =
        UserSearch::new("stage", UserSearchType::All, PageLimit::default()).expect("search");
    let found = service(repo).search_profiles(search).await.expect("search");
    assert!(found.is_empty());
}
