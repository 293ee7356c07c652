//! Tests for the casting job service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{MockCastingRepository, MockUserRepository, UserRepositoryError};
use crate::domain::{
    CASTING_PATCH_FIELDS, Email, ErrorCode, JobCategory, NewUserProfile, UserProfile, Username,
};
use crate::test_support::{MutableClock, fixture_timestamp};

type Service = CastingJobService<MockCastingRepository, MockUserRepository>;

fn service(casting: MockCastingRepository, users: MockUserRepository) -> Service {
    CastingJobService::new(
        Arc::new(casting),
        Arc::new(users),
        Arc::new(MutableClock::default()),
    )
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object")
}

fn talent() -> UserProfile {
    UserProfile::create(
        NewUserProfile::new(
            Username::new("talent").expect("username"),
            Email::new("talent@example.com").expect("email"),
        ),
        fixture_timestamp(),
    )
}

#[fixture]
fn job() -> CastingJob {
    let draft = NewCastingJob::new(UserId::random(), "Lead role").expect("draft");
    CastingJob::create(draft, fixture_timestamp())
}

fn users_with(profile: UserProfile) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(profile)));
    users
}

#[rstest]
#[tokio::test]
async fn create_job_stamps_identical_timestamps() {
    let mut casting = MockCastingRepository::new();
    casting.expect_insert().times(1).return_once(|_| Ok(()));

    let mut draft = NewCastingJob::new(UserId::random(), "Narrator").expect("draft");
    draft.category = Some(JobCategory::VoiceOver);
    let job = service(casting, MockUserRepository::new())
        .create_job(draft)
        .await
        .expect("created");

    assert_eq!(job.created_at, fixture_timestamp());
    assert_eq!(job.created_at, job.updated_at);
    assert_eq!(job.status, "open");
}

#[rstest]
#[tokio::test]
async fn apply_appends_application_and_records_applied_job(job: CastingJob) {
    let job_id = job.job_id;
    let user = talent();
    let user_id = user.id;

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting
        .expect_append_application()
        .withf(move |_, app, _| app.user_id == user_id && app.status == ApplicationStatus::Pending)
        .times(1)
        .returning(|_, _, _| Ok(CastingJob::create(
            NewCastingJob::new(UserId::random(), "ignored").expect("draft"),
            fixture_timestamp(),
        )));

    let mut users = users_with(user.clone());
    users
        .expect_append()
        .withf(move |id, list, entry, _| {
            *id == user_id
                && *list == UserList::AppliedJobs
                && entry.field_str("jobId") == Some(job_id.to_string().as_str())
        })
        .times(1)
        .return_once(move |_, _, _, _| Ok(user));

    let application = service(casting, users)
        .apply(&job_id, &user_id, fields(json!({ "coverLetter": "Hire me" })))
        .await
        .expect("applied");
    assert_eq!(application.fields.get("coverLetter"), Some(&json!("Hire me")));
}

#[rstest]
#[tokio::test]
async fn applying_twice_conflicts_without_writing(mut job: CastingJob) {
    let user = talent();
    let user_id = user.id;
    job.applications
        .push(Application::submit(user_id, Map::new(), fixture_timestamp()));
    let job_id = job.job_id;

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting.expect_append_application().times(0);

    let err = service(casting, users_with(user))
        .apply(&job_id, &user_id, Map::new())
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn applying_as_unknown_user_is_not_found(job: CastingJob) {
    let job_id = job.job_id;
    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(casting, users)
        .apply(&job_id, &UserId::random(), Map::new())
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn applied_job_failures_do_not_fail_the_application(job: CastingJob) {
    let job_id = job.job_id;
    let stored = job.clone();
    let user = talent();
    let user_id = user.id;

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting
        .expect_append_application()
        .return_once(move |_, _, _| Ok(stored));
    let mut users = users_with(user);
    users
        .expect_append()
        .return_once(|_, _, _, _| Err(UserRepositoryError::query("throttled")));

    let result = service(casting, users)
        .apply(&job_id, &user_id, Map::new())
        .await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn removing_an_unknown_document_leaves_the_list_alone(mut job: CastingJob) {
    job.documents.push(ListEntry::new(
        fields(json!({ "name": "Sides", "url": "https://files.example/sides.pdf" })),
        fixture_timestamp(),
    ));
    let job_id = job.job_id;

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting.expect_replace_entries().times(0);

    let err = service(casting, MockUserRepository::new())
        .remove_document(&job_id, &Uuid::new_v4())
        .await
        .expect_err("unknown document");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn removing_a_document_rewrites_the_remaining_list(mut job: CastingJob) {
    let keep = ListEntry::new(fields(json!({ "name": "a", "url": "u1" })), fixture_timestamp());
    let drop = ListEntry::new(fields(json!({ "name": "b", "url": "u2" })), fixture_timestamp());
    let keep_id = keep.id;
    let drop_id = drop.id;
    job.documents = vec![keep, drop];
    let job_id = job.job_id;
    let stored = job.clone();

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting
        .expect_replace_entries()
        .withf(move |_, list, entries, _| {
            *list == JobList::Documents && entries.len() == 1 && entries[0].id == keep_id
        })
        .times(1)
        .return_once(move |_, _, _, _| Ok(stored));

    service(casting, MockUserRepository::new())
        .remove_document(&job_id, &drop_id)
        .await
        .expect("removed");
}

#[rstest]
#[tokio::test]
async fn documents_need_a_name_and_url(job: CastingJob) {
    let mut casting = MockCastingRepository::new();
    casting.expect_append_entry().times(0);

    let err = service(casting, MockUserRepository::new())
        .add_document(&job.job_id, fields(json!({ "name": "Script" })))
        .await
        .expect_err("missing url");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn status_updates_rewrite_the_matching_application(mut job: CastingJob) {
    let app = Application::submit(UserId::random(), Map::new(), fixture_timestamp());
    let app_id = app.id;
    job.applications.push(app);
    let job_id = job.job_id;
    let stored = job.clone();

    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting
        .expect_replace_applications()
        .withf(move |_, apps, _| apps.len() == 1 && apps[0].status == ApplicationStatus::Shortlisted)
        .times(1)
        .return_once(move |_, _, _| Ok(stored));

    let updated = service(casting, MockUserRepository::new())
        .update_application_status(&job_id, &app_id, ApplicationStatus::Shortlisted)
        .await
        .expect("updated");
    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
}

#[rstest]
#[tokio::test]
async fn status_updates_for_unknown_applications_are_not_found(job: CastingJob) {
    let job_id = job.job_id;
    let mut casting = MockCastingRepository::new();
    casting
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(job)));
    casting.expect_replace_applications().times(0);

    let err = service(casting, MockUserRepository::new())
        .update_application_status(&job_id, &Uuid::new_v4(), ApplicationStatus::Rejected)
        .await
        .expect_err("unknown application");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn updates_of_missing_jobs_are_not_found() {
    let mut casting = MockCastingRepository::new();
    casting
        .expect_update_fields()
        .return_once(|id, _, _| Err(CastingRepositoryError::not_found(id.to_string())));

    let patch = FieldPatch::from_body(fields(json!({ "status": "closed" })), CASTING_PATCH_FIELDS)
        .expect("patch");
    let err = service(casting, MockUserRepository::new())
        .update_job(&JobId::random(), patch)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn search_filters_scanned_pages(job: CastingJob) {
    let mut theatre = job.clone();
    theatre.category = Some(JobCategory::Theatre);
    let mut casting = MockCastingRepository::new();
    casting.expect_list().times(1).return_once(move |_| {
        Ok(Page {
            items: vec![job, theatre],
            next: None,
        })
    });

    let search = CastingSearch::new(
        None,
        Some(JobCategory::Theatre),
        None,
        None,
        PageLimit::default(),
    )
    .expect("criteria");
    let found = service(casting, MockUserRepository::new())
        .search_jobs(search)
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, Some(JobCategory::Theatre));
}
