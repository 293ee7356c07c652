//! Behaviour coverage for applying to casting calls and reviewing applicants.

use std::future::Future;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use casting_backend::inbound::http::state::HttpState;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

mod support;

use support::{Snapshot, memory_state, send, test_app_with};

struct World {
    state: web::Data<HttpState>,
    talent_id: Option<String>,
    job_id: Option<String>,
    application_id: Option<String>,
    last: Option<Snapshot>,
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

fn call(world: &World, request: actix_test::TestRequest) -> Snapshot {
    let state = world.state.clone();
    run_async(async move {
        let app = test_app_with(state).await;
        send(&app, request).await
    })
}

fn create_profile(world: &World, username: &str, user_type: &str) -> String {
    let snapshot = call(
        world,
        actix_test::TestRequest::post().uri("/users").set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "userType": user_type,
        })),
    );
    assert_eq!(snapshot.status, StatusCode::CREATED, "{}", snapshot.body);
    snapshot.body["user"]["id"]
        .as_str()
        .expect("user id")
        .to_owned()
}

fn job_uri(world: &World, suffix: &str) -> String {
    let job_id = world.job_id.as_deref().expect("job id");
    format!("/casting/{job_id}{suffix}")
}

fn apply(world: &mut World) {
    let talent_id = world.talent_id.clone().expect("talent id");
    let snapshot = call(
        world,
        actix_test::TestRequest::post()
            .uri(&job_uri(world, "/apply"))
            .set_json(json!({ "userId": talent_id, "coverLetter": "Available all summer" })),
    );
    if world.application_id.is_none() {
        world.application_id = snapshot.body["application"]["id"]
            .as_str()
            .map(ToOwned::to_owned);
    }
    world.last = Some(snapshot);
}

fn applications(world: &World) -> Value {
    let snapshot = call(
        world,
        actix_test::TestRequest::get().uri(&job_uri(world, "/applications")),
    );
    assert_eq!(snapshot.status, StatusCode::OK, "{}", snapshot.body);
    snapshot.body
}

#[fixture]
fn world() -> World {
    World {
        state: memory_state(),
        talent_id: None,
        job_id: None,
        application_id: None,
        last: None,
    }
}

#[given("a recruiter with an open casting call")]
fn a_recruiter_with_an_open_casting_call(world: &mut World) {
    let recruiter_id = create_profile(world, "rita", "recruiter");
    let snapshot = call(
        world,
        actix_test::TestRequest::post().uri("/casting").set_json(json!({
            "recruiterId": recruiter_id,
            "title": "Lead in a period drama",
            "category": "television",
            "jobType": "contract",
            "location": "Manchester",
        })),
    );
    assert_eq!(snapshot.status, StatusCode::CREATED, "{}", snapshot.body);
    assert_eq!(snapshot.body["job"]["status"], json!("open"));
    world.job_id = snapshot.body["job"]["jobId"].as_str().map(ToOwned::to_owned);
}

#[given("a registered talent profile")]
fn a_registered_talent_profile(world: &mut World) {
    world.talent_id = Some(create_profile(world, "tom", "talent"));
}

#[when("the talent applies to the casting call")]
fn the_talent_applies_to_the_casting_call(world: &mut World) {
    apply(world);
    let snapshot = world.last.as_ref().expect("apply response");
    assert_eq!(snapshot.status, StatusCode::CREATED, "{}", snapshot.body);
}

#[when("the talent applies to the casting call again")]
fn the_talent_applies_to_the_casting_call_again(world: &mut World) {
    apply(world);
}

#[when("the recruiter shortlists the application")]
fn the_recruiter_shortlists_the_application(world: &mut World) {
    let application_id = world.application_id.clone().expect("application id");
    let snapshot = call(
        world,
        actix_test::TestRequest::put()
            .uri(&job_uri(
                world,
                &format!("/applications/{application_id}/status"),
            ))
            .set_json(json!({ "status": "shortlisted" })),
    );
    assert_eq!(snapshot.status, StatusCode::OK, "{}", snapshot.body);
    world.last = Some(snapshot);
}

#[then("the application is listed as shortlisted")]
fn the_application_is_listed_as_shortlisted(world: &mut World) {
    let body = applications(world);
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["applications"][0]["status"], json!("shortlisted"));
    assert_eq!(
        body["applications"][0]["userId"].as_str(),
        world.talent_id.as_deref()
    );
}

#[then("the talent profile records the applied job")]
fn the_talent_profile_records_the_applied_job(world: &mut World) {
    let talent_id = world.talent_id.as_deref().expect("talent id");
    let snapshot = call(
        world,
        actix_test::TestRequest::get().uri(&format!("/users/{talent_id}")),
    );
    assert_eq!(snapshot.status, StatusCode::OK);
    assert_eq!(
        snapshot.body["user"]["appliedJobs"][0]["jobId"].as_str(),
        world.job_id.as_deref()
    );
}

#[then("the second application is rejected as a conflict")]
fn the_second_application_is_rejected_as_a_conflict(world: &mut World) {
    let snapshot = world.last.as_ref().expect("apply response");
    assert_eq!(snapshot.status, StatusCode::CONFLICT);
    assert_eq!(snapshot.body["code"], json!("conflict"));
}

#[then("the casting call lists one application")]
fn the_casting_call_lists_one_application(world: &mut World) {
    assert_eq!(applications(world)["count"], json!(1));
}

#[scenario(
    path = "tests/features/casting_applications.feature",
    name = "Talent applies and is shortlisted"
)]
fn talent_applies_and_is_shortlisted(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/casting_applications.feature",
    name = "Applying twice is rejected"
)]
fn applying_twice_is_rejected(world: World) {
    drop(world);
}
