//! Shared harness for HTTP integration tests.
//!
//! Builds the full application (CORS headers, trace middleware, probes, API
//! routes and the fallback) over in-memory document stores and the fixture
//! identity provider.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use casting_backend::Trace;
use casting_backend::domain::AccountService;
use casting_backend::domain::TRACE_ID_HEADER;
use casting_backend::domain::ports::FixtureIdentityProvider;
use casting_backend::inbound::http::health::{HealthState, live, ready};
use casting_backend::inbound::http::state::HttpState;
use casting_backend::inbound::http::{self, fallback};
use casting_backend::middleware::cors_headers;
use mockable::DefaultClock;
use serde_json::Value;

#[expect(
    dead_code,
    reason = "state builder include exposes startup wiring unused by these tests"
)]
#[path = "../../src/server/state_builders.rs"]
mod state_builders;

use state_builders::{Stores, build_http_state_with};

/// Status, headers of interest and JSON body of one response.
#[derive(Debug)]
pub struct Snapshot {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub allow_origin: Option<String>,
    pub body: Value,
}

/// Handler state over fresh in-memory stores and the fixture identity
/// provider.
pub fn memory_state() -> web::Data<HttpState> {
    build_http_state_with(
        Stores::memory(),
        Arc::new(AccountService::new(Arc::new(FixtureIdentityProvider::new()))),
        Arc::new(DefaultClock),
    )
}

/// Build the application over fresh in-memory stores.
pub async fn test_app()
-> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test_app_with(memory_state()).await
}

/// Build the application over existing handler state.
pub async fn test_app_with(
    http_state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    actix_test::init_service(
        App::new()
            .app_data(health_state)
            .app_data(http_state)
            .wrap(cors_headers())
            .wrap(Trace)
            .service(ready)
            .service(live)
            .configure(http::configure)
            .default_service(web::to(fallback)),
    )
    .await
}

fn header(response: &ServiceResponse<impl MessageBody>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

/// Send `request` and capture the response.
pub async fn send<S, B>(app: &S, request: actix_test::TestRequest) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let trace_id = header(&response, TRACE_ID_HEADER);
    let allow_origin = header(&response, "access-control-allow-origin");
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Snapshot {
        status,
        trace_id,
        allow_origin,
        body,
    }
}
