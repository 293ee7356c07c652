//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use casting_backend::Trace;
#[cfg(debug_assertions)]
use casting_backend::doc::ApiDoc;
use casting_backend::inbound::http::health::{HealthState, live, ready};
use casting_backend::inbound::http::state::HttpState;
use casting_backend::inbound::http::{self, fallback};
use casting_backend::middleware::cors_headers;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors_headers())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(fallback))
}

/// Construct an Actix HTTP server over prepared handler state.
///
/// # Parameters
/// - `health_state`: shared probe state, marked ready once the listener binds.
/// - `http_state`: services built by [`build_http_state`].
/// - `config`: bind address and optional metrics middleware.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(actix_web::middleware::Condition::from_option(
            prometheus.clone(),
        ));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{Method, StatusCode};
    use actix_web::test as actix_test;
    use casting_backend::domain::TRACE_ID_HEADER;
    use casting_backend::domain::ports::FixtureIdentityProvider;
    use casting_backend::domain::AccountService;
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::state_builders::{Stores, build_http_state_with};

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state_with(
                Stores::memory(),
                Arc::new(AccountService::new(Arc::new(FixtureIdentityProvider::new()))),
                Arc::new(DefaultClock),
            ),
        }
    }

    #[rstest]
    #[case(Method::GET, "/health/ready", StatusCode::OK)]
    #[case(Method::GET, "/users", StatusCode::OK)]
    #[case(Method::GET, "/casting", StatusCode::OK)]
    #[case(Method::OPTIONS, "/casting", StatusCode::NO_CONTENT)]
    #[case(Method::GET, "/nowhere", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn every_response_carries_cors_and_trace_headers(
        #[case] method: Method,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(build_app(deps())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::default()
                .method(method)
                .uri(uri)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-origin")
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
        assert!(headers.contains_key(TRACE_ID_HEADER));
    }
}
