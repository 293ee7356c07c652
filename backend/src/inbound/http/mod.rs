//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod casting;
pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::Error;
pub use error::ApiResult;

/// Register the JSON error handlers for malformed bodies, queries and paths.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler));
}

/// Register every API route together with the extractor error handlers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use casting_backend::inbound::http;
///
/// let _app = App::new().configure(http::configure).default_service(actix_web::web::to(http::fallback));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);
    users::configure(cfg);
    casting::configure(cfg);
    auth::configure(cfg);
}

/// Answer CORS preflights and report unknown routes in the error envelope.
pub async fn fallback(req: HttpRequest) -> ApiResult<HttpResponse> {
    if req.method() == Method::OPTIONS {
        return Ok(HttpResponse::NoContent().finish());
    }
    Err(Error::not_found(format!(
        "no route for {} {}",
        req.method(),
        req.path()
    )))
}
