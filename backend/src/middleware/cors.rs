//! Fixed CORS header set attached to every response.

use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use actix_web::middleware::DefaultHeaders;

/// Origins allowed to call the API.
pub const ALLOW_ORIGIN: &str = "*";
/// Request headers browsers may send.
pub const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
/// Methods the API answers.
pub const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Middleware adding the CORS headers unless a handler already set them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use casting_backend::middleware::cors_headers;
///
/// let _app = App::new().wrap(cors_headers());
/// ```
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .add((ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .add((ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
}
