//! Success envelope shared by every JSON endpoint.
//!
//! Successful responses are `{success: true, message, ...payload}`; the
//! payload's fields sit next to `success` and `message` rather than under a
//! `data` key. Failures use the matching envelope rendered by
//! [`crate::inbound::http::error`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope around a payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true` for successful responses.
    #[schema(example = true)]
    pub success: bool,
    /// Human-readable summary of what happened.
    pub message: String,
    /// Endpoint-specific fields.
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `payload` with a success message.
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload,
        }
    }
}

/// Payload for endpoints that only report success.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct Empty {}

fn respond<T: Serialize>(status: StatusCode, message: &str, payload: T) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::new(message, payload))
}

/// `200 OK` with the success envelope.
pub fn ok<T: Serialize>(message: &str, payload: T) -> HttpResponse {
    respond(StatusCode::OK, message, payload)
}

/// `201 Created` with the success envelope.
pub fn created<T: Serialize>(message: &str, payload: T) -> HttpResponse {
    respond(StatusCode::CREATED, message, payload)
}
