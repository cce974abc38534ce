//! Uniform JSON envelope wrapping every API response.
//!
//! Successful responses carry `{"success": true, "data": ...}`; failures carry
//! `{"success": false, "error": {...}}` and are produced by the
//! [`actix_web::ResponseError`] implementation in [`super::error`].

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::domain::Error;

use super::ApiResult;

/// Success envelope.
///
/// # Examples
/// ```
/// use opsdesk::inbound::http::envelope::Envelope;
///
/// let body = serde_json::to_value(Envelope::ok(3)).unwrap();
/// assert_eq!(body, serde_json::json!({"success": true, "data": 3}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

/// Failure envelope borrowed from a domain error.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorEnvelope<'a> {
    success: bool,
    error: &'a Error,
}

impl<'a> ErrorEnvelope<'a> {
    pub(crate) fn new(error: &'a Error) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Handler result carrying an enveloped JSON body with status `200`.
pub type ApiResponse<T> = ApiResult<web::Json<Envelope<T>>>;

/// Wrap `data` in a `200 OK` envelope.
pub fn ok<T>(data: T) -> web::Json<Envelope<T>> {
    web::Json(Envelope::ok(data))
}

/// Wrap `data` in a `201 Created` envelope.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::ok(data))
}
