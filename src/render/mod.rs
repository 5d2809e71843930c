//! JSON responses with an explicit status and vendor content type.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serialize `T` as the body of a response with the given status and media type.
#[derive(Debug)]
pub struct VendorJson<T>(pub StatusCode, pub &'static str, pub T);

impl<T: Serialize> IntoResponse for VendorJson<T> {
    fn into_response(self) -> Response {
        let VendorJson(status, media_type, value) = self;
        match serde_json::to_vec(&value) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(media_type))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Could not serialize response body");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}
