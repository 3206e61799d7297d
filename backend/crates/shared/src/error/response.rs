//! RFC 7807 rendering of [`AppError`]

use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::app_error::AppError;
use super::kind::ErrorKind;

/// Problem Details body (`application/problem+json`)
#[derive(Debug, Serialize)]
pub struct ProblemDetails<'a> {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: &'static str,
    pub status: u16,
    pub code: ErrorKind,
    pub detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
}

impl<'a> From<&'a AppError> for ProblemDetails<'a> {
    fn from(err: &'a AppError) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", err.status_code()),
            title: err.kind().title(),
            status: err.status_code(),
            code: err.kind(),
            detail: err.message(),
            action: err.action(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(ProblemDetails::from(&self))).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        for &(name, value) in self.headers() {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value))
            {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}
