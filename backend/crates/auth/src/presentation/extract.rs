//! Request body extractor
//!
//! Malformed or mistyped JSON answers 400 with a problem body.

use axum::extract::FromRequest;

use crate::error::AuthError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct ApiJson<T>(pub T);
