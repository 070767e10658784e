use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` with rejections reported as [`ApiError::MalformedPayload`].
#[derive(FromRequest, Debug)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Payload<T>(pub T);
