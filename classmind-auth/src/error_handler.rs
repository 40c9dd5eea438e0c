use http::{
    header::{CONTENT_TYPE, WWW_AUTHENTICATE},
    HeaderValue, Response, StatusCode,
};

use crate::error::AuthError;

pub trait ErrorHandler<B>: Send + Sync {
    fn map_error(&self, error: AuthError) -> Response<B>;
}

/// Answers with `401` and a `{"detail": ...}` JSON body.
pub struct DefaultErrorHandler;

impl<B> ErrorHandler<B> for DefaultErrorHandler
where
    B: From<String>,
{
    fn map_error(&self, error: AuthError) -> Response<B> {
        let detail = if error.is_credentials_error() {
            error.to_string()
        } else {
            format!("Invalid authentication credentials: {}", error)
        };
        let body = serde_json::json!({ "detail": detail }).to_string();

        let mut response = Response::new(B::from(body));
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}
