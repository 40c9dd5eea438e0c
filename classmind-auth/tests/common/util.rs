use bytes::Bytes;
use classmind_auth::{claims::AuthenticatedUser, error::AuthError, error_handler::ErrorHandler};
use http::{HeaderName, Request, Response, StatusCode};
use http_body_util::Full;
use tower::BoxError;

/// Answers 200 with the authenticated user id, or `anonymous`.
pub async fn whoami(req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, BoxError> {
    let body = match req.extensions().get::<AuthenticatedUser>() {
        Some(user) => user.user_id.clone(),
        None => "anonymous".to_owned(),
    };
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = StatusCode::OK;
    Ok(response)
}

pub fn request_with_headers(headers: Vec<(HeaderName, &str)>) -> Request<Full<Bytes>> {
    let mut request = Request::get("/");
    let request_headers = request.headers_mut().unwrap();
    headers.into_iter().for_each(|(name, value)| {
        request_headers.insert(name, value.parse().unwrap());
    });
    request.body(Full::<Bytes>::default()).unwrap()
}

pub struct TeapotErrorHandler {}

impl ErrorHandler<Full<Bytes>> for TeapotErrorHandler {
    fn map_error(&self, error: AuthError) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(error.to_string())));
        *response.status_mut() = StatusCode::IM_A_TEAPOT;
        response
    }
}
