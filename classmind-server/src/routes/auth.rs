use axum::{body::Body, handler::Handler, routing::get, Json, Router};
use classmind_auth::{authenticator::Authenticator, claims::AuthenticatedUser};
use serde::Serialize;

use crate::{
    extract::{CurrentUser, MaybeUser},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    authenticated: bool,
    user: Option<AuthenticatedUser>,
}

pub fn router(authenticator: &Authenticator) -> Router<AppState> {
    Router::new()
        .route(
            "/api/auth/me",
            get(me.layer(authenticator.required_layer::<Body>())),
        )
        .route(
            "/api/auth/session",
            get(session.layer(authenticator.optional_layer::<Body>())),
        )
}

async fn me(CurrentUser(user): CurrentUser) -> Json<AuthenticatedUser> {
    Json(user)
}

async fn session(MaybeUser(user): MaybeUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: user.is_some(),
        user,
    })
}
