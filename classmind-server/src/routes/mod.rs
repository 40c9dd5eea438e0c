use axum::Router;
use classmind_auth::authenticator::Authenticator;

use crate::AppState;

pub mod auth;
pub mod health;
pub mod notifications;
pub mod routines;

pub fn router(authenticator: &Authenticator) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(routines::router(authenticator))
        .merge(auth::router(authenticator))
        .merge(notifications::router())
}
