//! HTTP API of the ClassMind backend.
//!
//! Routines live in a Supabase `routines` table reached through PostgREST.
//! Callers authenticate with Clerk session tokens, verified by
//! [classmind_auth] against Clerk's published JWK set.

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use classmind_auth::authenticator::Authenticator;
use log::warn;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::routines::RoutineStore;

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod routes;
pub mod routines;
pub mod supabase;

#[derive(Clone)]
pub struct AppState {
    pub routines: Arc<dyn RoutineStore>,
}

/// Credentialed CORS for the given origins. Origins that are not valid
/// header values are skipped.
///
/// A `*` entry allows every origin. Credentials rule out a literal `*`
/// response header, so the request origin is echoed back instead.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            }
        }))
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn app(state: AppState, authenticator: &Authenticator, cors: CorsLayer) -> Router {
    routes::router(authenticator).with_state(state).layer(cors)
}
