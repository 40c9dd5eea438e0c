use axum::{
    body::Body,
    extract::State,
    handler::Handler,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use classmind_auth::authenticator::Authenticator;
use serde::Deserialize;

use crate::{
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery, CurrentUser, MaybeUser},
    routines::{NewRoutine, Routine, RoutinePatch},
    AppState,
};

const MAX_LIMIT: u32 = 100;
const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<u32>,
}

pub fn router(authenticator: &Authenticator) -> Router<AppState> {
    let collection = get(list_routines.layer(authenticator.optional_layer::<Body>()))
        .post(create_routine.layer(authenticator.required_layer::<Body>()));
    let item = get(get_routine)
        .patch(update_routine)
        .delete(delete_routine.layer(authenticator.required_layer::<Body>()));

    Router::new()
        .route("/api/routines", collection.clone())
        .route("/api/routines/", collection)
        .route("/api/routines/{routine_id}", item)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let chars = title.chars().count();
    if chars == 0 || chars > MAX_TITLE_CHARS {
        return Err(ApiError::Validation(format!(
            "title must be between 1 and {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(())
}

async fn list_routines(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<Routine>>, ApiError> {
    if let Some(limit) = params.limit {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
    }
    let routines = state
        .routines
        .list(params.limit, user.map(|user| user.user_id))
        .await?;
    Ok(Json(routines))
}

async fn get_routine(
    State(state): State<AppState>,
    AppPath(routine_id): AppPath<i64>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routines.get(routine_id).await?))
}

async fn create_routine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(routine): AppJson<NewRoutine>,
) -> Result<(StatusCode, Json<Routine>), ApiError> {
    validate_title(&routine.title)?;
    let created = state.routines.create(routine, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_routine(
    State(state): State<AppState>,
    AppPath(routine_id): AppPath<i64>,
    AppJson(patch): AppJson<RoutinePatch>,
) -> Result<Json<Routine>, ApiError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    let routine = if patch.is_empty() {
        state.routines.get(routine_id).await?
    } else {
        state.routines.update(routine_id, patch).await?
    };
    Ok(Json(routine))
}

async fn delete_routine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(routine_id): AppPath<i64>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routines.delete(routine_id, user.user_id).await?))
}
