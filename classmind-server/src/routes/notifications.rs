use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{extract::AppPath, AppState};

/// Placeholder endpoints; notifications are not stored yet.
pub fn router() -> Router<AppState> {
    let collection = get(list_notifications).post(create_notification);
    Router::new()
        .route("/api/notifications", collection.clone())
        .route("/api/notifications/", collection)
        .route(
            "/api/notifications/{notification_id}",
            delete(delete_notification),
        )
}

async fn list_notifications() -> Json<Value> {
    Json(json!({ "data": [] }))
}

async fn create_notification() -> Json<Value> {
    Json(json!({ "message": "Notification created" }))
}

async fn delete_notification(AppPath(notification_id): AppPath<i64>) -> Json<Value> {
    Json(json!({
        "message": format!("Notification {} deleted", notification_id)
    }))
}
