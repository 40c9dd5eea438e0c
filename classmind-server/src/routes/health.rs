use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use log::{error, info};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DbHealth {
    Connected {
        database: &'static str,
        latency_ms: f64,
        rows_sampled: usize,
    },
    Error {
        database: &'static str,
        latency_ms: f64,
        details: String,
    },
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/db-health", get(db_health))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "🚀 ClassMind Backend is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Always answers 200; the body says whether the database answered.
async fn db_health(State(state): State<AppState>) -> Json<DbHealth> {
    let started = Instant::now();
    let result = state.routines.probe().await;
    let latency_ms = (started.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;

    Json(match result {
        Ok(rows_sampled) => {
            info!("Database reachable in {} ms", latency_ms);
            DbHealth::Connected {
                database: "supabase",
                latency_ms,
                rows_sampled,
            }
        }
        Err(e) => {
            error!("Database health check failed: {}", e);
            DbHealth::Error {
                database: "supabase",
                latency_ms,
                details: e.to_string(),
            }
        }
    })
}
