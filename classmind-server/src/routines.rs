use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::RoutineError,
    supabase::{Filter, SupabaseClient, SupabaseError},
};

const TABLE: &str = "routines";

/// A routine as returned to clients. The owning `user_id` is never exposed.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Routine {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub section_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewRoutine {
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub section_id: Option<i64>,
}

/// Partial update. `time` and `section_id` distinguish "absent" from an
/// explicit `null`, which clears the column.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RoutinePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<Option<String>>,
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_id: Option<Option<i64>>,
}

impl RoutinePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.time.is_none() && self.section_id.is_none()
    }
}

#[derive(Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_id: Option<i64>,
    user_id: &'a str,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoutineStore: Send + Sync {
    /// Lists routines, restricted to `user_id` when given.
    async fn list(
        &self,
        limit: Option<u32>,
        user_id: Option<String>,
    ) -> Result<Vec<Routine>, RoutineError>;

    async fn get(&self, id: i64) -> Result<Routine, RoutineError>;

    async fn create(&self, routine: NewRoutine, user_id: String) -> Result<Routine, RoutineError>;

    async fn update(&self, id: i64, patch: RoutinePatch) -> Result<Routine, RoutineError>;

    /// Deletes `id` only if it belongs to `user_id`.
    async fn delete(&self, id: i64, user_id: String) -> Result<Routine, RoutineError>;

    /// Reads one row to prove the table is reachable; returns the row count.
    async fn probe(&self) -> Result<usize, SupabaseError>;
}

pub struct SupabaseRoutineStore {
    client: SupabaseClient,
}

impl SupabaseRoutineStore {
    pub fn new(client: SupabaseClient) -> Self {
        SupabaseRoutineStore { client }
    }
}

#[async_trait]
impl RoutineStore for SupabaseRoutineStore {
    async fn list(
        &self,
        limit: Option<u32>,
        user_id: Option<String>,
    ) -> Result<Vec<Routine>, RoutineError> {
        let mut filter = Filter::new().select("*");
        if let Some(user_id) = user_id {
            filter = filter.eq("user_id", user_id);
        }
        if let Some(limit) = limit {
            filter = filter.limit(limit);
        }
        self.client
            .select(TABLE, &filter)
            .await
            .map_err(RoutineError::database("fetch routines"))
    }

    async fn get(&self, id: i64) -> Result<Routine, RoutineError> {
        let filter = Filter::new().select("*").eq("id", id);
        self.client
            .select(TABLE, &filter)
            .await
            .map_err(RoutineError::database("fetch routine"))?
            .into_iter()
            .next()
            .ok_or(RoutineError::NotFound(id))
    }

    async fn create(&self, routine: NewRoutine, user_id: String) -> Result<Routine, RoutineError> {
        let row = InsertRow {
            title: &routine.title,
            time: routine.time.as_deref(),
            section_id: routine.section_id,
            user_id: &user_id,
        };
        let created: Routine = self
            .client
            .insert(TABLE, &row)
            .await
            .map_err(RoutineError::database("create routine"))?
            .into_iter()
            .next()
            .ok_or(RoutineError::NothingCreated)?;
        info!("Routine {} created by {}", created.id, user_id);
        Ok(created)
    }

    async fn update(&self, id: i64, patch: RoutinePatch) -> Result<Routine, RoutineError> {
        let filter = Filter::new().eq("id", id);
        self.client
            .update(TABLE, &patch, &filter)
            .await
            .map_err(RoutineError::database("update routine"))?
            .into_iter()
            .next()
            .ok_or(RoutineError::NotFound(id))
    }

    async fn delete(&self, id: i64, user_id: String) -> Result<Routine, RoutineError> {
        let filter = Filter::new().eq("id", id).eq("user_id", &user_id);
        let deleted: Routine = self
            .client
            .delete(TABLE, &filter)
            .await
            .map_err(RoutineError::database("delete routine"))?
            .into_iter()
            .next()
            .ok_or(RoutineError::NotOwned(id))?;
        info!("Routine {} deleted by {}", id, user_id);
        Ok(deleted)
    }

    async fn probe(&self) -> Result<usize, SupabaseError> {
        let rows: Vec<serde_json::Value> = self
            .client
            .select(TABLE, &Filter::new().select("id").limit(1))
            .await?;
        Ok(rows.len())
    }
}
