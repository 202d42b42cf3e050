//! Behavioral event repository.
//!
//! Postgres implementation of [`ActionStore`]. Events are append-only and
//! produced by the CRUD layer; this service only reads them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::ActionStore;
use crate::error::{AppError, Result};
use crate::models::{ActionType, UserAction};

#[derive(sqlx::FromRow)]
struct ActionRow {
    id: Uuid,
    user_id: Uuid,
    action_type: String,
    target_type: String,
    target_id: Uuid,
    created_at: DateTime<Utc>,
}

fn parse_action_type(s: &str) -> Option<ActionType> {
    match s {
        "view" => Some(ActionType::View),
        "like" => Some(ActionType::Like),
        "comment" => Some(ActionType::Comment),
        "bookmark" => Some(ActionType::Bookmark),
        _ => None,
    }
}

/// Behavioral event repository over Postgres
pub struct PgActionRepo {
    pool: PgPool,
}

impl PgActionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionStore for PgActionRepo {
    async fn recent_actions(
        &self,
        user_id: Uuid,
        kinds: &[ActionType],
        since: DateTime<Utc>,
        take: i64,
    ) -> Result<Vec<UserAction>> {
        let kind_strings: Vec<String> = kinds.iter().map(|k| k.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, ActionRow>(
            r#"
            SELECT id, user_id, action_type, target_type, target_id, created_at
            FROM user_actions
            WHERE user_id = $1
              AND action_type = ANY($2)
              AND created_at >= $3
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(&kind_strings)
        .bind(since)
        .bind(take)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load recent actions for {}: {}", user_id, e);
            AppError::Database(e.to_string())
        })?;

        // Rows with action types outside the requested set cannot appear;
        // unparseable ones are dropped rather than failing the whole read.
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let action_type = parse_action_type(&row.action_type)?;
                Some(UserAction {
                    id: row.id,
                    user_id: row.user_id,
                    action_type,
                    target_type: row.target_type,
                    target_id: row.target_id,
                    created_at: row.created_at,
                })
            })
            .collect())
    }

    async fn viewed_topic_ids(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT target_id
            FROM user_actions
            WHERE user_id = $1
              AND action_type = 'view'
              AND target_type = 'topic'
              AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load viewed topic ids for {}: {}", user_id, e);
            AppError::Database(e.to_string())
        })?;

        Ok(ids)
    }
}
