//! User profile repository.
//!
//! Postgres implementation of [`UserStore`]; only the fields matching cares
//! about are selected.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::UserStore;
use crate::error::{AppError, Result};
use crate::models::UserProfile;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    nickname: String,
    skills: Vec<String>,
    interests: Vec<String>,
    location: Option<String>,
}

/// User profile repository over Postgres
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id,
                   nickname,
                   COALESCE(skills, '{}') AS skills,
                   COALESCE(interests, '{}') AS interests,
                   location
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to load user {}: {}", id, e);
            AppError::Database(e.to_string())
        })?;

        Ok(row.map(|row| UserProfile {
            id: row.id,
            nickname: row.nickname,
            skills: row.skills,
            interests: row.interests,
            location: row.location,
        }))
    }
}
