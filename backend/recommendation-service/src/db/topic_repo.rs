//! Topic repository.
//!
//! Postgres implementation of [`TopicStore`]. Engagement counters and tag
//! arrays are COALESCEd at the query boundary so absent values reach the
//! scorers as zero/empty instead of NULL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::{HotScoreUpdate, TopicStore};
use crate::error::{AppError, Result};
use crate::models::{Topic, TopicStatus, TopicType};

const TOPIC_COLUMNS: &str = r#"
    id,
    author_id,
    title,
    COALESCE(views_count, 0) AS views_count,
    COALESCE(likes_count, 0) AS likes_count,
    COALESCE(comments_count, 0) AS comments_count,
    COALESCE(bookmarks_count, 0) AS bookmarks_count,
    category,
    COALESCE(tags, '{}') AS tags,
    topic_type,
    location,
    COALESCE(skills_needed, '{}') AS skills_needed,
    COALESCE(skills_provided, '{}') AS skills_provided,
    status,
    COALESCE(hot_score, 0) AS hot_score,
    COALESCE(is_hot, FALSE) AS is_hot,
    created_at
"#;

#[derive(sqlx::FromRow)]
struct TopicRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    views_count: i64,
    likes_count: i64,
    comments_count: i64,
    bookmarks_count: i64,
    category: String,
    tags: Vec<String>,
    topic_type: String,
    location: Option<String>,
    skills_needed: Vec<String>,
    skills_provided: Vec<String>,
    status: String,
    hot_score: f64,
    is_hot: bool,
    created_at: DateTime<Utc>,
}

impl From<TopicRow> for Topic {
    fn from(row: TopicRow) -> Self {
        Topic {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            views_count: row.views_count,
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            bookmarks_count: row.bookmarks_count,
            category: row.category,
            tags: row.tags,
            // Unknown type strings degrade to discussion, which carries no
            // matching semantics
            topic_type: TopicType::from_str(&row.topic_type).unwrap_or(TopicType::Discussion),
            location: row.location,
            skills_needed: row.skills_needed,
            skills_provided: row.skills_provided,
            status: TopicStatus::from_str(&row.status).unwrap_or(TopicStatus::Draft),
            hot_score: row.hot_score,
            is_hot: row.is_hot,
            created_at: row.created_at,
        }
    }
}

/// Topic repository over Postgres
pub struct PgTopicRepo {
    pool: PgPool,
}

impl PgTopicRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicStore for PgTopicRepo {
    async fn get_topic(&self, id: Uuid) -> Result<Option<Topic>> {
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = $1");
        let row = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load topic {}: {}", id, e);
                AppError::Database(e.to_string())
            })?;

        Ok(row.map(Topic::from))
    }

    async fn get_topics_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Topic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to batch-load {} topics: {}", ids.len(), e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn published_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Topic>> {
        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE status = 'published' AND created_at >= $1"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load published topics since {}: {}", since, e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn published_with_any_tag(
        &self,
        tags: &[String],
        exclude_ids: &[Uuid],
        take: i64,
    ) -> Result<Vec<Topic>> {
        if tags.is_empty() || take <= 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE status = 'published' \
               AND tags && $1 \
               AND NOT (id = ANY($2)) \
             ORDER BY hot_score DESC \
             LIMIT $3"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(tags)
            .bind(exclude_ids)
            .bind(take)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load tag-matched topics: {}", e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn published_hot(&self, exclude_ids: &[Uuid], take: i64) -> Result<Vec<Topic>> {
        if take <= 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE status = 'published' \
               AND is_hot \
               AND NOT (id = ANY($1)) \
             ORDER BY hot_score DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(exclude_ids)
            .bind(take)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load hot topics: {}", e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn published_newest(&self, exclude_ids: &[Uuid], take: i64) -> Result<Vec<Topic>> {
        if take <= 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE status = 'published' \
               AND NOT (id = ANY($1)) \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(exclude_ids)
            .bind(take)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load newest topics: {}", e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn published_of_types(
        &self,
        types: &[TopicType],
        exclude_topic: Option<Uuid>,
        exclude_author: Option<Uuid>,
    ) -> Result<Vec<Topic>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }

        let type_strings: Vec<String> = types.iter().map(|t| t.as_str().to_string()).collect();
        let sql = format!(
            "SELECT {TOPIC_COLUMNS} FROM topics \
             WHERE status = 'published' \
               AND topic_type = ANY($1) \
               AND ($2::uuid IS NULL OR id <> $2) \
               AND ($3::uuid IS NULL OR author_id <> $3)"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&sql)
            .bind(&type_strings)
            .bind(exclude_topic)
            .bind(exclude_author)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to load topics of types {:?}: {}", type_strings, e);
                AppError::Database(e.to_string())
            })?;

        Ok(rows.into_iter().map(Topic::from).collect())
    }

    async fn update_hot_scores(&self, updates: &[HotScoreUpdate]) -> Result<u64> {
        if updates.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = updates.iter().map(|u| u.id).collect();
        let scores: Vec<f64> = updates.iter().map(|u| u.hot_score).collect();
        let flags: Vec<bool> = updates.iter().map(|u| u.is_hot).collect();

        let result = sqlx::query(
            r#"
            UPDATE topics AS t
            SET hot_score = u.hot_score,
                is_hot = u.is_hot
            FROM UNNEST($1::uuid[], $2::float8[], $3::bool[]) AS u(id, hot_score, is_hot)
            WHERE t.id = u.id
            "#,
        )
        .bind(&ids)
        .bind(&scores)
        .bind(&flags)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to bulk-update {} hot scores: {}", updates.len(), e);
            AppError::Database(e.to_string())
        })?;

        Ok(result.rows_affected())
    }
}
