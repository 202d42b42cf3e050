//! Storage collaborator contract.
//!
//! Services depend on these traits; `PgTopicRepo` / `PgActionRepo` /
//! `PgUserRepo` are the Postgres implementations. Tests mock the traits.

mod action_repo;
mod topic_repo;
mod user_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ActionType, Topic, TopicType, UserAction, UserProfile};

pub use action_repo::PgActionRepo;
pub use topic_repo::PgTopicRepo;
pub use user_repo::PgUserRepo;

/// One batch entry of recomputed hotness
#[derive(Debug, Clone, PartialEq)]
pub struct HotScoreUpdate {
    pub id: Uuid,
    pub hot_score: f64,
    pub is_hot: bool,
}

/// Read/write contract over topics
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Point-read of a topic by id
    async fn get_topic(&self, id: Uuid) -> Result<Option<Topic>>;

    /// Batch point-read; order of the result is unspecified
    async fn get_topics_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Topic>>;

    /// Published topics created at or after `since`
    async fn published_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Topic>>;

    /// Published topics whose tags overlap `tags`, minus `exclude_ids`,
    /// ordered by hot score descending
    async fn published_with_any_tag(
        &self,
        tags: &[String],
        exclude_ids: &[Uuid],
        take: i64,
    ) -> Result<Vec<Topic>>;

    /// Published topics flagged hot, minus `exclude_ids`, ordered by hot
    /// score descending
    async fn published_hot(&self, exclude_ids: &[Uuid], take: i64) -> Result<Vec<Topic>>;

    /// Published topics minus `exclude_ids`, newest first
    async fn published_newest(&self, exclude_ids: &[Uuid], take: i64) -> Result<Vec<Topic>>;

    /// Published topics of the given types, optionally excluding one topic
    /// and one author
    async fn published_of_types(
        &self,
        types: &[TopicType],
        exclude_topic: Option<Uuid>,
        exclude_author: Option<Uuid>,
    ) -> Result<Vec<Topic>>;

    /// Bulk-persist recomputed hot scores; returns the number of rows updated
    async fn update_hot_scores(&self, updates: &[HotScoreUpdate]) -> Result<u64>;
}

/// Read contract over behavioral events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// Most recent actions of the given kinds since `since`, newest first,
    /// capped at `take`
    async fn recent_actions(
        &self,
        user_id: Uuid,
        kinds: &[ActionType],
        since: DateTime<Utc>,
        take: i64,
    ) -> Result<Vec<UserAction>>;

    /// Distinct topic ids the user viewed since `since`
    async fn viewed_topic_ids(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Uuid>>;
}

/// Read contract over user profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>>;
}
