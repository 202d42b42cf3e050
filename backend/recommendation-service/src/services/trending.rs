// ============================================
// Trending Detection
// ============================================
//
// Finds topics with the highest engagement rate inside a rolling 24-hour
// window. This is a linear per-hour rate, not the gravity-decayed hot
// score: views are ignored and age is floored at one hour.
//
//   trending_score = (likes*2 + comments*3 + bookmarks*2) / max(1, age_hours)

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::error;

use crate::db::TopicStore;
use crate::error::Result;
use crate::models::{Topic, TrendingTopic};
use crate::utils::{age_hours, round2};

const TRENDING_WINDOW_HOURS: i64 = 24;

/// Short-window trending detector
pub struct TrendingDetector {
    store: Arc<dyn TopicStore>,
}

impl TrendingDetector {
    pub fn new(store: Arc<dyn TopicStore>) -> Self {
        Self { store }
    }

    /// Top `limit` topics by engagement rate over the last 24 hours.
    /// Storage failures degrade to an empty list.
    pub async fn detect(&self, limit: usize) -> Vec<TrendingTopic> {
        match self.detect_inner(limit).await {
            Ok(topics) => topics,
            Err(e) => {
                error!("Trending detection failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn detect_inner(&self, limit: usize) -> Result<Vec<TrendingTopic>> {
        let now = Utc::now();
        let since = now - Duration::hours(TRENDING_WINDOW_HOURS);

        let topics = self.store.published_created_since(since).await?;

        let mut trending: Vec<TrendingTopic> = topics
            .into_iter()
            .map(|topic| {
                let trending_score = Self::rate(&topic, now);
                TrendingTopic {
                    topic,
                    trending_score,
                }
            })
            .collect();

        trending.sort_by(|a, b| {
            b.trending_score
                .partial_cmp(&a.trending_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        trending.truncate(limit);

        Ok(trending)
    }

    fn rate(topic: &Topic, now: chrono::DateTime<Utc>) -> f64 {
        let age = age_hours(topic.created_at, now).max(1.0);
        let engagement = topic.likes_count as f64 * 2.0
            + topic.comments_count as f64 * 3.0
            + topic.bookmarks_count as f64 * 2.0;
        round2(engagement / age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockTopicStore;
    use crate::models::{TopicStatus, TopicType};
    use chrono::DateTime;
    use uuid::Uuid;

    fn recent_topic(likes: i64, comments: i64, bookmarks: i64, hours_old: i64) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "t".to_string(),
            views_count: 1000, // must not affect the trending rate
            likes_count: likes,
            comments_count: comments,
            bookmarks_count: bookmarks,
            category: "tech".to_string(),
            tags: Vec::new(),
            topic_type: TopicType::Discussion,
            location: None,
            skills_needed: Vec::new(),
            skills_provided: Vec::new(),
            status: TopicStatus::Published,
            hot_score: 0.0,
            is_hot: false,
            created_at: Utc::now() - chrono::Duration::hours(hours_old),
        }
    }

    #[test]
    fn test_three_hour_old_rate() {
        let topic = recent_topic(10, 4, 2, 3);
        // (20 + 12 + 4) / 3 = 12.0
        assert_eq!(TrendingDetector::rate(&topic, Utc::now()), 12.0);
    }

    #[test]
    fn test_age_floored_at_one_hour() {
        let topic = recent_topic(10, 0, 0, 0);
        // 20 / max(1, ~0) = 20, not a division blow-up
        assert_eq!(TrendingDetector::rate(&topic, Utc::now()), 20.0);
    }

    #[tokio::test]
    async fn test_detect_sorts_and_caps() {
        let slow = recent_topic(1, 0, 0, 2);
        let fast = recent_topic(50, 10, 5, 2);
        let mid = recent_topic(10, 4, 2, 3);

        let mut store = MockTopicStore::new();
        store
            .expect_published_created_since()
            .withf(|since| {
                let age = Utc::now() - *since;
                age >= chrono::Duration::hours(24) && age < chrono::Duration::hours(25)
            })
            .times(1)
            .returning(move |_| Ok(vec![slow.clone(), fast.clone(), mid.clone()]));

        let detector = TrendingDetector::new(Arc::new(store));
        let trending = detector.detect(2).await;

        assert_eq!(trending.len(), 2);
        assert!(trending[0].trending_score >= trending[1].trending_score);
        assert_eq!(trending[1].trending_score, 12.0);
        assert!(trending.iter().all(|t| t.trending_score >= 0.0));
    }

    #[tokio::test]
    async fn test_detect_falls_back_to_empty_on_storage_failure() {
        let mut store = MockTopicStore::new();
        store
            .expect_published_created_since()
            .returning(|_: DateTime<Utc>| Err(crate::error::AppError::Database("down".into())));

        let detector = TrendingDetector::new(Arc::new(store));
        assert!(detector.detect(10).await.is_empty());
    }
}
