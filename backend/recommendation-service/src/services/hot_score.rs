// ============================================
// Hot Score
// ============================================
//
// Decayed popularity: weighted engagement divided by an inverse power-law
// time penalty.
//
//   votes = views*Wv + likes*Wl + comments*Wc + bookmarks*Wb
//   score = votes / (age_hours + 2) ^ gravity
//
// Default weights 1/2/3/2, gravity 1.8. Scores above the configured
// threshold flag the topic as hot.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::config::HotScoreConfig;
use crate::db::{HotScoreUpdate, TopicStore};
use crate::error::Result;
use crate::models::Topic;
use crate::utils::{age_hours, round2};

/// Pure hotness computation over a topic's counters and age
#[derive(Debug, Clone)]
pub struct HotScorer {
    config: HotScoreConfig,
}

impl HotScorer {
    pub fn new(config: HotScoreConfig) -> Self {
        Self { config }
    }

    /// Decayed popularity score, rounded to 2 decimal places. Always >= 0.
    pub fn score(&self, topic: &Topic, now: DateTime<Utc>) -> f64 {
        let age = age_hours(topic.created_at, now);

        let votes = topic.views_count as f64 * self.config.view_weight
            + topic.likes_count as f64 * self.config.like_weight
            + topic.comments_count as f64 * self.config.comment_weight
            + topic.bookmarks_count as f64 * self.config.bookmark_weight;

        round2(votes / (age + 2.0).powf(self.config.gravity))
    }

    pub fn is_hot(&self, score: f64) -> bool {
        score > self.config.hot_threshold
    }
}

/// Batch hotness recompute over recently created published topics.
///
/// May run concurrently with reads; readers observing a mix of stale and
/// fresh scores mid-batch is accepted eventual consistency.
pub struct HotScoreService {
    store: Arc<dyn TopicStore>,
    scorer: HotScorer,
    window_days: i64,
}

impl HotScoreService {
    pub fn new(store: Arc<dyn TopicStore>, config: HotScoreConfig) -> Self {
        let window_days = config.recompute_window_days;
        Self {
            store,
            scorer: HotScorer::new(config),
            window_days,
        }
    }

    /// Recompute and persist hot scores for every published topic created
    /// within the configured window. Returns the number of topics updated.
    pub async fn refresh_all(&self) -> Result<usize> {
        let now = Utc::now();
        let since = now - Duration::days(self.window_days);

        let topics = self.store.published_created_since(since).await?;

        let updates: Vec<HotScoreUpdate> = topics
            .iter()
            .map(|topic| {
                let hot_score = self.scorer.score(topic, now);
                HotScoreUpdate {
                    id: topic.id,
                    hot_score,
                    is_hot: self.scorer.is_hot(hot_score),
                }
            })
            .collect();

        self.store.update_hot_scores(&updates).await?;

        info!(topic_count = updates.len(), "Refreshed hot scores");

        Ok(updates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockTopicStore;
    use crate::models::{TopicStatus, TopicType};
    use uuid::Uuid;

    fn topic_with_counters(
        views: i64,
        likes: i64,
        comments: i64,
        bookmarks: i64,
        created_at: DateTime<Utc>,
    ) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "t".to_string(),
            views_count: views,
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
            created_at,
        }
    }

    #[test]
    fn test_two_hour_old_topic_score() {
        let scorer = HotScorer::new(HotScoreConfig::default());
        let now = Utc::now();
        let topic = topic_with_counters(100, 20, 5, 3, now - Duration::hours(2));

        // votes = 100 + 40 + 15 + 6 = 161; 161 / 4^1.8 = 13.28
        let score = scorer.score(&topic, now);
        assert!((score - 13.28).abs() < 1e-9);
        assert!(scorer.is_hot(score));
    }

    #[test]
    fn test_zero_counters_score_zero_regardless_of_age() {
        let scorer = HotScorer::new(HotScoreConfig::default());
        let now = Utc::now();

        for hours in [0, 1, 48, 24 * 30] {
            let topic = topic_with_counters(0, 0, 0, 0, now - Duration::hours(hours));
            let score = scorer.score(&topic, now);
            assert_eq!(score, 0.0);
            assert!(!scorer.is_hot(score));
        }
    }

    #[test]
    fn test_score_strictly_decreases_with_age() {
        let scorer = HotScorer::new(HotScoreConfig::default());
        let now = Utc::now();

        let mut last = f64::INFINITY;
        for hours in [0, 1, 2, 6, 24, 72] {
            let topic = topic_with_counters(500, 50, 20, 10, now - Duration::hours(hours));
            let score = scorer.score(&topic, now);
            assert!(score >= 0.0);
            assert!(score < last, "score must decay as age grows");
            last = score;
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let scorer = HotScorer::new(HotScoreConfig::default());
        assert!(!scorer.is_hot(10.0));
        assert!(scorer.is_hot(10.01));
    }

    #[test]
    fn test_future_created_at_clamps_to_zero_age() {
        let scorer = HotScorer::new(HotScoreConfig::default());
        let now = Utc::now();
        let topic = topic_with_counters(10, 0, 0, 0, now + Duration::hours(1));

        // age clamps to 0: 10 / 2^1.8 = 2.87
        assert!((scorer.score(&topic, now) - 2.87).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_refresh_all_persists_scores_and_flags() {
        let now = Utc::now();
        let hot = topic_with_counters(100, 20, 5, 3, now - Duration::hours(2));
        let cold = topic_with_counters(1, 0, 0, 0, now - Duration::hours(2));
        let hot_id = hot.id;
        let cold_id = cold.id;

        let mut store = MockTopicStore::new();
        store
            .expect_published_created_since()
            .times(1)
            .returning(move |_| Ok(vec![hot.clone(), cold.clone()]));
        store
            .expect_update_hot_scores()
            .withf(move |updates| {
                updates.len() == 2
                    && updates[0].id == hot_id
                    && updates[0].is_hot
                    && updates[1].id == cold_id
                    && !updates[1].is_hot
            })
            .times(1)
            .returning(|updates| Ok(updates.len() as u64));

        let service = HotScoreService::new(Arc::new(store), HotScoreConfig::default());
        let count = service.refresh_all().await.unwrap();
        assert_eq!(count, 2);
    }
}
