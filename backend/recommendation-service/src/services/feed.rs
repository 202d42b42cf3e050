// ============================================
// Feed Composition
// ============================================
//
// Blends three candidate pools into one deduplicated, size-bounded,
// time-cached recommendation list:
//
//   interest-matched  ceil(limit * 0.6)   hot score desc
//   globally hot      ceil(limit * 0.3)   hot score desc
//   newest            remainder (>= 0)    created_at desc
//
// Topics the user viewed in the last 7 days are excluded from every pool,
// and a running exclusion set keeps the pools disjoint. The combined list
// gets a full diversity shuffle before being cached for the refresh
// interval. Any failure while composing degrades to the global hot pool.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{error, warn};
use uuid::Uuid;

use crate::cache::{feed_cache_key, RecommendCache};
use crate::config::RecommendConfig;
use crate::db::{ActionStore, TopicStore};
use crate::error::Result;
use crate::models::Topic;
use crate::services::interest::InterestProfileBuilder;

const VIEWED_WINDOW_DAYS: i64 = 7;
const INTEREST_SHARE: f64 = 0.6;
const HOT_SHARE: f64 = 0.3;

/// Personalized feed composer
pub struct FeedComposer {
    topics: Arc<dyn TopicStore>,
    actions: Arc<dyn ActionStore>,
    cache: Arc<dyn RecommendCache>,
    interests: InterestProfileBuilder,
    config: RecommendConfig,
    rng: Mutex<StdRng>,
}

impl FeedComposer {
    pub fn new(
        topics: Arc<dyn TopicStore>,
        actions: Arc<dyn ActionStore>,
        cache: Arc<dyn RecommendCache>,
        config: RecommendConfig,
    ) -> Self {
        let interests = InterestProfileBuilder::new(Arc::clone(&topics), Arc::clone(&actions));
        Self {
            topics,
            actions,
            cache,
            interests,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Pin the shuffle for deterministic tests
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Compose with the configured default feed size
    pub async fn compose_default(&self, user_id: Uuid) -> Vec<Topic> {
        self.compose(user_id, self.config.default_limit).await
    }

    /// Personalized feed of at most `limit` deduplicated topics. Failures
    /// degrade to the global hot pool, uncached.
    pub async fn compose(&self, user_id: Uuid, limit: usize) -> Vec<Topic> {
        match self.compose_inner(user_id, limit).await {
            Ok(feed) => feed,
            Err(e) => {
                error!(
                    "Feed composition failed for {}: {}; serving hot fallback",
                    user_id, e
                );
                self.hot_fallback(limit).await
            }
        }
    }

    async fn compose_inner(&self, user_id: Uuid, limit: usize) -> Result<Vec<Topic>> {
        let key = feed_cache_key(user_id);

        // Cache read problems are a miss, not a failure
        let cached = match self.cache.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Feed cache read failed for {}: {}", user_id, e);
                None
            }
        };
        if let Some(json) = cached {
            match serde_json::from_str::<Vec<Topic>>(&json) {
                Ok(feed) => return Ok(feed),
                Err(e) => warn!("Discarding undecodable cached feed for {}: {}", user_id, e),
            }
        }

        let profile = self.interests.build(user_id).await?;

        let viewed_since = Utc::now() - Duration::days(VIEWED_WINDOW_DAYS);
        let viewed = self.actions.viewed_topic_ids(user_id, viewed_since).await?;

        let interest_quota = (limit as f64 * INTEREST_SHARE).ceil() as usize;
        let hot_quota = (limit as f64 * HOT_SHARE).ceil() as usize;
        // Ceiling the two larger quotas can consume the whole limit
        let new_quota = limit.saturating_sub(interest_quota + hot_quota);

        let interest_pool = if profile.tags.is_empty() {
            Vec::new()
        } else {
            self.topics
                .published_with_any_tag(&profile.tags, &viewed, interest_quota as i64)
                .await?
        };

        let mut exclude = viewed;
        exclude.extend(interest_pool.iter().map(|t| t.id));

        let hot_pool = self.topics.published_hot(&exclude, hot_quota as i64).await?;
        exclude.extend(hot_pool.iter().map(|t| t.id));

        let new_pool = if new_quota > 0 {
            self.topics
                .published_newest(&exclude, new_quota as i64)
                .await?
        } else {
            Vec::new()
        };

        let mut feed = interest_pool;
        feed.extend(hot_pool);
        feed.extend(new_pool);

        // Diversity shuffle: deliberately discards the per-pool relevance
        // ordering
        {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            feed.shuffle(&mut *rng);
        }
        feed.truncate(limit);

        match serde_json::to_string(&feed) {
            Ok(json) => {
                if let Err(e) = self
                    .cache
                    .set(&key, &json, self.config.refresh_interval_secs)
                    .await
                {
                    // The composed feed is still the best answer
                    warn!("Failed to cache feed for {}: {}", user_id, e);
                }
            }
            Err(e) => warn!("Failed to serialize feed for {}: {}", user_id, e),
        }

        Ok(feed)
    }

    async fn hot_fallback(&self, limit: usize) -> Vec<Topic> {
        match self.topics.published_hot(&[], limit as i64).await {
            Ok(topics) => topics,
            Err(e) => {
                error!("Hot fallback failed: {}", e);
                Vec::new()
            }
        }
    }
}
