// ============================================
// Interest Profile
// ============================================
//
// Derives a user's short-term tag/category affinity from recent behavior:
// up to 100 view/like/comment/bookmark events from the trailing 30 days,
// with the referenced topics batch-loaded once. Frequencies rank the top
// 10 tags and top 5 categories; first occurrence breaks ties.
//
// The profile is ephemeral and recomputed per feed composition.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::db::{ActionStore, TopicStore};
use crate::error::Result;
use crate::models::{ActionType, InterestProfile};

const LOOKBACK_DAYS: i64 = 30;
const MAX_EVENTS: i64 = 100;
const MAX_TAGS: usize = 10;
const MAX_CATEGORIES: usize = 5;

const TOPIC_TARGET: &str = "topic";

/// Frequency counter that remembers insertion order for tie-breaking
#[derive(Default)]
struct FrequencyTable {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    fn bump(&mut self, key: &str) {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.order.push(key.to_string());
                self.counts.insert(key.to_string(), 1);
            }
        }
    }

    /// Keys by descending frequency; equal frequencies keep first-seen order
    fn top(mut self, n: usize) -> Vec<String> {
        let counts = std::mem::take(&mut self.counts);
        // Stable sort over insertion order realizes the tie-break
        self.order.sort_by_key(|key| {
            std::cmp::Reverse(counts.get(key).copied().unwrap_or_default())
        });
        self.order.truncate(n);
        self.order
    }
}

/// Builds ephemeral interest profiles from behavioral history
pub struct InterestProfileBuilder {
    topics: Arc<dyn TopicStore>,
    actions: Arc<dyn ActionStore>,
}

impl InterestProfileBuilder {
    pub fn new(topics: Arc<dyn TopicStore>, actions: Arc<dyn ActionStore>) -> Self {
        Self { topics, actions }
    }

    pub async fn build(&self, user_id: Uuid) -> Result<InterestProfile> {
        let since = Utc::now() - Duration::days(LOOKBACK_DAYS);
        let events = self
            .actions
            .recent_actions(user_id, &ActionType::all(), since, MAX_EVENTS)
            .await?;

        if events.is_empty() {
            return Ok(InterestProfile::default());
        }

        // One batch load for every topic the events reference
        let mut topic_ids: Vec<Uuid> = Vec::new();
        for event in &events {
            if event.target_type == TOPIC_TARGET && !topic_ids.contains(&event.target_id) {
                topic_ids.push(event.target_id);
            }
        }

        let topics = self.topics.get_topics_by_ids(&topic_ids).await?;
        let by_id: HashMap<Uuid, _> = topics.into_iter().map(|t| (t.id, t)).collect();

        let mut tag_freq = FrequencyTable::default();
        let mut category_freq = FrequencyTable::default();

        for event in &events {
            if event.target_type != TOPIC_TARGET {
                continue;
            }
            let Some(topic) = by_id.get(&event.target_id) else {
                continue;
            };

            for tag in &topic.tags {
                tag_freq.bump(tag);
            }
            category_freq.bump(&topic.category);
        }

        let profile = InterestProfile {
            tags: tag_freq.top(MAX_TAGS),
            categories: category_freq.top(MAX_CATEGORIES),
        };

        debug!(
            user_id = %user_id,
            tag_count = profile.tags.len(),
            category_count = profile.categories.len(),
            "Built interest profile"
        );

        Ok(profile)
    }
}
