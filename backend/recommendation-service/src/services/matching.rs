// ============================================
// Match Recommendation
// ============================================
//
// Finds and ranks the best-matching counterpart topics, either for a
// demand/supply topic or for a user acting as the supply side. Results
// below the configured minimum score are dropped; absence and storage
// failures both resolve to an empty list so callers can always render
// "nothing to show".

use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use crate::config::MatchConfig;
use crate::db::{TopicStore, UserStore};
use crate::error::Result;
use crate::models::{MatchCandidate, MatchResult, MatchScore, Topic, TopicType, UserProfile};
use crate::services::compatibility::CompatibilityScorer;

/// Supply/demand match recommender
pub struct MatchService {
    topics: Arc<dyn TopicStore>,
    users: Arc<dyn UserStore>,
    scorer: CompatibilityScorer,
    min_score: f64,
}

impl MatchService {
    pub fn new(topics: Arc<dyn TopicStore>, users: Arc<dyn UserStore>, config: MatchConfig) -> Self {
        let min_score = config.min_score;
        Self {
            topics,
            users,
            scorer: CompatibilityScorer::new(config),
            min_score,
        }
    }

    /// Best-matching counterpart topics for a demand or supply topic.
    /// Topics of any other type have no matching semantics and yield an
    /// empty result.
    pub async fn match_for_topic(&self, topic_id: Uuid, limit: usize) -> Vec<MatchResult> {
        match self.match_for_topic_inner(topic_id, limit).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Topic match recommendation failed for {}: {}", topic_id, e);
                Vec::new()
            }
        }
    }

    async fn match_for_topic_inner(&self, topic_id: Uuid, limit: usize) -> Result<Vec<MatchResult>> {
        let Some(topic) = self.topics.get_topic(topic_id).await? else {
            warn!("Match requested for unknown topic {}", topic_id);
            return Ok(Vec::new());
        };

        let target_types: &[TopicType] = match topic.topic_type {
            TopicType::Demand => &[TopicType::Supply, TopicType::Collaboration],
            TopicType::Supply => &[TopicType::Demand, TopicType::Collaboration],
            _ => return Ok(Vec::new()),
        };

        let candidates = self
            .topics
            .published_of_types(target_types, Some(topic_id), None)
            .await?;

        let results = candidates
            .into_iter()
            .map(|candidate| {
                let score = self.scorer.score(&topic, &candidate);
                MatchResult::new(candidate, score)
            })
            .collect();

        Ok(self.filter_rank_cap(results, limit))
    }

    /// Demand topics the user could help with, scored with the user as the
    /// supply side and annotated with human-readable reasons.
    pub async fn match_for_user(&self, user_id: Uuid, limit: usize) -> Vec<MatchResult> {
        match self.match_for_user_inner(user_id, limit).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("User match recommendation failed for {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    async fn match_for_user_inner(&self, user_id: Uuid, limit: usize) -> Result<Vec<MatchResult>> {
        let Some(user) = self.users.get_user(user_id).await? else {
            warn!("Match requested for unknown user {}", user_id);
            return Ok(Vec::new());
        };

        let demands = self
            .topics
            .published_of_types(&[TopicType::Demand], None, Some(user_id))
            .await?;

        let results = demands
            .into_iter()
            .map(|demand| {
                let score = self.scorer.score(&demand, &user);
                let reasons = self.build_reasons(&demand, &user, &score);
                MatchResult::new(demand, score).with_reasons(reasons)
            })
            .collect();

        Ok(self.filter_rank_cap(results, limit))
    }

    fn filter_rank_cap(&self, mut results: Vec<MatchResult>, limit: usize) -> Vec<MatchResult> {
        results.retain(|m| m.score >= self.min_score);
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }

    fn build_reasons(&self, demand: &Topic, user: &UserProfile, score: &MatchScore) -> Vec<String> {
        let mut reasons = Vec::new();

        if score.skills_score > 0.0 {
            let matched = self.scorer.matched_skills(demand, user);
            if !matched.is_empty() {
                reasons.push(format!("Skills you can offer: {}", matched.join(", ")));
            }
        }

        if score.interests_score > 0.0 {
            let matched = self.scorer.matched_tags(demand, user);
            if !matched.is_empty() {
                reasons.push(format!("Shared interests: {}", matched.join(", ")));
            }
        }

        if score.location_score == 1.0 {
            if let Some(location) = demand.location.as_deref() {
                reasons.push(format!("Same location: {}", location));
            }
        }

        reasons.push(format!("Match score: {}%", (score.score * 100.0).round() as i64));
        reasons
    }
}
