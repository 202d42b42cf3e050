// ============================================
// Compatibility Scoring
// ============================================
//
// Pairwise 0-1 compatibility between a demand-side topic and anything that
// can stand on the supply side (a supply topic or a user profile). Pure
// computation, no I/O.
//
// Sub-scores:
// - skills:    |needed ∩ supplied| / |needed|
// - interests: |tags ∩ tags| / max(|demand tags|, |supply tags|)
// - location:  1 on exact match, 0.5 when both set but different, else 0
//
// Total is the weighted sum (defaults 0.5 / 0.3 / 0.2), rounded to 2
// decimal places. Skill and tag comparison is case-insensitive.

use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::models::{MatchCandidate, MatchScore, Topic};
use crate::utils::round2;

/// Pairwise compatibility scorer with configurable weights
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: MatchConfig,
}

impl CompatibilityScorer {
    pub fn new(weights: MatchConfig) -> Self {
        Self { weights }
    }

    /// Score `supply` against the demand side of `demand`
    pub fn score(&self, demand: &Topic, supply: &dyn MatchCandidate) -> MatchScore {
        let skills_score = ratio_of_matched(
            &demand.skills_needed,
            supply.provided_skills(),
            demand.skills_needed.len(),
        );

        let interests_score = ratio_of_matched(
            &demand.tags,
            supply.interest_tags(),
            demand.tags.len().max(supply.interest_tags().len()),
        );

        let location_score = match (demand.location.as_deref(), supply.location()) {
            (Some(a), Some(b)) if a == b => 1.0,
            (Some(_), Some(_)) => 0.5,
            _ => 0.0,
        };

        let total = skills_score * self.weights.skills_weight
            + interests_score * self.weights.interests_weight
            + location_score * self.weights.location_weight;

        MatchScore {
            score: round2(total),
            skills_score,
            interests_score,
            location_score,
        }
    }

    /// Demand-side skills the supply covers, in demand order
    pub fn matched_skills(&self, demand: &Topic, supply: &dyn MatchCandidate) -> Vec<String> {
        matched(&demand.skills_needed, supply.provided_skills())
    }

    /// Demand-side tags the supply shares, in demand order
    pub fn matched_tags(&self, demand: &Topic, supply: &dyn MatchCandidate) -> Vec<String> {
        matched(&demand.tags, supply.interest_tags())
    }
}

fn matched(wanted: &[String], offered: &[String]) -> Vec<String> {
    let offered_lower: HashSet<String> = offered.iter().map(|s| s.to_lowercase()).collect();
    wanted
        .iter()
        .filter(|w| offered_lower.contains(&w.to_lowercase()))
        .cloned()
        .collect()
}

fn ratio_of_matched(wanted: &[String], offered: &[String], denominator: usize) -> f64 {
    if wanted.is_empty() || offered.is_empty() || denominator == 0 {
        return 0.0;
    }
    matched(wanted, offered).len() as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TopicStatus, TopicType, UserProfile};
    use chrono::Utc;
    use uuid::Uuid;

    fn demand_topic(
        skills_needed: &[&str],
        tags: &[&str],
        location: Option<&str>,
    ) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "demand".to_string(),
            views_count: 0,
            likes_count: 0,
            comments_count: 0,
            bookmarks_count: 0,
            category: "tech".to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            topic_type: TopicType::Demand,
            location: location.map(|s| s.to_string()),
            skills_needed: skills_needed.iter().map(|s| s.to_string()).collect(),
            skills_provided: Vec::new(),
            status: TopicStatus::Published,
            hot_score: 0.0,
            is_hot: false,
            created_at: Utc::now(),
        }
    }

    fn supply_user(skills: &[&str], interests: &[&str], location: Option<&str>) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            nickname: "u".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            location: location.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_documented_exact_threshold_case() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());
        let demand = demand_topic(&["python", "react"], &["ai", "web"], Some("Shenzhen"));
        let supply = supply_user(&["Python", "Node"], &["AI"], Some("Shenzhen"));

        let score = scorer.score(&demand, &supply);
        assert_eq!(score.skills_score, 0.5);
        assert_eq!(score.interests_score, 0.5);
        assert_eq!(score.location_score, 1.0);
        // 0.5*0.5 + 0.5*0.3 + 1.0*0.2 = 0.6, exactly the default minimum
        assert!((score.score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_lists_zero_the_sub_scores() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());

        let no_needs = demand_topic(&[], &["ai"], None);
        let supply = supply_user(&["python"], &[], None);
        let score = scorer.score(&no_needs, &supply);
        assert_eq!(score.skills_score, 0.0);
        assert_eq!(score.interests_score, 0.0);

        let demand = demand_topic(&["python"], &["ai"], None);
        let empty_supply = supply_user(&[], &[], None);
        let score = scorer.score(&demand, &empty_supply);
        assert_eq!(score.skills_score, 0.0);
        assert_eq!(score.interests_score, 0.0);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_identical_skill_lists_score_one() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());
        let demand = demand_topic(&["rust", "sql"], &[], None);
        let supply = supply_user(&["Rust", "SQL"], &[], None);

        assert_eq!(scorer.score(&demand, &supply).skills_score, 1.0);
    }

    #[test]
    fn test_interests_normalized_by_larger_side() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());
        let demand = demand_topic(&[], &["ai"], None);
        let supply = supply_user(&[], &["ai", "web", "rust", "sql"], None);

        // 1 shared tag / max(1, 4)
        assert_eq!(scorer.score(&demand, &supply).interests_score, 0.25);
    }

    #[test]
    fn test_location_heuristic() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());

        let same = scorer.score(
            &demand_topic(&[], &[], Some("Shenzhen")),
            &supply_user(&[], &[], Some("Shenzhen")),
        );
        assert_eq!(same.location_score, 1.0);

        let different = scorer.score(
            &demand_topic(&[], &[], Some("Shenzhen")),
            &supply_user(&[], &[], Some("Beijing")),
        );
        assert_eq!(different.location_score, 0.5);

        // Location equality is case-sensitive, unlike skills/tags
        let cased = scorer.score(
            &demand_topic(&[], &[], Some("shenzhen")),
            &supply_user(&[], &[], Some("Shenzhen")),
        );
        assert_eq!(cased.location_score, 0.5);

        let absent = scorer.score(
            &demand_topic(&[], &[], Some("Shenzhen")),
            &supply_user(&[], &[], None),
        );
        assert_eq!(absent.location_score, 0.0);
    }

    #[test]
    fn test_supply_topic_uses_provided_skills() {
        let scorer = CompatibilityScorer::new(MatchConfig::default());
        let demand = demand_topic(&["python"], &[], None);

        let mut supply = demand_topic(&[], &[], None);
        supply.topic_type = TopicType::Supply;
        supply.skills_provided = vec!["python".to_string()];

        assert_eq!(scorer.score(&demand, &supply).skills_score, 1.0);
        assert_eq!(scorer.matched_skills(&demand, &supply), vec!["python"]);
    }
}
