use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication status of a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Published,
    Draft,
    Archived,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "published" => Some(Self::Published),
            "draft" => Some(Self::Draft),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a topic; only demand/supply/collaboration take part in matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    Demand,
    Supply,
    Project,
    Discussion,
    Collaboration,
}

impl TopicType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demand => "demand",
            Self::Supply => "supply",
            Self::Project => "project",
            Self::Discussion => "discussion",
            Self::Collaboration => "collaboration",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "demand" => Some(Self::Demand),
            "supply" => Some(Self::Supply),
            "project" => Some(Self::Project),
            "discussion" => Some(Self::Discussion),
            "collaboration" => Some(Self::Collaboration),
            _ => None,
        }
    }
}

impl std::fmt::Display for TopicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A community topic with its engagement counters and derived hotness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub bookmarks_count: i64,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub topic_type: TopicType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    #[serde(default)]
    pub skills_provided: Vec<String>,
    pub status: TopicStatus,
    pub hot_score: f64,
    pub is_hot: bool,
    pub created_at: DateTime<Utc>,
}

/// Behavioral event types considered by the interest profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    View,
    Like,
    Comment,
    Bookmark,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Bookmark => "bookmark",
        }
    }

    /// All action kinds that feed the interest profile
    pub fn all() -> [ActionType; 4] {
        [Self::View, Self::Like, Self::Comment, Self::Bookmark]
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only behavioral event, produced by the CRUD layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action_type: ActionType,
    pub target_type: String,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// User profile fields relevant to matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub nickname: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Short-term tag/category affinity derived from recent behavior.
/// Ephemeral; recomputed per feed composition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterestProfile {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl InterestProfile {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.categories.is_empty()
    }
}

/// Anything that can stand on the supply side of a compatibility check.
/// Both topics (skills_provided/tags) and user profiles (skills/interests)
/// qualify and are used interchangeably.
pub trait MatchCandidate {
    fn provided_skills(&self) -> &[String];
    fn interest_tags(&self) -> &[String];
    fn location(&self) -> Option<&str>;
}

impl MatchCandidate for Topic {
    fn provided_skills(&self) -> &[String] {
        &self.skills_provided
    }

    fn interest_tags(&self) -> &[String] {
        &self.tags
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl MatchCandidate for UserProfile {
    fn provided_skills(&self) -> &[String] {
        &self.skills
    }

    fn interest_tags(&self) -> &[String] {
        &self.interests
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Compatibility sub-scores, all in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: f64,
    pub skills_score: f64,
    pub interests_score: f64,
    pub location_score: f64,
}

/// A matched topic with its compatibility breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub topic: Topic,
    pub score: f64,
    pub skills_score: f64,
    pub interests_score: f64,
    pub location_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl MatchResult {
    pub fn new(topic: Topic, score: MatchScore) -> Self {
        Self {
            topic,
            score: score.score,
            skills_score: score.skills_score,
            interests_score: score.interests_score,
            location_score: score.location_score,
            reasons: Vec::new(),
        }
    }

    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = reasons;
        self
    }
}

/// A topic annotated with its short-window engagement rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingTopic {
    #[serde(flatten)]
    pub topic: Topic,
    pub trending_score: f64,
}
