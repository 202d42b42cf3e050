//! Configuration management for the recommendation service.
//!
//! All scoring weights and thresholds are loaded once from the environment
//! and passed into the services as explicit immutable values.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache (Redis) configuration
    pub cache: CacheConfig,
    /// Hot score weights and thresholds
    pub hot_score: HotScoreConfig,
    /// Supply/demand matching weights
    pub matching: MatchConfig,
    /// Personalized feed configuration
    pub recommend: RecommendConfig,
    /// Background job configuration
    pub jobs: JobsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Service name used in logs
    pub service_name: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
}

/// Weights for the decayed hotness score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotScoreConfig {
    pub view_weight: f64,
    pub like_weight: f64,
    pub comment_weight: f64,
    pub bookmark_weight: f64,
    /// Decay exponent applied to (age_hours + 2)
    pub gravity: f64,
    /// Scores above this mark a topic as hot
    pub hot_threshold: f64,
    /// Only topics created within this window are recomputed by the batch
    pub recompute_window_days: i64,
}

impl Default for HotScoreConfig {
    fn default() -> Self {
        Self {
            view_weight: 1.0,
            like_weight: 2.0,
            comment_weight: 3.0,
            bookmark_weight: 2.0,
            gravity: 1.8,
            hot_threshold: 10.0,
            recompute_window_days: 7,
        }
    }
}

/// Weights and threshold for supply/demand matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub skills_weight: f64,
    pub interests_weight: f64,
    pub location_weight: f64,
    /// Results scoring below this are dropped
    pub min_score: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            skills_weight: 0.5,
            interests_weight: 0.3,
            location_weight: 0.2,
            min_score: 0.6,
        }
    }
}

/// Personalized feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// TTL for cached feeds; composed feeds are fresh within this window
    pub refresh_interval_secs: u64,
    /// Default feed size when the caller does not pass a limit
    pub default_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 3600,
            default_limit: 20,
        }
    }
}

/// Background job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Whether the hot score refresher runs at all
    pub hot_score_refresh_enabled: bool,
    /// Seconds between hot score refresh cycles
    pub hot_score_refresh_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            hot_score_refresh_enabled: true,
            hot_score_refresh_interval_secs: 600,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                service_name: std::env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "recommendation-service".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/community".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            hot_score: HotScoreConfig {
                view_weight: parse_env_or_default("HOT_SCORE_VIEW_WEIGHT", 1.0)?,
                like_weight: parse_env_or_default("HOT_SCORE_LIKE_WEIGHT", 2.0)?,
                comment_weight: parse_env_or_default("HOT_SCORE_COMMENT_WEIGHT", 3.0)?,
                bookmark_weight: parse_env_or_default("HOT_SCORE_BOOKMARK_WEIGHT", 2.0)?,
                gravity: parse_env_or_default("HOT_SCORE_GRAVITY", 1.8)?,
                hot_threshold: parse_env_or_default("HOT_SCORE_THRESHOLD", 10.0)?,
                recompute_window_days: std::env::var("HOT_SCORE_RECOMPUTE_WINDOW_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(7),
            },
            matching: MatchConfig {
                skills_weight: parse_env_or_default("MATCH_SKILLS_WEIGHT", 0.5)?,
                interests_weight: parse_env_or_default("MATCH_INTERESTS_WEIGHT", 0.3)?,
                location_weight: parse_env_or_default("MATCH_LOCATION_WEIGHT", 0.2)?,
                min_score: parse_env_or_default("MATCH_MIN_SCORE", 0.6)?,
            },
            recommend: RecommendConfig {
                refresh_interval_secs: std::env::var("RECOMMEND_REFRESH_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3600),
                default_limit: std::env::var("RECOMMEND_DEFAULT_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
            },
            jobs: JobsConfig {
                hot_score_refresh_enabled: std::env::var("HOT_SCORE_REFRESH_ENABLED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
                hot_score_refresh_interval_secs: std::env::var("HOT_SCORE_REFRESH_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(600),
            },
        })
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_weights() {
        let hot = HotScoreConfig::default();
        assert_eq!(hot.view_weight, 1.0);
        assert_eq!(hot.like_weight, 2.0);
        assert_eq!(hot.comment_weight, 3.0);
        assert_eq!(hot.bookmark_weight, 2.0);
        assert_eq!(hot.gravity, 1.8);
        assert_eq!(hot.hot_threshold, 10.0);

        let matching = MatchConfig::default();
        assert_eq!(matching.skills_weight, 0.5);
        assert_eq!(matching.interests_weight, 0.3);
        assert_eq!(matching.location_weight, 0.2);
        assert_eq!(matching.min_score, 0.6);

        assert_eq!(RecommendConfig::default().refresh_interval_secs, 3600);
        assert_eq!(RecommendConfig::default().default_limit, 20);
    }
}
