pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};

// Re-export the recommendation surface consumed by the orchestration layer
pub use services::{
    CompatibilityScorer, FeedComposer, HotScoreService, HotScorer, InterestProfileBuilder,
    MatchService, TrendingDetector,
};
