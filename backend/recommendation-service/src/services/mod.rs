pub mod compatibility;
pub mod feed;
pub mod hot_score;
pub mod interest;
pub mod matching;
pub mod trending;

pub use compatibility::CompatibilityScorer;
pub use feed::FeedComposer;
pub use hot_score::{HotScoreService, HotScorer};
pub use interest::InterestProfileBuilder;
pub use matching::MatchService;
pub use trending::TrendingDetector;
