pub mod hot_score_refresher;

pub use hot_score_refresher::{start_hot_score_refresher, HotScoreRefresherConfig};
