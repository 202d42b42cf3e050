// Utility functions for recommendation-service

/// Round a score to 2 decimal places (the precision all exposed scores use)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Age of a timestamp in fractional hours, floored at zero
pub fn age_hours(
    created_at: chrono::DateTime<chrono::Utc>,
    now: chrono::DateTime<chrono::Utc>,
) -> f64 {
    let secs = (now - created_at).num_seconds();
    (secs.max(0) as f64) / 3600.0
}
