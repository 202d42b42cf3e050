//! Redis-backed TTL cache for composed feeds.
//!
//! The cache is a side accelerator only: entries expire by TTL and are never
//! explicitly invalidated when topics change, so cached feeds are "fresh
//! within the refresh interval" by design.
//!
//! Cache keys follow the pattern `recommend:{user_id}`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// Black-box key/value cache with TTL-based expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendCache: Send + Sync {
    /// Fetch a serialized value; `None` on miss
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a serialized value with a TTL in seconds
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

/// Cache key for a user's composed feed
pub fn feed_cache_key(user_id: uuid::Uuid) -> String {
    format!("recommend:{}", user_id)
}

/// Redis implementation of [`RecommendCache`]
#[derive(Clone)]
pub struct RedisCache {
    client: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to create Redis connection: {}", e)))?;

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl RecommendCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.client.clone())
            .await
            .map_err(|e| {
                warn!("Redis GET failed for {}: {}", key, e);
                AppError::Cache(e.to_string())
            })?;

        match &value {
            Some(_) => debug!("Cache hit for {}", key),
            None => debug!("Cache miss for {}", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut self.client.clone())
            .await
            .map_err(|e| {
                warn!("Redis SET failed for {}: {}", key, e);
                AppError::Cache(e.to_string())
            })?;

        Ok(())
    }
}
