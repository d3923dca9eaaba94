//! Sources of declared dividend tables.
//!
//! New ASB, EPF and Tabung Haji rates are announced once a year. A
//! [`RateProvider`] lets callers pull the tables from wherever they keep them
//! (a JSON file, a database, a remote service) and feed them into
//! [`TabungConfig::from_provider`](crate::config::TabungConfig::from_provider).

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::rates::RateTables;
use crate::types::TabungError;

/// Fetches the current set of rate tables.
#[async_trait::async_trait]
pub trait RateProvider {
    async fn get_rate_tables(&self) -> Result<RateTables, TabungError>;
}

/// Serves a fixed set of tables. Useful for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    tables: RateTables,
}

impl StaticRateProvider {
    pub fn new(tables: RateTables) -> Result<Self, TabungError> {
        tables.validate()?;
        Ok(Self { tables })
    }
}

#[async_trait::async_trait]
impl RateProvider for StaticRateProvider {
    async fn get_rate_tables(&self) -> Result<RateTables, TabungError> {
        Ok(self.tables.clone())
    }
}

/// Reads tables from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileRateProvider {
    path: String,
}

impl JsonFileRateProvider {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl RateProvider for JsonFileRateProvider {
    async fn get_rate_tables(&self) -> Result<RateTables, TabungError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TabungError::configuration(format!("Failed to read rate tables {}: {}", self.path, e))
        })?;
        let tables: RateTables = serde_json::from_str(&content).map_err(|e| {
            TabungError::configuration(format!("Invalid rate tables in {}: {}", self.path, e))
        })?;
        tables.validate()?;
        tracing::debug!(path = %self.path, "loaded rate tables");
        Ok(tables)
    }
}

/// Decorator that reuses fetched tables until the TTL expires.
#[derive(Debug, Clone)]
pub struct CachedRateProvider<P> {
    inner: P,
    cache: Arc<RwLock<Option<(Instant, RateTables)>>>,
    ttl: Duration,
}

impl<P> CachedRateProvider<P> {
    pub fn new(inner: P, ttl_seconds: u64) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(None)),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Drops the cached tables so the next fetch hits the inner provider.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
    }
}

#[async_trait::async_trait]
impl<P: RateProvider + Send + Sync> RateProvider for CachedRateProvider<P> {
    async fn get_rate_tables(&self) -> Result<RateTables, TabungError> {
        if let Ok(guard) = self.cache.read()
            && let Some((fetched_at, tables)) = &*guard
            && fetched_at.elapsed() < self.ttl
        {
            return Ok(tables.clone());
        }

        let fresh = self.inner.get_rate_tables().await?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some((Instant::now(), fresh.clone()));
        }
        Ok(fresh)
    }
}
