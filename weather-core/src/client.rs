use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    cache::SessionCache,
    config::Config,
    error::FetchError,
    model::{Query, WeatherResult},
    provider::{WeatherProvider, provider_from_config},
};

/// Fetch client: session cache first, otherwise exactly one upstream request.
///
/// Cache hits are returned as-is with no revalidation. Only fully converted,
/// aligned results are ever stored.
#[derive(Debug)]
pub struct ArchiveClient {
    provider: Box<dyn WeatherProvider>,
    cache: SessionCache,
}

impl ArchiveClient {
    pub fn new(provider: Box<dyn WeatherProvider>, cache: SessionCache) -> Self {
        Self { provider, cache }
    }

    pub fn from_config(config: &Config, cache: SessionCache) -> Self {
        Self::new(provider_from_config(config), cache)
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, query: &Query) -> Result<Arc<WeatherResult>, FetchError> {
        if let Some(hit) = self.cache.get(query) {
            debug!(days = hit.len(), "cache hit");
            return Ok(hit);
        }

        debug!("cache miss");
        let result = Arc::new(self.provider.fetch_daily(query).await?);
        self.cache.put(query, Arc::clone(&result));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn fetch_daily(&self, query: &Query) -> Result<WeatherResult, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Http { status: 500, reason: "boom".into() });
            }
            Ok(WeatherResult {
                location: Location {
                    latitude: query.latitude(),
                    longitude: query.longitude(),
                    elevation: 0.0,
                    timezone: "GMT".into(),
                    timezone_abbreviation: "GMT".into(),
                    utc_offset_seconds: 0,
                },
                series: Vec::new(),
            })
        }
    }

    fn query() -> Query {
        let d = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Query { latitude: 1.0, longitude: 2.0, start_date: d, end_date: d }
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider { calls: Arc::clone(&calls), fail: false };
        let client = ArchiveClient::new(Box::new(provider), SessionCache::new());

        let first = client.fetch(&query()).await.unwrap();
        let second = client.fetch(&query()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider { calls: Arc::clone(&calls), fail: true };
        let client = ArchiveClient::new(Box::new(provider), SessionCache::new());

        assert!(client.fetch(&query()).await.is_err());
        assert!(client.fetch(&query()).await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(client.cache().is_empty());
    }
}
