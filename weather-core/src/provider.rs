use crate::{Config, FetchError, Query, WeatherResult, provider::open_meteo::OpenMeteoArchive};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Source of historical daily series. One call is one upstream request;
/// caching happens a layer above, in [`crate::ArchiveClient`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_daily(&self, query: &Query) -> Result<WeatherResult, FetchError>;
}

/// Construct the archive provider from config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenMeteoArchive::new(config.archive_url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_uses_configured_endpoint() {
        let cfg = Config {
            archive_url: Some("http://localhost:9999/v1/archive".into()),
            ..Default::default()
        };

        let provider = provider_from_config(&cfg);
        assert!(format!("{provider:?}").contains("http://localhost:9999/v1/archive"));
    }
}
