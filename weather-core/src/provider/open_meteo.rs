use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    error::FetchError,
    model::{Channel, DailyRecord, DailyValues, Location, Query, WeatherResult},
};

use super::WeatherProvider;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Open-Meteo historical archive. Single attempt per call, transport-default timeouts.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    base_url: String,
    http: Client,
}

impl OpenMeteoArchive {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    fn query_params(query: &Query) -> Vec<(&'static str, String)> {
        let daily: Vec<_> = Channel::ALL.iter().map(Channel::api_name).collect();

        vec![
            ("latitude", query.latitude().to_string()),
            ("longitude", query.longitude().to_string()),
            ("start_date", query.start_date().format("%Y-%m-%d").to_string()),
            ("end_date", query.end_date().format("%Y-%m-%d").to_string()),
            ("daily", daily.join(",")),
            ("timezone", "auto".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
    #[serde(default)]
    utc_offset_seconds: i32,
    daily: ArchiveDaily,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    temperature_2m_mean: Vec<Option<f64>>,
    apparent_temperature_max: Vec<Option<f64>>,
    apparent_temperature_min: Vec<Option<f64>>,
    apparent_temperature_mean: Vec<Option<f64>>,
}

impl ArchiveDaily {
    fn column(&self, channel: Channel) -> &[Option<f64>] {
        match channel {
            Channel::TemperatureMax => &self.temperature_2m_max,
            Channel::TemperatureMin => &self.temperature_2m_min,
            Channel::TemperatureMean => &self.temperature_2m_mean,
            Channel::ApparentTemperatureMax => &self.apparent_temperature_max,
            Channel::ApparentTemperatureMin => &self.apparent_temperature_min,
            Channel::ApparentTemperatureMean => &self.apparent_temperature_mean,
        }
    }
}

impl ArchiveResponse {
    /// Check channel alignment and convert to the domain model.
    fn into_result(self) -> Result<WeatherResult, FetchError> {
        let daily = &self.daily;
        let days = daily.time.len();

        for channel in Channel::ALL {
            let len = daily.column(channel).len();
            if len != days {
                return Err(FetchError::MalformedResponse(format!(
                    "{} has {len} values but time has {days}",
                    channel.api_name()
                )));
            }
        }

        let series = daily
            .time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    FetchError::MalformedResponse(format!("invalid date '{raw}' at index {i}"))
                })?;

                Ok(DailyRecord {
                    date,
                    values: DailyValues {
                        max_temp: daily.temperature_2m_max[i],
                        min_temp: daily.temperature_2m_min[i],
                        mean_temp: daily.temperature_2m_mean[i],
                        max_apparent: daily.apparent_temperature_max[i],
                        min_apparent: daily.apparent_temperature_min[i],
                        mean_apparent: daily.apparent_temperature_mean[i],
                    },
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(WeatherResult {
            location: Location {
                latitude: self.latitude,
                longitude: self.longitude,
                elevation: self.elevation,
                timezone: self.timezone,
                timezone_abbreviation: self.timezone_abbreviation,
                utc_offset_seconds: self.utc_offset_seconds,
            },
            series,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoArchive {
    #[instrument(skip(self), level = "info")]
    async fn fetch_daily(&self, query: &Query) -> Result<WeatherResult, FetchError> {
        info!(url = %self.base_url, "requesting daily archive data");

        let res = self
            .http
            .get(&self.base_url)
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let err = FetchError::from_status(status, &body);
            warn!(status = status.as_u16(), error = %err, "archive request failed");
            return Err(err);
        }

        let parsed: ArchiveResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(format!("invalid archive JSON: {e}")))?;

        parsed.into_result()
    }
}
