use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationErrors};

/// A validated coordinate and date range. One query drives one archive lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
}

impl Query {
    /// Build a query from already-parsed values, applying the same range
    /// checks as form validation against today's date.
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, ValidationErrors> {
        validation::check_query(latitude, longitude, start_date, end_date, validation::today())
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// One of the six daily temperature series the archive is asked for.
///
/// Declaration order is the fixed display order for chart datasets and table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[serde(rename = "temperature_2m_max")]
    TemperatureMax,
    #[serde(rename = "temperature_2m_min")]
    TemperatureMin,
    #[serde(rename = "temperature_2m_mean")]
    TemperatureMean,
    ApparentTemperatureMax,
    ApparentTemperatureMin,
    ApparentTemperatureMean,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::TemperatureMax,
        Channel::TemperatureMin,
        Channel::TemperatureMean,
        Channel::ApparentTemperatureMax,
        Channel::ApparentTemperatureMin,
        Channel::ApparentTemperatureMean,
    ];

    /// Variable name used by the archive API (`daily=` parameter and response keys).
    pub fn api_name(&self) -> &'static str {
        match self {
            Channel::TemperatureMax => "temperature_2m_max",
            Channel::TemperatureMin => "temperature_2m_min",
            Channel::TemperatureMean => "temperature_2m_mean",
            Channel::ApparentTemperatureMax => "apparent_temperature_max",
            Channel::ApparentTemperatureMin => "apparent_temperature_min",
            Channel::ApparentTemperatureMean => "apparent_temperature_mean",
        }
    }

    /// Chart legend label.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::TemperatureMax => "Max Temperature",
            Channel::TemperatureMin => "Min Temperature",
            Channel::TemperatureMean => "Mean Temperature",
            Channel::ApparentTemperatureMax => "Max Apparent Temperature",
            Channel::ApparentTemperatureMin => "Min Apparent Temperature",
            Channel::ApparentTemperatureMean => "Mean Apparent Temperature",
        }
    }

    /// Table column header.
    pub fn column_header(&self) -> &'static str {
        match self {
            Channel::TemperatureMax => "Max Temp (°C)",
            Channel::TemperatureMin => "Min Temp (°C)",
            Channel::TemperatureMean => "Mean Temp (°C)",
            Channel::ApparentTemperatureMax => "Max Apparent (°C)",
            Channel::ApparentTemperatureMin => "Min Apparent (°C)",
            Channel::ApparentTemperatureMean => "Mean Apparent (°C)",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Channel::TemperatureMax => Rgb(255, 99, 132),
            Channel::TemperatureMin => Rgb(54, 162, 235),
            Channel::TemperatureMean => Rgb(75, 192, 192),
            Channel::ApparentTemperatureMax => Rgb(255, 159, 64),
            Channel::ApparentTemperatureMin => Rgb(153, 102, 255),
            Channel::ApparentTemperatureMean => Rgb(201, 203, 207),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();

        Channel::ALL
            .into_iter()
            .find(|c| c.api_name() == lower)
            .ok_or_else(|| {
                let names: Vec<_> = Channel::ALL.iter().map(Channel::api_name).collect();
                anyhow::anyhow!("Unknown channel '{value}'. Supported channels: {}.", names.join(", "))
            })
    }
}

/// Fixed series colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Where the archive resolved the query to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
}

/// The six channel values for a single day; `None` marks a missing observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyValues {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub mean_temp: Option<f64>,
    pub max_apparent: Option<f64>,
    pub min_apparent: Option<f64>,
    pub mean_apparent: Option<f64>,
}

impl DailyValues {
    pub fn get(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::TemperatureMax => self.max_temp,
            Channel::TemperatureMin => self.min_temp,
            Channel::TemperatureMean => self.mean_temp,
            Channel::ApparentTemperatureMax => self.max_apparent,
            Channel::ApparentTemperatureMin => self.min_apparent,
            Channel::ApparentTemperatureMean => self.mean_apparent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub values: DailyValues,
}

/// Full aligned daily series for one query.
///
/// Every record carries a date and all six channels, so channel alignment
/// holds by construction once a response has been accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location: Location,
    pub series: Vec<DailyRecord>,
}

impl WeatherResult {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.series.iter().map(|r| r.date)
    }

    /// All values of one channel, index-aligned with [`WeatherResult::dates`].
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = Option<f64>> + '_ {
        self.series.iter().map(move |r| r.values.get(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_api_name_roundtrip() {
        for channel in Channel::ALL {
            let parsed: Channel = channel.api_name().parse().expect("roundtrip should succeed");
            assert_eq!(channel, parsed);
        }
    }

    #[test]
    fn unknown_channel_error() {
        let err = "humidity".parse::<Channel>().unwrap_err();
        assert!(err.to_string().contains("Unknown channel"));
    }

    #[test]
    fn channel_serde_uses_api_names() {
        let json = serde_json::to_string(&Channel::ApparentTemperatureMin).unwrap();
        assert_eq!(json, "\"apparent_temperature_min\"");

        let json = serde_json::to_string(&Channel::TemperatureMax).unwrap();
        assert_eq!(json, "\"temperature_2m_max\"");
    }

    #[test]
    fn rgb_displays_css_style() {
        assert_eq!(Channel::TemperatureMax.color().to_string(), "rgb(255, 99, 132)");
    }

    #[test]
    fn channel_iterator_is_index_aligned() {
        let day = |d: u32, max: Option<f64>| DailyRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, d).unwrap(),
            values: DailyValues { max_temp: max, ..Default::default() },
        };
        let result = WeatherResult {
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
                elevation: 0.0,
                timezone: "GMT".into(),
                timezone_abbreviation: "GMT".into(),
                utc_offset_seconds: 0,
            },
            series: vec![day(1, Some(1.5)), day(2, None)],
        };

        let max: Vec<_> = result.channel(Channel::TemperatureMax).collect();
        assert_eq!(max, vec![Some(1.5), None]);
        assert_eq!(result.dates().count(), 2);
    }
}
