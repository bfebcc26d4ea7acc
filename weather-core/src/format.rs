//! Pure value-to-presentation mappings.

use chrono::NaiveDate;

use crate::model::Query;

/// `"Mon, Jan 1, 2023"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

/// One decimal place, or `N/A` for a missing observation.
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "N/A".to_string(),
    }
}

/// Colour class of a temperature cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureBand {
    Missing,
    Cold,
    Mild,
    Hot,
}

impl TemperatureBand {
    pub const HOT_ABOVE: f64 = 30.0;
    pub const COLD_BELOW: f64 = 0.0;

    pub fn of(value: Option<f64>) -> Self {
        match value {
            None => Self::Missing,
            Some(v) if v > Self::HOT_ABOVE => Self::Hot,
            Some(v) if v < Self::COLD_BELOW => Self::Cold,
            Some(_) => Self::Mild,
        }
    }
}

/// `"40.71, -74.00"`.
pub fn coordinate_label(query: &Query) -> String {
    format!("{:.2}, {:.2}", query.latitude(), query.longitude())
}

/// `"Sun, Jan 1, 2023 to Tue, Jan 3, 2023"`.
pub fn date_range_label(query: &Query) -> String {
    format!("{} to {}", format_date(query.start_date()), format_date(query.end_date()))
}
