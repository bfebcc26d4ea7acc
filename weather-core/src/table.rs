use chrono::NaiveDate;

use crate::{
    format::{TemperatureBand, format_date, format_temperature},
    model::{Channel, WeatherResult},
    paginate::Paginator,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub band: TemperatureBand,
}

impl TableCell {
    fn new(value: Option<f64>) -> Self {
        Self { text: format_temperature(value), band: TemperatureBand::of(value) }
    }
}

/// One day of the table, cells in [`Channel::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub label: String,
    pub cells: Vec<TableCell>,
}

/// `Date` followed by each channel's column header.
pub fn headers() -> Vec<&'static str> {
    std::iter::once("Date").chain(Channel::ALL.iter().map(Channel::column_header)).collect()
}

/// Rows of the paginator's current page.
pub fn table_rows(result: &WeatherResult, paginator: &Paginator) -> Vec<TableRow> {
    let range = paginator.visible_range();
    let end = range.end.min(result.len());
    let start = range.start.min(end);

    result.series[start..end]
        .iter()
        .map(|record| TableRow {
            date: record.date,
            label: format_date(record.date),
            cells: Channel::ALL.iter().map(|c| TableCell::new(record.values.get(*c))).collect(),
        })
        .collect()
}
