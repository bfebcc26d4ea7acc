//! Which of the six channels the chart draws, and the datasets it draws from them.

use std::collections::BTreeSet;

use crate::{
    format::format_date,
    model::{Channel, Rgb, WeatherResult},
};

/// Visible chart channels. Starts at max/min/mean each session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelection {
    visible: BTreeSet<Channel>,
}

impl Default for SeriesSelection {
    fn default() -> Self {
        Self::from_channels([
            Channel::TemperatureMax,
            Channel::TemperatureMin,
            Channel::TemperatureMean,
        ])
    }
}

impl SeriesSelection {
    pub fn from_channels(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self { visible: channels.into_iter().collect() }
    }

    /// Symmetric difference with `{channel}`.
    pub fn toggle(&mut self, channel: Channel) {
        if !self.visible.remove(&channel) {
            self.visible.insert(channel);
        }
    }

    pub fn is_visible(&self, channel: Channel) -> bool {
        self.visible.contains(&channel)
    }

    /// Visible channels in fixed display order.
    pub fn visible_channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.visible.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// One line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub channel: Channel,
    pub label: &'static str,
    pub color: Rgb,
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    /// Formatted date per x position.
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Lowest and highest present value over every dataset.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.datasets
            .iter()
            .flat_map(|d| d.points.iter().flatten().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Project `result` into chart datasets for the selected channels.
/// An empty selection gives labels with zero datasets.
pub fn chart_data(result: &WeatherResult, selection: &SeriesSelection) -> ChartData {
    let labels = result.dates().map(format_date).collect();
    let datasets = selection
        .visible_channels()
        .map(|channel| ChartDataset {
            channel,
            label: channel.label(),
            color: channel.color(),
            points: result.channel(channel).collect(),
        })
        .collect();

    ChartData { labels, datasets }
}
