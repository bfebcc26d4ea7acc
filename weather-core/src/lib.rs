//! Core library for the `weather-archive` dashboard.
//!
//! This crate defines:
//! - Query validation and the shared domain models
//! - The archive fetch client with its session cache
//! - Persisted recent queries and configuration
//! - Chart series selection, table pagination and display formatting
//! - The [`Dashboard`] state that ties them together
//!
//! It is used by `weather-archive-cli`, but carries no terminal code itself.

pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod paginate;
pub mod provider;
pub mod recent;
pub mod series;
pub mod table;
pub mod theme;
pub mod validation;

pub use cache::SessionCache;
pub use client::ArchiveClient;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardEvent, View, ViewKind};
pub use error::FetchError;
pub use model::{Channel, DailyRecord, DailyValues, Location, Query, WeatherResult};
pub use paginate::{PageSize, Paginator};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoArchive};
pub use recent::RecentQueries;
pub use series::{ChartData, ChartDataset, SeriesSelection};
pub use theme::Theme;
pub use validation::{Field, QueryForm, ValidationErrors};
