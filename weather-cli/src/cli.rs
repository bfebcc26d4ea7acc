use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use weather_core::{
    ArchiveClient, Channel, Config, Dashboard, DashboardEvent, PageSize, QueryForm,
    RecentQueries, SeriesSelection, SessionCache, Theme, ViewKind,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-archive", version, about = "Historical daily temperature dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and show daily temperatures for a coordinate and date range.
    Show {
        /// Latitude in degrees, -90 to 90.
        #[arg(long, allow_hyphen_values = true)]
        latitude: String,

        /// Longitude in degrees, -180 to 180.
        #[arg(long, allow_hyphen_values = true)]
        longitude: String,

        /// First day, YYYY-MM-DD.
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD; not after today.
        #[arg(long)]
        end: String,

        /// Table page to show.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page: 10, 20 or 50.
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<PageSize>,

        /// Chart series to draw, e.g. `temperature_2m_max`. Repeatable.
        #[arg(long = "series", value_parser = parse_channel)]
        series: Vec<Channel>,
    },

    /// List recent queries, or re-run one of them.
    Recent {
        /// 1-based entry to re-run.
        #[arg(long, conflicts_with = "clear")]
        select: Option<usize>,

        /// Forget all recent queries.
        #[arg(long)]
        clear: bool,
    },

    /// Show or set the colour theme.
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeChoice>,
    },

    /// Prompt for queries and browse results interactively.
    Interactive,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
    /// Follow the terminal's background.
    System,
}

fn parse_page_size(value: &str) -> Result<PageSize, String> {
    let rows: usize = value.parse().map_err(|_| format!("'{value}' is not a number"))?;
    PageSize::try_from(rows).map_err(|e| e.to_string())
}

fn parse_channel(value: &str) -> Result<Channel, String> {
    value.parse::<Channel>().map_err(|e| e.to_string())
}

/// Build the dashboard for this session: fresh cache, persisted recent queries.
pub fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let recent_path = RecentQueries::default_path()?;
    debug!(archive = %config.archive_url(), recent = %recent_path.display(), "opening dashboard");

    let recent = RecentQueries::load(recent_path);
    let client = ArchiveClient::from_config(config, SessionCache::new());
    let mut dashboard = Dashboard::new(client, recent, config.page_size());

    dashboard.subscribe(|event| {
        if let DashboardEvent::ViewChanged(ViewKind::Loading) = event {
            eprintln!("Loading weather data...");
        }
    });

    Ok(dashboard)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Show { latitude, longitude, start, end, page, page_size, series } => {
                let mut dashboard = open_dashboard(&config)?;

                if !series.is_empty() {
                    dashboard.set_selection(SeriesSelection::from_channels(series));
                }

                let form = QueryForm::new(latitude, longitude, start, end);
                if let Err(errors) = dashboard.submit(&form).await {
                    render::print_validation_errors(&errors);
                    bail!("Invalid input");
                }
                if let Some(message) = dashboard.error() {
                    return Err(anyhow!(message.to_string()));
                }

                if let Some(size) = page_size {
                    dashboard.set_page_size(size);
                }
                dashboard.go_to_page(page);

                render::print_dashboard(&dashboard, config.theme());
            }

            Command::Recent { select, clear } => {
                if clear {
                    let mut recent = RecentQueries::load(RecentQueries::default_path()?);
                    recent.clear()?;
                    println!("Recent queries cleared.");
                    return Ok(());
                }

                let mut dashboard = open_dashboard(&config)?;

                let Some(n) = select else {
                    render::print_recent(dashboard.recent());
                    return Ok(());
                };

                let index = n.checked_sub(1).context("Recent entries are numbered from 1")?;
                if !dashboard.select_recent(index).await {
                    bail!("No recent query #{n}. Run `weather-archive recent` to list them.");
                }
                if let Some(message) = dashboard.error() {
                    return Err(anyhow!(message.to_string()));
                }

                render::print_dashboard(&dashboard, config.theme());
            }

            Command::Theme { mode } => {
                let theme = match mode {
                    None => {
                        let source = if config.dark_mode.is_some() { "saved" } else { "system" };
                        println!("Theme: {} ({source})", config.theme());
                        return Ok(());
                    }
                    Some(ThemeChoice::Light) => set_theme(&mut config, Some(false)),
                    Some(ThemeChoice::Dark) => set_theme(&mut config, Some(true)),
                    Some(ThemeChoice::System) => set_theme(&mut config, None),
                    Some(ThemeChoice::Toggle) => config.toggle_theme(),
                };

                config.save()?;
                println!("Theme set to {theme}.");
            }

            Command::Interactive => {
                interactive::run(config).await?;
            }
        }

        Ok(())
    }
}

fn set_theme(config: &mut Config, dark: Option<bool>) -> Theme {
    config.set_dark_mode(dark);
    config.theme()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_accepts_negative_coordinates_and_series() {
        let cli = Cli::try_parse_from([
            "weather-archive",
            "show",
            "--latitude",
            "-33.87",
            "--longitude",
            "-151.2",
            "--start",
            "2023-01-01",
            "--end",
            "2023-01-31",
            "--page-size",
            "20",
            "--series",
            "apparent_temperature_max",
        ])
        .unwrap();

        match cli.command {
            Command::Show { latitude, longitude, page, page_size, series, .. } => {
                assert_eq!(latitude, "-33.87");
                assert_eq!(longitude, "-151.2");
                assert_eq!(page, 1);
                assert_eq!(page_size, Some(PageSize::Twenty));
                assert_eq!(series, vec![Channel::ApparentTemperatureMax]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_rejects_unsupported_page_size() {
        let err = Cli::try_parse_from([
            "weather-archive", "show", "--latitude", "0", "--longitude", "0", "--start",
            "2023-01-01", "--end", "2023-01-02", "--page-size", "15",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported page size"));
    }

    #[test]
    fn recent_select_conflicts_with_clear() {
        assert!(Cli::try_parse_from(["weather-archive", "recent", "--select", "1", "--clear"]).is_err());
    }
}
