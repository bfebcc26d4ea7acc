use std::fmt;

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use weather_core::{
    Channel, Config, Dashboard, DashboardEvent, PageSize, QueryForm, ViewKind,
    format::{coordinate_label, date_range_label},
};

use crate::{cli::open_dashboard, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    NewQuery,
    Recent,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    PageSize,
    ToggleSeries,
    ToggleTheme,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::NewQuery => "New query",
            Action::Recent => "Recent searches",
            Action::NextPage => "Next page",
            Action::PreviousPage => "Previous page",
            Action::FirstPage => "First page",
            Action::LastPage => "Last page",
            Action::PageSize => "Rows per page",
            Action::ToggleSeries => "Toggle chart series",
            Action::ToggleTheme => "Toggle dark mode",
            Action::Quit => "Quit",
        })
    }
}

/// Actions that make sense for the current state.
fn actions(dashboard: &Dashboard) -> Vec<Action> {
    let mut out = vec![Action::NewQuery];
    if !dashboard.recent().is_empty() {
        out.push(Action::Recent);
    }

    if dashboard.result().is_some() {
        let p = dashboard.paginator();
        if p.has_next() {
            out.push(Action::NextPage);
        }
        if p.has_previous() {
            out.push(Action::PreviousPage);
        }
        if p.needs_controls() {
            out.extend([Action::FirstPage, Action::LastPage]);
        }
        out.extend([Action::PageSize, Action::ToggleSeries]);
    }

    out.extend([Action::ToggleTheme, Action::Quit]);
    out
}

struct SeriesChoice {
    channel: Channel,
    visible: bool,
}

impl fmt::Display for SeriesChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.visible { "x" } else { " " };
        write!(f, "[{mark}] {}", self.channel.label())
    }
}

struct RecentChoice {
    index: usize,
    label: String,
}

impl fmt::Display for RecentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Esc and Ctrl-C end the prompt without it being an error.
fn cancelled(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

fn prompt_form(previous: &QueryForm) -> Result<QueryForm, InquireError> {
    let latitude = Text::new("Latitude:")
        .with_placeholder("Enter latitude (-90 to 90)")
        .with_initial_value(&previous.latitude)
        .prompt()?;
    let longitude = Text::new("Longitude:")
        .with_placeholder("Enter longitude (-180 to 180)")
        .with_initial_value(&previous.longitude)
        .prompt()?;
    let start_date = Text::new("Start date:")
        .with_placeholder("YYYY-MM-DD")
        .with_initial_value(&previous.start_date)
        .prompt()?;
    let end_date = Text::new("End date:")
        .with_placeholder("YYYY-MM-DD")
        .with_initial_value(&previous.end_date)
        .prompt()?;

    Ok(QueryForm { latitude, longitude, start_date, end_date })
}

pub async fn run(mut config: Config) -> Result<()> {
    let mut dashboard = open_dashboard(&config)?;
    dashboard.subscribe(|event| {
        if let DashboardEvent::Notification(message) = event {
            eprintln!("! {message}");
        }
    });

    let mut form = QueryForm::default();
    render::print_dashboard(&dashboard, config.theme());

    loop {
        let action = match Select::new("What next?", actions(&dashboard)).prompt() {
            Ok(action) => action,
            Err(err) if cancelled(&err) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::NewQuery => {
                form = match prompt_form(&form) {
                    Ok(form) => form,
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                };
                if let Err(errors) = dashboard.submit(&form).await {
                    render::print_validation_errors(&errors);
                    continue;
                }
            }
            Action::Recent => {
                let choices: Vec<_> = dashboard
                    .recent()
                    .iter()
                    .enumerate()
                    .map(|(index, q)| RecentChoice {
                        index,
                        label: format!("{}  {}", coordinate_label(q), date_range_label(q)),
                    })
                    .collect();

                match Select::new("Recent searches", choices).prompt() {
                    Ok(choice) => {
                        dashboard.select_recent(choice.index).await;
                    }
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                }
            }
            Action::NextPage => dashboard.next_page(),
            Action::PreviousPage => dashboard.previous_page(),
            Action::FirstPage => dashboard.first_page(),
            Action::LastPage => dashboard.last_page(),
            Action::PageSize => {
                let current = PageSize::ALL
                    .iter()
                    .position(|s| *s == dashboard.paginator().page_size())
                    .unwrap_or(0);
                match Select::new("Rows per page", PageSize::ALL.to_vec())
                    .with_starting_cursor(current)
                    .prompt()
                {
                    Ok(size) => dashboard.set_page_size(size),
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                }
            }
            Action::ToggleSeries => {
                let choices: Vec<_> = Channel::ALL
                    .into_iter()
                    .map(|channel| SeriesChoice {
                        channel,
                        visible: dashboard.selection().is_visible(channel),
                    })
                    .collect();
                match Select::new("Toggle series", choices).prompt() {
                    Ok(choice) => dashboard.toggle_series(choice.channel),
                    Err(err) if cancelled(&err) => continue,
                    Err(err) => return Err(err.into()),
                }
            }
            Action::ToggleTheme => {
                let theme = config.toggle_theme();
                config.save()?;
                println!("Theme set to {theme}.");
            }
            Action::Quit => break,
        }

        if dashboard.view().kind() != ViewKind::Idle {
            render::print_dashboard(&dashboard, config.theme());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_choice_shows_visibility() {
        let on = SeriesChoice { channel: Channel::TemperatureMax, visible: true };
        let off = SeriesChoice { channel: Channel::ApparentTemperatureMin, visible: false };
        assert_eq!(on.to_string(), "[x] Max Temperature");
        assert_eq!(off.to_string(), "[ ] Min Apparent Temperature");
    }

    #[test]
    fn action_labels() {
        assert_eq!(Action::PageSize.to_string(), "Rows per page");
        assert_eq!(Action::Quit.to_string(), "Quit");
    }
}
