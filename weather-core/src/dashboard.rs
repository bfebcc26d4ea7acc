//! Dashboard state: one query result projected into a chart and a paged table.
//!
//! State changes are announced to subscribers as [`DashboardEvent`]s; a
//! subscriber re-reads whatever slice of state it renders. Submissions take
//! `&mut self`, so at most one fetch is in flight per dashboard.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    client::ArchiveClient,
    model::{Channel, Query, WeatherResult},
    paginate::{PageSize, Paginator},
    recent::RecentQueries,
    series::{ChartData, SeriesSelection, chart_data},
    table::{TableRow, table_rows},
    validation::{self, QueryForm, ValidationErrors},
};

/// What the main panel is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Nothing requested yet.
    Idle,
    Loading,
    Failed(String),
    Loaded(Arc<WeatherResult>),
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Idle => ViewKind::Idle,
            View::Loading => ViewKind::Loading,
            View::Failed(_) => ViewKind::Failed,
            View::Loaded(_) => ViewKind::Loaded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Idle,
    Loading,
    Failed,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    ViewChanged(ViewKind),
    RecentChanged,
    SelectionChanged,
    PageChanged,
    /// Transient message for a toast/notification area.
    Notification(String),
}

type Listener = Box<dyn FnMut(&DashboardEvent) + Send>;

pub struct Dashboard {
    client: ArchiveClient,
    recent: RecentQueries,
    selection: SeriesSelection,
    paginator: Paginator,
    view: View,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("client", &self.client)
            .field("recent", &self.recent)
            .field("selection", &self.selection)
            .field("paginator", &self.paginator)
            .field("view", &self.view)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Dashboard {
    pub fn new(client: ArchiveClient, recent: RecentQueries, page_size: PageSize) -> Self {
        Self {
            client,
            recent,
            selection: SeriesSelection::default(),
            paginator: Paginator::new(0, page_size),
            view: View::Idle,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DashboardEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: DashboardEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn set_view(&mut self, view: View) {
        let kind = view.kind();
        self.view = view;
        self.emit(DashboardEvent::ViewChanged(kind));
    }

    /// Validate the form; when it passes, run the query.
    ///
    /// Validation errors block the fetch and leave state untouched. Fetch
    /// failures are reported through the view, not the return value.
    pub async fn submit(&mut self, form: &QueryForm) -> Result<(), ValidationErrors> {
        let query = validation::validate(form)?;
        self.run_query(query).await;
        Ok(())
    }

    /// Re-run entry `index` of the recent list. Returns `false` if there is none.
    pub async fn select_recent(&mut self, index: usize) -> bool {
        match self.recent.get(index).copied() {
            Some(query) => {
                self.run_query(query).await;
                true
            }
            None => false,
        }
    }

    /// Fetch `query` and replace the current result wholesale.
    pub async fn run_query(&mut self, query: Query) {
        self.set_view(View::Loading);

        match self.client.fetch(&query).await {
            Ok(result) => {
                info!(days = result.len(), "query loaded");
                self.paginator = Paginator::new(result.len(), self.paginator.page_size());
                self.set_view(View::Loaded(result));
                self.emit(DashboardEvent::PageChanged);

                if let Err(err) = self.recent.record(query) {
                    warn!(error = %err, "failed to persist recent queries");
                }
                self.emit(DashboardEvent::RecentChanged);
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, "query failed");
                self.set_view(View::Failed(message.clone()));
                self.emit(DashboardEvent::Notification(message));
            }
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        match &self.view {
            View::Loaded(result) => Some(result.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.view {
            View::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn recent(&self) -> &[Query] {
        self.recent.list()
    }

    pub fn selection(&self) -> &SeriesSelection {
        &self.selection
    }

    pub fn toggle_series(&mut self, channel: Channel) {
        self.selection.toggle(channel);
        self.emit(DashboardEvent::SelectionChanged);
    }

    pub fn set_selection(&mut self, selection: SeriesSelection) {
        self.selection = selection;
        self.emit(DashboardEvent::SelectionChanged);
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    fn update_page(&mut self, f: impl FnOnce(&mut Paginator)) {
        let before = self.paginator;
        f(&mut self.paginator);
        if self.paginator != before {
            self.emit(DashboardEvent::PageChanged);
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.update_page(|p| p.set_page_size(size));
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.update_page(|p| p.go_to(page));
    }

    pub fn first_page(&mut self) {
        self.update_page(Paginator::first);
    }

    pub fn previous_page(&mut self) {
        self.update_page(Paginator::previous);
    }

    pub fn next_page(&mut self) {
        self.update_page(Paginator::next);
    }

    pub fn last_page(&mut self) {
        self.update_page(Paginator::last);
    }

    /// Chart projection of the loaded result.
    pub fn chart(&self) -> Option<ChartData> {
        self.result().map(|r| chart_data(r, &self.selection))
    }

    /// Table rows for the current page; empty unless a result is loaded.
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.result().map(|r| table_rows(r, &self.paginator)).unwrap_or_default()
    }
}
