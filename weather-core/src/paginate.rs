//! Row windowing for the table view.

use std::{fmt, ops::{Range, RangeInclusive}};

use serde::{Deserialize, Serialize};

/// Most page-number buttons shown at once.
pub const MAX_PAGE_BUTTONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::Twenty, PageSize::Fifty];

    pub fn rows(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|s| s.rows() == value)
            .ok_or_else(|| anyhow::anyhow!("Unsupported page size {value}. Choose 10, 20 or 50."))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> usize {
        size.rows()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows())
    }
}

/// Current page over a series of `total_rows`.
///
/// `current_page` is 1-based and always within `1..=total_pages()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_rows: usize,
    page_size: PageSize,
    current_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(0, PageSize::default())
    }
}

impl Paginator {
    pub fn new(total_rows: usize, page_size: PageSize) -> Self {
        Self { total_rows, page_size, current_page: 1 }
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(total_rows / page_size)`, never less than 1.
    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size.rows()).max(1)
    }

    /// Row indices shown on the current page, `[start, end)`.
    pub fn visible_range(&self) -> Range<usize> {
        let size = self.page_size.rows();
        let start = ((self.current_page - 1) * size).min(self.total_rows);
        let end = (start + size).min(self.total_rows);
        start..end
    }

    /// Page numbers to render as buttons.
    pub fn page_buttons(&self) -> RangeInclusive<usize> {
        let total = self.total_pages();
        let current = self.current_page;

        if total <= MAX_PAGE_BUTTONS || current <= 3 {
            1..=total.min(MAX_PAGE_BUTTONS)
        } else if current >= total - 2 {
            total - (MAX_PAGE_BUTTONS - 1)..=total
        } else {
            current - 2..=current + 2
        }
    }

    /// Controls are only drawn when there is somewhere to go.
    pub fn needs_controls(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// "Showing 11 to 20 of 23 days".
    pub fn summary(&self) -> String {
        let range = self.visible_range();
        let first = if range.is_empty() { 0 } else { range.start + 1 };
        format!("Showing {first} to {} of {} days", range.end, self.total_rows)
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn first(&mut self) {
        self.go_to(1);
    }

    pub fn previous(&mut self) {
        self.go_to(self.current_page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page + 1);
    }

    pub fn last(&mut self) {
        self.go_to(self.total_pages());
    }

    /// Changing the page size always returns to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    /// New row count; the current page is clamped to the new page range.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.go_to(self.current_page);
    }
}
