use serde::{Deserialize, Serialize};

use super::{paginate, sort, PageState, SortDirection, SortState};
use crate::records::Fielded;

/// Header-click state of one table. Once a header has been clicked the table
/// never returns to `Unsorted` except through [`TableView::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "field", rename_all = "camelCase")]
pub enum SortPhase {
    #[default]
    Unsorted,
    Ascending(String),
    Descending(String),
}

impl SortPhase {
    pub fn clicked(&self, field: &str) -> SortPhase {
        match self {
            SortPhase::Ascending(current) if current == field => {
                SortPhase::Descending(field.to_string())
            }
            _ => SortPhase::Ascending(field.to_string()),
        }
    }

    pub fn sort_state(&self) -> SortState {
        match self {
            SortPhase::Unsorted => SortState::default(),
            SortPhase::Ascending(field) => SortState::by(field.clone(), SortDirection::Asc),
            SortPhase::Descending(field) => SortState::by(field.clone(), SortDirection::Desc),
        }
    }

    /// Arrow shown next to the active column header.
    pub fn indicator(&self, field: &str) -> Option<&'static str> {
        match self {
            SortPhase::Ascending(current) if current == field => Some("↑"),
            SortPhase::Descending(current) if current == field => Some("↓"),
            _ => None,
        }
    }
}

/// One rendered page, detached from the record collection it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePage<T> {
    pub rows: Vec<T>,
    pub current_page: usize,
    pub rows_per_page: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> TablePage<T> {
    /// `"21-23 of 23"`, or `"0 of 0"` for an empty table.
    pub fn range_label(&self) -> String {
        if self.total_count == 0 || self.rows.is_empty() {
            format!("0 of {}", self.total_count)
        } else {
            format!(
                "{}-{} of {}",
                self.first_index, self.last_index, self.total_count
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    sort: SortPhase,
    page: PageState,
}

impl TableView {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            sort: SortPhase::Unsorted,
            page: PageState::new(1, rows_per_page),
        }
    }

    pub fn sort_phase(&self) -> &SortPhase {
        &self.sort
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn click_header(&mut self, field: &str) {
        self.sort = self.sort.clicked(field);
        self.page.current_page = 1;
    }

    /// Back to unsorted, first page. Used when the table switches collections.
    pub fn reset(&mut self) {
        self.sort = SortPhase::Unsorted;
        self.page.current_page = 1;
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.page = PageState::new(1, rows_per_page);
    }

    pub fn total_pages(&self, total_count: usize) -> usize {
        total_count.div_ceil(self.page.rows_per_page)
    }

    /// Moves to `page`, clamped to `1..=max(1, total_pages)`.
    pub fn go_to_page(&mut self, page: usize, total_count: usize) {
        let last = self.total_pages(total_count).max(1);
        self.page.current_page = page.clamp(1, last);
    }

    pub fn next_page(&mut self, total_count: usize) {
        self.go_to_page(self.page.current_page.saturating_add(1), total_count);
    }

    pub fn previous_page(&mut self, total_count: usize) {
        self.go_to_page(self.page.current_page.saturating_sub(1), total_count);
    }

    /// Keeps the current page valid after the collection changed size.
    pub fn clamp(&mut self, total_count: usize) {
        self.go_to_page(self.page.current_page, total_count);
    }

    pub fn render<R, T, F>(&self, records: &[R], mut project: F) -> TablePage<T>
    where
        R: Fielded,
        F: FnMut(&R) -> T,
    {
        let ordered = sort(records, &self.sort.sort_state());
        let page = paginate(&ordered, &self.page);

        TablePage {
            rows: page.rows.iter().map(|&r| project(r)).collect(),
            current_page: self.page.current_page,
            rows_per_page: self.page.rows_per_page,
            first_index: page.first_index,
            last_index: page.last_index,
            total_pages: page.total_pages,
            total_count: page.total_count,
        }
    }
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(super::DEFAULT_ROWS_PER_PAGE)
    }
}
