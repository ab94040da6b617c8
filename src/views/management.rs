//! The tabbed leads/meetings management screen.

use serde::{Deserialize, Serialize};

use super::ViewScope;
use crate::api::ApiClient;
use crate::records::{FieldValue, Fielded, Lead, Meeting};
use crate::table::view::TableView;

pub const ROWS_PER_PAGE_CHOICES: [usize; 3] = [10, 25, 50];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Leads,
    #[default]
    Meetings,
}

impl Tab {
    pub fn columns(self) -> &'static [Column] {
        match self {
            Tab::Leads => LEAD_COLUMNS,
            Tab::Meetings => MEETING_COLUMNS,
        }
    }

    pub fn empty_text(self) -> &'static str {
        match self {
            Tab::Leads => "No leads found",
            Tab::Meetings => "No meetings found",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub field: &'static str,
    pub label: &'static str,
}

const fn column(field: &'static str, label: &'static str) -> Column {
    Column { field, label }
}

pub const LEAD_COLUMNS: &[Column] = &[
    column("leadName", "LEAD NAME"),
    column("leadSource", "LEAD SOURCE"),
    column("contactPhone", "PHONE"),
    column("contactEmail", "EMAIL"),
    column("companyName", "COMPANY NAME"),
    column("leadStatus", "LEAD STATUS"),
    column("assignedSalesRep", "ASSIGNED SALES REP"),
    column("lastContactDate", "LAST CONTACT DATE"),
    column("nextFollowUpDate", "NEXT FOLLOW-UP"),
];

pub const MEETING_COLUMNS: &[Column] = &[
    column("meetingTitle", "MEETING TITLE"),
    column("meetingDate", "MEETING DATE"),
    column("meetingTime", "MEETING TIME"),
    column("participants", "PARTICIPANTS"),
    column("location", "LOCATION"),
    column("travelMode", "TRAVEL MODE"),
    column("expenses", "EXPENSES TYPE"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub field: &'static str,
    pub label: &'static str,
    pub indicator: Option<&'static str>,
}

/// One table row: the record id (for the "view" link) and one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

/// Everything the screen paints for the active tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleTable {
    pub tab: Tab,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<Row>,
    pub empty_text: Option<&'static str>,
    pub current_page: usize,
    pub total_pages: usize,
    pub rows_per_page: usize,
    pub range_label: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ManagementView {
    leads: Vec<Lead>,
    meetings: Vec<Meeting>,
    tab: Tab,
    table: TableView,
}

impl ManagementView {
    pub fn new(leads: Vec<Lead>, meetings: Vec<Meeting>, rows_per_page: usize) -> Self {
        Self {
            leads,
            meetings,
            tab: Tab::default(),
            table: TableView::new(rows_per_page),
        }
    }

    /// Fetches both collections at once; a failed fetch leaves that tab empty.
    /// Returns `None` when the screen was left before the data arrived.
    pub async fn load(api: &ApiClient, scope: &ViewScope, rows_per_page: usize) -> Option<Self> {
        let (leads, meetings) = futures::join!(api.list_leads(), api.list_meetings());

        let leads = leads.unwrap_or_else(|e| {
            log::error!("Error fetching leads: {}", e);
            Vec::new()
        });
        let meetings = meetings.unwrap_or_else(|e| {
            log::error!("Error fetching meetings: {}", e);
            Vec::new()
        });

        if !scope.is_active() {
            log::debug!("Management view left before records arrived");
            return None;
        }
        log::info!("Loaded {} leads and {} meetings", leads.len(), meetings.len());
        Some(Self::new(leads, meetings, rows_per_page))
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    fn total_count(&self) -> usize {
        match self.tab {
            Tab::Leads => self.leads.len(),
            Tab::Meetings => self.meetings.len(),
        }
    }

    /// Sorting and paging start over on every tab change, even to the same tab.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.table.reset();
    }

    pub fn click_header(&mut self, field: &str) {
        self.table.click_header(field);
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.total_count();
        self.table.go_to_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.total_count();
        self.table.next_page(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.total_count();
        self.table.previous_page(total);
    }

    pub fn last_page(&mut self) {
        let total = self.total_count();
        let last = self.table.total_pages(total);
        self.table.go_to_page(last, total);
    }

    /// Only the offered page sizes are accepted.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        if !ROWS_PER_PAGE_CHOICES.contains(&rows_per_page) {
            log::warn!("Ignoring unsupported page size {}", rows_per_page);
            return false;
        }
        self.table.set_rows_per_page(rows_per_page);
        true
    }

    pub fn visible(&self) -> VisibleTable {
        let columns = self.tab.columns();
        let page = match self.tab {
            Tab::Leads => self.table.render(&self.leads, |l| row(&l.id, l, columns)),
            Tab::Meetings => self.table.render(&self.meetings, |m| row(&m.id, m, columns)),
        };

        let sort = self.table.sort_phase();
        VisibleTable {
            tab: self.tab,
            columns: columns
                .iter()
                .map(|c| ColumnHeader {
                    field: c.field,
                    label: c.label,
                    indicator: sort.indicator(c.field),
                })
                .collect(),
            empty_text: page.rows.is_empty().then(|| self.tab.empty_text()),
            range_label: page.range_label(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            rows_per_page: page.rows_per_page,
            can_go_back: page.current_page > 1,
            can_go_forward: page.total_pages > 0 && page.current_page < page.total_pages,
            rows: page.rows,
        }
    }
}

fn row<R: Fielded>(id: &str, record: &R, columns: &[Column]) -> Row {
    Row {
        id: id.to_string(),
        cells: columns.iter().map(|c| cell_text(record.field(c.field))).collect(),
    }
}

fn cell_text(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Bool(b) => b.to_string(),
    }
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
pub mod commands {
    use super::*;
    use crate::api::ApiState;
    use crate::config::ConfigState;
    use crate::views::ScopeRegistry;
    use parking_lot::Mutex;
    use std::sync::Arc;

    pub type ManagementState = Arc<Mutex<ManagementView>>;

    const VIEW: &str = "management";

    #[tauri::command]
    pub async fn mount_management(
        api: tauri::State<'_, ApiState>,
        config: tauri::State<'_, ConfigState>,
        scopes: tauri::State<'_, Arc<ScopeRegistry>>,
        management: tauri::State<'_, ManagementState>,
    ) -> Result<Option<VisibleTable>, String> {
        let scope = scopes.mount(VIEW);
        let api = api.read().clone();
        let rows_per_page = config.lock().rows_per_page;

        let Some(view) = ManagementView::load(&api, &scope, rows_per_page).await else {
            return Ok(None);
        };
        let mut state = management.lock();
        *state = view;
        Ok(Some(state.visible()))
    }

    #[tauri::command]
    pub fn get_visible_table(management: tauri::State<'_, ManagementState>) -> VisibleTable {
        management.lock().visible()
    }

    #[tauri::command]
    pub fn switch_tab(management: tauri::State<'_, ManagementState>, tab: Tab) -> VisibleTable {
        let mut view = management.lock();
        view.switch_tab(tab);
        view.visible()
    }

    #[tauri::command]
    pub fn click_header(
        management: tauri::State<'_, ManagementState>,
        field: String,
    ) -> VisibleTable {
        let mut view = management.lock();
        view.click_header(&field);
        view.visible()
    }

    /// `target` is one of `first`, `previous`, `next`, `last`, or a page number.
    #[tauri::command]
    pub fn go_to_page(
        management: tauri::State<'_, ManagementState>,
        target: String,
    ) -> Result<VisibleTable, String> {
        let mut view = management.lock();
        match target.as_str() {
            "first" => view.go_to_page(1),
            "previous" => view.previous_page(),
            "next" => view.next_page(),
            "last" => view.last_page(),
            other => {
                let page = other
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid page '{}'", other))?;
                view.go_to_page(page);
            }
        }
        Ok(view.visible())
    }

    #[tauri::command]
    pub fn set_rows_per_page(
        management: tauri::State<'_, ManagementState>,
        rows_per_page: usize,
    ) -> Result<VisibleTable, String> {
        let mut view = management.lock();
        if !view.set_rows_per_page(rows_per_page) {
            return Err(format!("Unsupported page size {}", rows_per_page));
        }
        Ok(view.visible())
    }
}
