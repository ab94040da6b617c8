use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ViewScope;
use crate::api::ApiClient;
use crate::records::{Lead, LeadStatus, Meeting};
use crate::table::parse_timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub leads: usize,
    pub meetings: usize,
    pub active_leads: usize,
    pub upcoming_meetings: usize,
}

impl DashboardStats {
    pub fn from_records(leads: &[Lead], meetings: &[Meeting], today: NaiveDate) -> Self {
        Self {
            leads: leads.len(),
            meetings: meetings.len(),
            active_leads: leads
                .iter()
                .filter(|l| l.lead_status == LeadStatus::Active)
                .count(),
            upcoming_meetings: meetings
                .iter()
                .filter(|m| {
                    m.meeting_date
                        .as_deref()
                        .and_then(meeting_day)
                        .is_some_and(|day| day >= today)
                })
                .count(),
        }
    }

    /// Fetches both collections at once. A failed fetch counts as empty.
    /// Returns `None` when the dashboard was left before the data arrived.
    pub async fn load(api: &ApiClient, scope: &ViewScope, today: NaiveDate) -> Option<Self> {
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
            log::debug!("Dashboard left before counts arrived");
            return None;
        }
        Some(Self::from_records(&leads, &meetings, today))
    }
}

fn meeting_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(day);
    }
    parse_timestamp(value)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.date_naive())
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn load_dashboard(
    api: tauri::State<'_, crate::api::ApiState>,
    scopes: tauri::State<'_, std::sync::Arc<super::ScopeRegistry>>,
) -> Result<Option<DashboardStats>, String> {
    let scope = scopes.mount("dashboard");
    let api = api.read().clone();
    let today = chrono::Local::now().date_naive();
    Ok(DashboardStats::load(&api, &scope, today).await)
}
