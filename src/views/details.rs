use serde::Serialize;

use super::ViewScope;
use crate::api::{ApiClient, ApiError};
use crate::records::participants::{parse_participants, Participant};
use crate::records::{Lead, Meeting};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

fn field(label: &'static str, value: &str) -> DetailField {
    DetailField {
        label,
        value: value.to_string(),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Outcome of a detail fetch. Any failure shows the not-found state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "details", rename_all = "camelCase")]
pub enum DetailState<T> {
    Loaded(T),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadDetails {
    pub id: String,
    pub fields: Vec<DetailField>,
}

impl From<&Lead> for LeadDetails {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.clone(),
            fields: vec![
                field("Lead Name", text(&lead.lead_name)),
                field("Lead Source", text(&lead.lead_source)),
                field("Company Name", text(&lead.company_name)),
                field("Lead Status", lead.lead_status.label()),
                field("Contact Email", text(&lead.contact_email)),
                field("Last Contact Date", &or_na(lead.last_contact_date.as_deref())),
                field("Contact Phone", text(&lead.contact_phone)),
                field("Assigned Sales Representative", text(&lead.assigned_sales_rep)),
                field("Next Follow-up Date", &or_na(lead.next_follow_up_date.as_deref())),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    pub id: String,
    pub fields: Vec<DetailField>,
    pub participants: Vec<Participant>,
    pub participants_label: String,
}

impl From<&Meeting> for MeetingDetails {
    fn from(meeting: &Meeting) -> Self {
        let participants = parse_participants(text(&meeting.participants));
        let count = participants.len();

        Self {
            id: meeting.id.clone(),
            fields: vec![
                field("Meeting Title", text(&meeting.meeting_title)),
                field("Meeting Date", text(&meeting.meeting_date)),
                field("Meeting Time", text(&meeting.meeting_time)),
                field("Participants", &count.to_string()),
                field("Meeting Agenda", &or_na(meeting.meeting_agenda.as_deref())),
                field("Location", &or_na(meeting.location.as_deref())),
                field("Travel Mode", &or_na(meeting.travel_mode.as_deref())),
                field("Expenses", &or_na(meeting.expenses.as_deref())),
            ],
            participants,
            participants_label: if count == 0 {
                "0 of 0".to_string()
            } else {
                format!("1-{} of {}", count, count)
            },
        }
    }
}

fn settle<R, T>(result: Result<R, ApiError>, scope: &ViewScope, what: &str) -> Option<DetailState<T>>
where
    T: for<'a> From<&'a R>,
{
    let state = match result {
        Ok(record) => DetailState::Loaded(T::from(&record)),
        Err(ApiError::NotFound { resource }) => {
            log::warn!("{} not found", resource);
            DetailState::NotFound
        }
        Err(e) => {
            log::error!("Error fetching {}: {}", what, e);
            DetailState::NotFound
        }
    };

    if !scope.is_active() {
        log::debug!("Detail view for {} left before the record arrived", what);
        return None;
    }
    Some(state)
}

pub async fn load_lead(
    api: &ApiClient,
    scope: &ViewScope,
    id: &str,
) -> Option<DetailState<LeadDetails>> {
    settle(api.get_lead(id).await, scope, "lead")
}

pub async fn load_meeting(
    api: &ApiClient,
    scope: &ViewScope,
    id: &str,
) -> Option<DetailState<MeetingDetails>> {
    settle(api.get_meeting(id).await, scope, "meeting")
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
pub mod commands {
    use super::*;
    use crate::api::ApiState;
    use crate::views::ScopeRegistry;
    use std::sync::Arc;

    #[tauri::command]
    pub async fn lead_details(
        api: tauri::State<'_, ApiState>,
        scopes: tauri::State<'_, Arc<ScopeRegistry>>,
        id: String,
    ) -> Result<Option<DetailState<LeadDetails>>, String> {
        let scope = scopes.mount("lead-details");
        let api = api.read().clone();
        Ok(load_lead(&api, &scope, &id).await)
    }

    #[tauri::command]
    pub async fn meeting_details(
        api: tauri::State<'_, ApiState>,
        scopes: tauri::State<'_, Arc<ScopeRegistry>>,
        id: String,
    ) -> Result<Option<DetailState<MeetingDetails>>, String> {
        let scope = scopes.mount("meeting-details");
        let api = api.read().clone();
        Ok(load_meeting(&api, &scope, &id).await)
    }
}
