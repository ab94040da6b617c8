pub mod participants;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A scalar read out of a record by field name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Null,
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

impl<'a> FieldValue<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn from_opt(value: &'a Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::Text(s),
            None => FieldValue::Null,
        }
    }
}

/// Field-by-name access used by the table engine.
///
/// Unknown field names read as [`FieldValue::Null`].
pub trait Fielded {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

// ─── Leads ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadStatus {
    #[default]
    Active,
    OnHold,
    Lost,
    Converted,
    #[serde(other)]
    Unknown,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Active => "active",
            LeadStatus::OnHold => "onHold",
            LeadStatus::Lost => "lost",
            LeadStatus::Converted => "converted",
            LeadStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Active => "Active",
            LeadStatus::OnHold => "On Hold",
            LeadStatus::Lost => "Lost",
            LeadStatus::Converted => "Converted",
            LeadStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub lead_name: Option<String>,
    #[serde(default)]
    pub lead_source: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub lead_status: LeadStatus,
    #[serde(default)]
    pub assigned_sales_rep: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<String>,
    #[serde(default)]
    pub next_follow_up_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Fielded for Lead {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Text(&self.id),
            "leadName" => FieldValue::from_opt(&self.lead_name),
            "leadSource" => FieldValue::from_opt(&self.lead_source),
            "contactPhone" => FieldValue::from_opt(&self.contact_phone),
            "contactEmail" => FieldValue::from_opt(&self.contact_email),
            "companyName" => FieldValue::from_opt(&self.company_name),
            "leadStatus" => FieldValue::Text(self.lead_status.as_str()),
            "assignedSalesRep" => FieldValue::from_opt(&self.assigned_sales_rep),
            "lastContactDate" => FieldValue::from_opt(&self.last_contact_date),
            "nextFollowUpDate" => FieldValue::from_opt(&self.next_follow_up_date),
            "createdAt" => FieldValue::from_opt(&self.created_at),
            "updatedAt" => FieldValue::from_opt(&self.updated_at),
            _ => FieldValue::Null,
        }
    }
}

/// Body of `POST /api/leads`. The server assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub lead_name: String,
    pub lead_source: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub company_name: String,
    pub lead_status: LeadStatus,
    pub assigned_sales_rep: String,
    pub last_contact_date: Option<String>,
    pub next_follow_up_date: Option<String>,
}

// ─── Meetings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    #[serde(default)]
    pub meeting_title: Option<String>,
    #[serde(default)]
    pub meeting_date: Option<String>,
    #[serde(default)]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub participants: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub travel_mode: Option<String>,
    #[serde(default)]
    pub expenses: Option<String>,
    #[serde(default)]
    pub meeting_agenda: Option<String>,
    #[serde(default, deserialize_with = "coordinate_or_null")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coordinate_or_null")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Fielded for Meeting {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Text(&self.id),
            "meetingTitle" => FieldValue::from_opt(&self.meeting_title),
            "meetingDate" => FieldValue::from_opt(&self.meeting_date),
            "meetingTime" => FieldValue::from_opt(&self.meeting_time),
            "participants" => FieldValue::from_opt(&self.participants),
            "location" => FieldValue::from_opt(&self.location),
            "travelMode" => FieldValue::from_opt(&self.travel_mode),
            "expenses" => FieldValue::from_opt(&self.expenses),
            "meetingAgenda" => FieldValue::from_opt(&self.meeting_agenda),
            "latitude" => self.latitude.map_or(FieldValue::Null, FieldValue::Number),
            "longitude" => self.longitude.map_or(FieldValue::Null, FieldValue::Number),
            "createdAt" => FieldValue::from_opt(&self.created_at),
            "updatedAt" => FieldValue::from_opt(&self.updated_at),
            _ => FieldValue::Null,
        }
    }
}

/// Body of `POST /api/meetings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub meeting_title: String,
    pub meeting_date: String,
    pub meeting_time: String,
    pub participants: String,
    pub location: String,
    pub travel_mode: String,
    pub expenses: String,
    pub meeting_agenda: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ─── Generic JSON records ────────────────────────────────────────────────────

/// Arrays and objects are not scalars and read as null.
impl Fielded for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match self.get(name) {
            Some(Value::String(s)) => FieldValue::Text(s),
            Some(Value::Number(n)) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            Some(Value::Bool(b)) => FieldValue::Bool(*b),
            _ => FieldValue::Null,
        }
    }
}

// The backend stores coordinates as text columns; the create form sends numbers.
fn coordinate_or_null<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}
