use serde::{Deserialize, Serialize};

use super::{optional, require, FormError, SubmitError};
use crate::api::ApiClient;
use crate::records::{Lead, LeadStatus, NewLead};

pub const LEAD_STATUSES: [LeadStatus; 4] = [
    LeadStatus::Active,
    LeadStatus::OnHold,
    LeadStatus::Lost,
    LeadStatus::Converted,
];

/// Draft of the "Create Lead" form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    pub lead_name: String,
    pub lead_source: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub company_name: String,
    pub lead_status: LeadStatus,
    pub assigned_sales_rep: String,
    pub last_contact_date: String,
    pub next_follow_up_date: String,
}

impl LeadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let slot = match name {
            "leadName" => &mut self.lead_name,
            "leadSource" => &mut self.lead_source,
            "contactPhone" => &mut self.contact_phone,
            "contactEmail" => &mut self.contact_email,
            "companyName" => &mut self.company_name,
            "assignedSalesRep" => &mut self.assigned_sales_rep,
            "lastContactDate" => &mut self.last_contact_date,
            "nextFollowUpDate" => &mut self.next_follow_up_date,
            "leadStatus" => {
                self.lead_status = parse_status(value)?;
                return Ok(());
            }
            other => return Err(FormError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<NewLead, FormError> {
        require("leadName", &self.lead_name)?;
        require("leadSource", &self.lead_source)?;
        require("contactPhone", &self.contact_phone)?;
        require("contactEmail", &self.contact_email)?;
        require("companyName", &self.company_name)?;
        if self.lead_status == LeadStatus::Unknown {
            return Err(FormError::MissingField("leadStatus"));
        }
        require("assignedSalesRep", &self.assigned_sales_rep)?;

        Ok(NewLead {
            lead_name: self.lead_name.trim().to_string(),
            lead_source: self.lead_source.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            lead_status: self.lead_status,
            assigned_sales_rep: self.assigned_sales_rep.trim().to_string(),
            last_contact_date: optional(&self.last_contact_date),
            next_follow_up_date: optional(&self.next_follow_up_date),
        })
    }

    pub async fn submit(&self, api: &ApiClient) -> Result<Lead, SubmitError> {
        let body = self.validate()?;
        let lead = api.create_lead(&body).await.map_err(|e| {
            log::error!("Error creating lead: {}", e);
            e
        })?;
        log::info!("Lead created: {}", lead.id);
        Ok(lead)
    }
}

fn parse_status(value: &str) -> Result<LeadStatus, FormError> {
    LEAD_STATUSES
        .into_iter()
        .find(|s| s.as_str() == value.trim())
        .ok_or_else(|| FormError::InvalidValue {
            field: "leadStatus",
            value: value.to_string(),
        })
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn create_lead(
    api: tauri::State<'_, crate::api::ApiState>,
    form: LeadForm,
) -> Result<Lead, String> {
    let api = api.read().clone();
    form.submit(&api).await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> LeadForm {
        let mut form = LeadForm::new();
        for (name, value) in [
            ("leadName", "Asha Rao"),
            ("leadSource", "Referral"),
            ("contactPhone", "98100 00000"),
            ("contactEmail", "asha@acme.com"),
            ("companyName", "Acme"),
            ("assignedSalesRep", "Ben"),
        ] {
            form.set_field(name, value).unwrap();
        }
        form
    }

    #[test]
    fn new_form_defaults_to_active() {
        assert_eq!(LeadForm::new().lead_status, LeadStatus::Active);
    }

    #[test]
    fn complete_form_becomes_request_body() {
        let mut form = filled();
        form.set_field("leadStatus", "onHold").unwrap();
        form.set_field("lastContactDate", "2023-03-01").unwrap();

        let body = form.validate().unwrap();
        assert_eq!(body.lead_status, LeadStatus::OnHold);
        assert_eq!(body.last_contact_date.as_deref(), Some("2023-03-01"));
        assert_eq!(body.next_follow_up_date, None);
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut form = filled();
        form.set_field("contactEmail", "  ").unwrap();

        match form.validate() {
            Err(FormError::MissingField(field)) => assert_eq!(field, "contactEmail"),
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn bad_status_and_unknown_field_are_rejected() {
        let mut form = filled();
        assert!(matches!(
            form.set_field("leadStatus", "archived"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.set_field("budget", "10"),
            Err(FormError::UnknownField(_))
        ));
        assert_eq!(form.lead_status, LeadStatus::Active);
    }
}
