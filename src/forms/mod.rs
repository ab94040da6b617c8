pub mod lead;
pub mod meeting;

pub use lead::LeadForm;
pub use meeting::{MapView, MeetingForm};

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Why a create request did not go through. The form keeps its contents either way.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
