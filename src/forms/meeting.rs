use serde::{Deserialize, Serialize};

use super::{require, FormError, SubmitError};
use crate::api::ApiClient;
use crate::geo::{Coordinate, StatusMessage};
use crate::records::{Meeting, NewMeeting};

pub const TRAVEL_MODES: [&str; 4] = ["Car", "Public Transit", "Flight", "Train"];
pub const EXPENSE_TYPES: [&str; 4] = ["Transportation", "Meals", "Accommodation", "Other"];
pub const DEFAULT_MAP_ZOOM: u8 = 14;

/// Interactive map beside the location field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub marker: Coordinate,
    pub zoom: u8,
}

impl MapView {
    pub fn centered_on(center: Coordinate) -> Self {
        Self {
            center,
            marker: center,
            zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

/// Draft of the "Create Meeting" form, including map and status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingForm {
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
    pub map: MapView,
    pub status: Option<StatusMessage>,
    /// Sequence number of the last location update written into the form.
    #[serde(skip)]
    pub(crate) location_run: u64,
}

impl MeetingForm {
    pub fn new(default_center: Coordinate) -> Self {
        Self {
            meeting_title: String::new(),
            meeting_date: String::new(),
            meeting_time: String::new(),
            participants: String::new(),
            location: String::new(),
            travel_mode: String::new(),
            expenses: String::new(),
            meeting_agenda: String::new(),
            latitude: None,
            longitude: None,
            map: MapView::centered_on(default_center),
            status: None,
            location_run: 0,
        }
    }

    /// Plain text fields only; location goes through the resolver.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let slot = match name {
            "meetingTitle" => &mut self.meeting_title,
            "meetingDate" => &mut self.meeting_date,
            "meetingTime" => &mut self.meeting_time,
            "participants" => &mut self.participants,
            "travelMode" => &mut self.travel_mode,
            "expenses" => &mut self.expenses,
            "meetingAgenda" => &mut self.meeting_agenda,
            other => return Err(FormError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Writes a location update. Marker, map center, coordinates and text
    /// move together; a text-only update leaves the map where it is.
    pub(crate) fn place(&mut self, coordinate: Option<Coordinate>, location: String) {
        if let Some(coordinate) = coordinate {
            self.map.marker = coordinate;
            self.map.center = coordinate;
            self.latitude = Some(coordinate.lat);
            self.longitude = Some(coordinate.lng);
        }
        self.location = location;
    }

    pub fn validate(&self) -> Result<NewMeeting, FormError> {
        require("meetingTitle", &self.meeting_title)?;
        require("meetingDate", &self.meeting_date)?;
        require("meetingTime", &self.meeting_time)?;
        require("participants", &self.participants)?;
        require("location", &self.location)?;

        Ok(NewMeeting {
            meeting_title: self.meeting_title.trim().to_string(),
            meeting_date: self.meeting_date.trim().to_string(),
            meeting_time: self.meeting_time.trim().to_string(),
            participants: self.participants.trim().to_string(),
            location: self.location.trim().to_string(),
            travel_mode: self.travel_mode.clone(),
            expenses: self.expenses.clone(),
            meeting_agenda: self.meeting_agenda.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }

    pub async fn submit(&self, api: &ApiClient) -> Result<Meeting, SubmitError> {
        let body = self.validate()?;
        let meeting = api.create_meeting(&body).await.map_err(|e| {
            log::error!("Error creating meeting: {}", e);
            e
        })?;
        log::info!("Meeting created: {}", meeting.id);
        Ok(meeting)
    }
}
