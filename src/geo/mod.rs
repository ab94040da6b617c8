pub mod google;
pub mod nominatim;
pub mod resolver;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Text written into the location field when no provider returns an address.
    pub fn fallback_text(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Output of any resolution step. The last one applied wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCandidate {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: Option<String>,
}

impl LocationCandidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// The address, or the coordinate fallback text.
    pub fn display_text(&self) -> String {
        self.formatted_address
            .clone()
            .unwrap_or_else(|| self.coordinate().fallback_text())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("{0} is not configured")]
    Unavailable(&'static str),
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoder returned {0}")]
    Status(String),
    #[error("failed to parse geocoder response: {0}")]
    Decode(String),
    #[error("no address found")]
    NoResult,
}

// ─── Status feedback ─────────────────────────────────────────────────────────

pub const STATUS_LOCATING: &str = "Getting your current location...";
pub const STATUS_RETRIEVING: &str = "Retrieving address...";
pub const STATUS_TRYING_ALTERNATIVE: &str = "Trying alternative geocoding service...";
pub const STATUS_FOUND: &str = "Address found!";
pub const STATUS_FOUND_ALTERNATIVE: &str = "Address found using OpenStreetMap!";
pub const STATUS_COORDINATE_FALLBACK: &str =
    "Could not retrieve address. Using coordinates instead.";
pub const STATUS_GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported on this device.";
pub const STATUS_SELECTED: &str = "Address selected!";
pub const STATUS_SEARCHING: &str = "Searching for address...";
pub const STATUS_NO_MATCH: &str = "No matching address found.";

/// Advisory text shown next to the location field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_text_uses_six_decimals() {
        assert_eq!(
            Coordinate::new(28.6139, 77.209).fallback_text(),
            "28.613900, 77.209000"
        );
        assert_eq!(
            Coordinate::new(-33.8688197, 151.2093).fallback_text(),
            "-33.868820, 151.209300"
        );
    }

    #[test]
    fn candidate_display_prefers_address() {
        let mut candidate = LocationCandidate {
            lat: 1.0,
            lng: 2.0,
            formatted_address: Some("12 Main St".into()),
        };
        assert_eq!(candidate.display_text(), "12 Main St");

        candidate.formatted_address = None;
        assert_eq!(candidate.display_text(), "1.000000, 2.000000");
    }
}
