use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

use super::{Coordinate, GeocodeError, LocationCandidate};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "FieldSense Meeting App";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Secondary provider: the public OpenStreetMap geocoder. Its usage policy
/// requires every request to identify the application.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent.trim()
        };

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub async fn reverse(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lng.to_string();

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(format!("HTTP {}", status)));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        if let Some(error) = body.error {
            log::debug!("Nominatim reverse error for {}: {}", coordinate, error);
        }

        body.display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(GeocodeError::NoResult)
    }

    pub async fn search(&self, query: &str) -> Result<LocationCandidate, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .query(&[("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(format!("HTTP {}", status)));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        hits.into_iter()
            .find_map(|hit| {
                Some(LocationCandidate {
                    lat: hit.lat.trim().parse().ok()?,
                    lng: hit.lon.trim().parse().ok()?,
                    formatted_address: hit.display_name.filter(|n| !n.trim().is_empty()),
                })
            })
            .ok_or(GeocodeError::NoResult)
    }
}
