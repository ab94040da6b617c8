use reqwest::Client;
use serde::Deserialize;

use super::{Coordinate, GeocodeError, LocationCandidate};

pub const DEFAULT_GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Primary provider: the map service's geocoder. Needs an API key.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub async fn reverse(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        let latlng = format!("{},{}", coordinate.lat, coordinate.lng);
        let body = self.geocode(&[("latlng", latlng.as_str())]).await?;

        body.results
            .into_iter()
            .next()
            .and_then(|r| r.formatted_address)
            .filter(|a| !a.trim().is_empty())
            .ok_or(GeocodeError::NoResult)
    }

    pub async fn search(&self, query: &str) -> Result<LocationCandidate, GeocodeError> {
        let body = self.geocode(&[("address", query)]).await?;

        body.results
            .into_iter()
            .find_map(|r| {
                let location = r.geometry?.location;
                Some(LocationCandidate {
                    lat: location.lat,
                    lng: location.lng,
                    formatted_address: r.formatted_address,
                })
            })
            .ok_or(GeocodeError::NoResult)
    }

    async fn geocode(&self, params: &[(&str, &str)]) -> Result<GeocodeResponse, GeocodeError> {
        if !self.is_available() {
            return Err(GeocodeError::Unavailable("Google Maps API key"));
        }

        let url = format!("{}/maps/api/geocode/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(format!("HTTP {}", status)));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        if body.status != "OK" {
            let detail = match body.error_message {
                Some(message) => format!("{}: {}", body.status, message),
                None => body.status,
            };
            return Err(GeocodeError::Status(detail));
        }

        Ok(body)
    }
}
