use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::records::{Lead, Meeting, NewLead, NewMeeting};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
    pub version: Option<String>,
    pub database: Option<String>,
}

/// Replaced wholesale when the API URL changes in settings.
#[cfg(feature = "desktop")]
pub type ApiState = std::sync::Arc<parking_lot::RwLock<ApiClient>>;

/// Client for the `leads` / `meetings` REST resources.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Leads ───────────────────────────────────────────────────────────

    pub async fn list_leads(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_json(self.url("/api/leads"), "leads").await
    }

    pub async fn get_lead(&self, id: &str) -> Result<Lead, ApiError> {
        let url = self.record_url("leads", id)?;
        self.get_json(url, &format!("Lead {}", id)).await
    }

    pub async fn create_lead(&self, lead: &NewLead) -> Result<Lead, ApiError> {
        self.post_json("/api/leads", lead).await
    }

    // ─── Meetings ────────────────────────────────────────────────────────

    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, ApiError> {
        self.get_json(self.url("/api/meetings"), "meetings").await
    }

    pub async fn get_meeting(&self, id: &str) -> Result<Meeting, ApiError> {
        let url = self.record_url("meetings", id)?;
        self.get_json(url, &format!("Meeting {}", id)).await
    }

    pub async fn create_meeting(&self, meeting: &NewMeeting) -> Result<Meeting, ApiError> {
        self.post_json("/api/meetings", meeting).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(self.url("/health"), "health").await
    }

    // ─── Transport ───────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/{collection}/{id}` with the id percent-encoded as a single segment.
    fn record_url(&self, collection: &str, id: &str) -> Result<String, ApiError> {
        let invalid = |message: String| ApiError::Transport {
            url: self.base_url.clone(),
            message,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["api", collection, id]);
        Ok(url.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, resource: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource: resource.to_string(),
            });
        }

        Self::read_json(url, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Self::read_json(url, response).await
    }

    async fn read_json<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn check_health(api: tauri::State<'_, ApiState>) -> Result<HealthStatus, String> {
    let api = api.read().clone();
    api.health().await.map_err(|e| e.to_string())
}
