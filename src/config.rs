use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::geo::google::DEFAULT_GOOGLE_GEOCODE_URL;
use crate::geo::nominatim::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT};
use crate::geo::Coordinate;
use crate::table::DEFAULT_ROWS_PER_PAGE;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub google_maps_api_key: String,
    pub google_geocode_url: String,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    pub rows_per_page: usize,
    pub default_center: Coordinate,
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            google_maps_api_key: String::new(),
            google_geocode_url: DEFAULT_GOOGLE_GEOCODE_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            nominatim_user_agent: DEFAULT_USER_AGENT.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            // New Delhi
            default_center: Coordinate::new(28.6139, 77.2090),
            dark_mode: false,
        }
    }
}

impl AppConfig {
    /// Directory used when no desktop shell provides one.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("field-sense")
    }

    /// Reads `config.json` from `app_data`, writing defaults when it does not
    /// exist yet, then applies environment overrides.
    pub fn load(app_data: &Path) -> Self {
        Self::read_file(app_data).with_env_overrides(|key| std::env::var(key).ok())
    }

    /// File contents only, without environment overrides.
    pub fn read_file(app_data: &Path) -> Self {
        let config_path = app_data.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring unreadable {}: {}", config_path.display(), e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("Failed to read {}: {}", config_path.display(), e);
                    Self::default()
                }
            }
        } else {
            let c = Self::default();
            c.save(app_data);
            c
        }
    }

    pub fn save(&self, app_data: &Path) {
        if let Err(e) = std::fs::create_dir_all(app_data) {
            log::warn!("Failed to create {}: {}", app_data.display(), e);
            return;
        }
        let config_path = app_data.join(CONFIG_FILE);
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = std::fs::write(&config_path, content) {
                    log::warn!("Failed to write {}: {}", config_path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to serialize config: {}", e),
        }
    }

    /// Writes `self` to disk, except for settings that came from the
    /// environment: those keep whatever the file already holds.
    pub fn save_settings<F>(&self, app_data: &Path, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let on_disk = Self::read_file(app_data);
        let mut stored = self.clone();
        for key in ENV_KEYS {
            if env_value(&lookup, key).is_some() {
                *stored.env_field(key) = on_disk.env_field_ref(key).to_string();
            }
        }
        stored.save(app_data);
    }

    /// Flips only `dark_mode` in the file, leaving every other stored value as is.
    pub fn save_dark_mode(app_data: &Path, dark_mode: bool) {
        let mut stored = Self::read_file(app_data);
        stored.dark_mode = dark_mode;
        stored.save(app_data);
    }

    /// Environment wins over the file; empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_KEYS {
            if let Some(value) = env_value(&lookup, key) {
                *self.env_field(key) = value;
            }
        }
        self.rows_per_page = self.rows_per_page.max(1);
        self
    }

    fn env_field(&mut self, key: &str) -> &mut String {
        match key {
            ENV_API_URL => &mut self.api_base_url,
            ENV_GOOGLE_KEY => &mut self.google_maps_api_key,
            _ => &mut self.nominatim_url,
        }
    }

    fn env_field_ref(&self, key: &str) -> &str {
        match key {
            ENV_API_URL => &self.api_base_url,
            ENV_GOOGLE_KEY => &self.google_maps_api_key,
            _ => &self.nominatim_url,
        }
    }
}

const ENV_API_URL: &str = "FIELDSENSE_API_URL";
const ENV_GOOGLE_KEY: &str = "GOOGLE_MAPS_API_KEY";
const ENV_NOMINATIM_URL: &str = "NOMINATIM_URL";
const ENV_KEYS: [&str; 3] = [ENV_API_URL, ENV_GOOGLE_KEY, ENV_NOMINATIM_URL];

fn env_value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

pub type ConfigState = std::sync::Arc<parking_lot::Mutex<AppConfig>>;

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn get_config(config: tauri::State<'_, ConfigState>) -> AppConfig {
    config.lock().clone()
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn update_config(
    app: tauri::AppHandle,
    config_state: tauri::State<'_, ConfigState>,
    api_state: tauri::State<'_, crate::api::ApiState>,
    new_config: AppConfig,
) -> Result<(), String> {
    use tauri::Manager;

    let app_data = app
        .path()
        .app_data_dir()
        .map_err(|e: tauri::Error| e.to_string())?;
    new_config.save_settings(&app_data, |key| std::env::var(key).ok());
    *api_state.write() = crate::api::ApiClient::new(&new_config.api_base_url);
    *config_state.lock() = new_config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::read_file(dir.path());

        assert_eq!(config.rows_per_page, 10);
        assert_eq!(config.nominatim_user_agent, "FieldSense Meeting App");
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn saved_values_round_trip_and_partial_files_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_base_url: "http://crm.internal:8080".into(),
            dark_mode: true,
            ..AppConfig::default()
        };
        config.save(dir.path());

        let content = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let loaded: AppConfig = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, config);

        let partial: AppConfig = serde_json::from_str(r#"{"rows_per_page": 25}"#).unwrap();
        assert_eq!(partial.rows_per_page, 25);
        assert_eq!(partial.api_base_url, "http://localhost:5000");
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = AppConfig::default().with_env_overrides(|key| match key {
            "FIELDSENSE_API_URL" => Some("https://api.example.com".into()),
            "GOOGLE_MAPS_API_KEY" => Some("  ".into()),
            _ => None,
        });

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.google_maps_api_key, "");
    }

    #[test]
    fn theme_change_keeps_environment_values_out_of_the_file() {
        let dir = tempfile::tempdir().unwrap();
        AppConfig {
            api_base_url: "http://crm.internal:8080".into(),
            ..AppConfig::default()
        }
        .save(dir.path());

        AppConfig::save_dark_mode(dir.path(), true);

        let stored = AppConfig::read_file(dir.path());
        assert!(stored.dark_mode);
        assert_eq!(stored.api_base_url, "http://crm.internal:8080");
        assert_eq!(stored.google_maps_api_key, "");
    }

    #[test]
    fn settings_save_skips_values_supplied_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let env = |key: &str| match key {
            "GOOGLE_MAPS_API_KEY" => Some("secret-key".to_string()),
            _ => None,
        };
        let edited = AppConfig {
            api_base_url: "http://crm.internal:8080".into(),
            ..AppConfig::read_file(dir.path()).with_env_overrides(env)
        };
        assert_eq!(edited.google_maps_api_key, "secret-key");

        edited.save_settings(dir.path(), env);

        let content = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(!content.contains("secret-key"));
        let stored = AppConfig::read_file(dir.path());
        assert_eq!(stored.api_base_url, "http://crm.internal:8080");
        assert_eq!(stored.google_maps_api_key, "");
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let config = AppConfig::load(dir.path());
        assert_eq!(config.google_geocode_url, DEFAULT_GOOGLE_GEOCODE_URL);
    }
}
