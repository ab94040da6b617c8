use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Process-wide light/dark mode. Views hold a receiver and see every change.
#[derive(Debug)]
pub struct ThemeState {
    tx: watch::Sender<ThemeMode>,
}

impl ThemeState {
    pub fn new(mode: ThemeMode) -> Self {
        let (tx, _rx) = watch::channel(mode);
        Self { tx }
    }

    pub fn current(&self) -> ThemeMode {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.tx.subscribe()
    }

    /// Returns whether the mode actually changed.
    pub fn set(&self, mode: ThemeMode) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        })
    }

    pub fn toggle(&self) -> ThemeMode {
        let mut next = ThemeMode::Light;
        self.tx.send_modify(|current| {
            *current = current.toggled();
            next = *current;
        });
        log::info!("Theme switched to {:?}", next);
        next
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn get_theme(theme: tauri::State<'_, ThemeState>) -> ThemeMode {
    theme.current()
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn toggle_theme(
    app: tauri::AppHandle,
    theme: tauri::State<'_, ThemeState>,
    config: tauri::State<'_, crate::config::ConfigState>,
) -> Result<ThemeMode, String> {
    use tauri::{Emitter, Manager};

    let mode = theme.toggle();
    config.lock().dark_mode = mode.is_dark();
    let app_data = app.path().app_data_dir().map_err(|e| e.to_string())?;
    crate::config::AppConfig::save_dark_mode(&app_data, mode.is_dark());

    let _ = app.emit("theme-changed", mode);
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_modes() {
        let theme = ThemeState::default();
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        assert_eq!(theme.toggle(), ThemeMode::Light);
        assert_eq!(theme.current(), ThemeMode::Light);
    }

    #[test]
    fn setting_the_same_mode_is_not_a_change() {
        let theme = ThemeState::new(ThemeMode::from_dark(true));
        assert!(!theme.set(ThemeMode::Dark));
        assert!(theme.set(ThemeMode::Light));
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let theme = ThemeState::default();
        let mut rx = theme.subscribe();

        theme.toggle();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ThemeMode::Dark);
    }
}
