pub mod dashboard;
pub mod details;
pub mod management;
pub mod scope;

use parking_lot::Mutex;
use std::collections::HashMap;

pub use scope::ViewScope;

/// Live scope of each mounted view, by view name. Mounting a view again ends
/// the scope of its previous mount.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: Mutex<HashMap<String, ViewScope>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self, view: &str) -> ViewScope {
        let scope = ViewScope::new();
        if let Some(previous) = self.scopes.lock().insert(view.to_string(), scope.clone()) {
            log::debug!("Remounting view '{}'", view);
            previous.end();
        }
        scope
    }

    pub fn leave(&self, view: &str) {
        if let Some(scope) = self.scopes.lock().remove(view) {
            scope.end();
        }
    }
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn leave_view(scopes: tauri::State<'_, std::sync::Arc<ScopeRegistry>>, view: String) {
    scopes.leave(&view);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remount_ends_previous_scope() {
        let registry = ScopeRegistry::new();
        let first = registry.mount("dashboard");
        let second = registry.mount("dashboard");

        assert!(!first.is_active());
        assert!(second.is_active());

        registry.leave("dashboard");
        assert!(!second.is_active());
    }

    #[test]
    fn views_are_independent() {
        let registry = ScopeRegistry::new();
        let dashboard = registry.mount("dashboard");
        registry.mount("management");
        registry.leave("management");

        assert!(dashboard.is_active());
    }
}
