pub mod api;
pub mod config;
pub mod forms;
pub mod geo;
pub mod records;
pub mod table;
pub mod theme;
pub mod views;

#[cfg(feature = "desktop")]
use parking_lot::{Mutex, RwLock};
#[cfg(feature = "desktop")]
use std::sync::Arc;
#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let result = tauri::Builder::default()
        .setup(|app| {
            // ─── State Management ────────────────────────────────────────
            let app_data = app
                .path()
                .app_data_dir()
                .unwrap_or_else(|_| config::AppConfig::default_dir());
            std::fs::create_dir_all(&app_data).ok();

            // App config
            let app_config = config::AppConfig::load(&app_data);
            log::info!("Using API at {}", app_config.api_base_url);
            if app_config.google_maps_api_key.is_empty() {
                log::warn!("No Google Maps API key configured; geocoding goes to Nominatim");
            }

            // REST client
            let api_state: api::ApiState =
                Arc::new(RwLock::new(api::ApiClient::new(&app_config.api_base_url)));
            app.manage(api_state);

            // Theme
            app.manage(theme::ThemeState::new(theme::ThemeMode::from_dark(
                app_config.dark_mode,
            )));

            // View lifetimes
            app.manage(Arc::new(views::ScopeRegistry::new()));

            // Management tables
            let management_state: views::management::commands::ManagementState =
                Arc::new(Mutex::new(views::management::ManagementView::default()));
            app.manage(management_state);

            // Meeting form + location resolver
            let resolver = geo::resolver::commands::build(app.handle(), &app_config);
            let resolver_state: geo::resolver::commands::ResolverState =
                Arc::new(RwLock::new(Arc::new(resolver)));
            app.manage(resolver_state);

            let config_state: config::ConfigState = Arc::new(Mutex::new(app_config));
            app.manage(config_state);

            log::info!("FieldSense initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Config
            config::get_config,
            config::update_config,
            // Theme
            theme::get_theme,
            theme::toggle_theme,
            // API
            api::check_health,
            // Views
            views::leave_view,
            views::dashboard::load_dashboard,
            views::management::commands::mount_management,
            views::management::commands::get_visible_table,
            views::management::commands::switch_tab,
            views::management::commands::click_header,
            views::management::commands::go_to_page,
            views::management::commands::set_rows_per_page,
            views::details::commands::lead_details,
            views::details::commands::meeting_details,
            // Lead form
            forms::lead::create_lead,
            // Meeting form + location
            geo::resolver::commands::mount_meeting_form,
            geo::resolver::commands::leave_meeting_form,
            geo::resolver::commands::get_meeting_form,
            geo::resolver::commands::set_meeting_field,
            geo::resolver::commands::submit_meeting,
            geo::resolver::commands::begin_locating,
            geo::resolver::commands::locate_current,
            geo::resolver::commands::resolve_map_point,
            geo::resolver::commands::select_place,
            geo::resolver::commands::search_address,
            geo::resolver::commands::set_location_text,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        log::error!("error while running FieldSense: {}", e);
        std::process::exit(1);
    }
}
