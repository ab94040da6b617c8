//! Turns map clicks, marker drags, device positions and address searches
//! into the meeting form's location.
//!
//! Every run takes a sequence number when it starts. A run whose result lands
//! after a newer run has already written to the form is dropped, as is any
//! result that lands after the form's view was left.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::google::GoogleGeocoder;
use super::nominatim::NominatimGeocoder;
use super::{
    Coordinate, LocationCandidate, StatusMessage, STATUS_COORDINATE_FALLBACK, STATUS_FOUND,
    STATUS_FOUND_ALTERNATIVE, STATUS_GEOLOCATION_UNSUPPORTED, STATUS_LOCATING, STATUS_NO_MATCH,
    STATUS_RETRIEVING, STATUS_SEARCHING, STATUS_SELECTED, STATUS_TRYING_ALTERNATIVE,
};
use crate::config::AppConfig;
use crate::forms::MeetingForm;
use crate::views::scope::ViewScope;

pub type StatusListener = Arc<dyn Fn(&StatusMessage) + Send + Sync>;

/// What the device reported for a "use current location" request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GeolocationFix {
    Position { lat: f64, lng: f64 },
    Failed { message: String },
    Unsupported,
}

/// A place picked from the address autocomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSelection {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: Option<String>,
    /// What was in the search box when the place was picked.
    #[serde(default)]
    pub typed_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTicket(u64);

pub struct LocationResolver {
    primary: GoogleGeocoder,
    secondary: NominatimGeocoder,
    form: Arc<Mutex<MeetingForm>>,
    scope: ViewScope,
    sequence: AtomicU64,
    listener: Option<StatusListener>,
}

impl LocationResolver {
    pub fn new(
        primary: GoogleGeocoder,
        secondary: NominatimGeocoder,
        form: Arc<Mutex<MeetingForm>>,
        scope: ViewScope,
    ) -> Self {
        Self {
            primary,
            secondary,
            form,
            scope,
            sequence: AtomicU64::new(0),
            listener: None,
        }
    }

    pub fn from_config(config: &AppConfig, form: Arc<Mutex<MeetingForm>>, scope: ViewScope) -> Self {
        Self::new(
            GoogleGeocoder::new(&config.google_geocode_url, &config.google_maps_api_key),
            NominatimGeocoder::new(&config.nominatim_url, &config.nominatim_user_agent),
            form,
            scope,
        )
    }

    pub fn with_listener(mut self, listener: StatusListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn form(&self) -> Arc<Mutex<MeetingForm>> {
        Arc::clone(&self.form)
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    // ─── Triggers ────────────────────────────────────────────────────────

    /// Shown while the device is asked for its position.
    pub fn begin_locating(&self) {
        self.report(StatusMessage::info(STATUS_LOCATING));
    }

    pub async fn locate_current(&self, fix: GeolocationFix) -> Option<LocationCandidate> {
        match fix {
            GeolocationFix::Position { lat, lng } => {
                self.resolve_coordinate(Coordinate::new(lat, lng)).await
            }
            GeolocationFix::Failed { message } => {
                log::error!("Error getting location: {}", message);
                self.report(StatusMessage::error(format!(
                    "Error getting location: {}",
                    message
                )));
                None
            }
            GeolocationFix::Unsupported => {
                log::error!("Geolocation is not supported");
                self.report(StatusMessage::error(STATUS_GEOLOCATION_UNSUPPORTED));
                None
            }
        }
    }

    /// Map click, marker drag or device position. Returns the applied
    /// candidate, or `None` when a newer update or the end of the view made
    /// this run irrelevant.
    pub async fn resolve_coordinate(&self, coordinate: Coordinate) -> Option<LocationCandidate> {
        let ticket = self.begin_run();
        let (address, outcome) = self.reverse_geocode(ticket, coordinate).await;

        let candidate = LocationCandidate {
            lat: coordinate.lat,
            lng: coordinate.lng,
            formatted_address: address,
        };

        if self.apply(ticket, Some(coordinate), candidate.display_text(), outcome) {
            Some(candidate)
        } else {
            None
        }
    }

    /// Forward path: a picked place is taken as resolved without reverse geocoding.
    pub fn select_place(&self, place: PlaceSelection) -> Option<LocationCandidate> {
        let ticket = self.begin_run();
        self.accept_place(ticket, place)
    }

    /// Free-text search through both providers, then treated as a picked place.
    pub async fn search_address(&self, query: &str) -> Option<LocationCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let ticket = self.begin_run();
        self.report_run(ticket, StatusMessage::info(STATUS_SEARCHING));

        let hit = match self.primary.search(query).await {
            Ok(hit) => Ok(hit),
            Err(e) => {
                log::warn!("Primary address search failed for '{}': {}", query, e);
                self.secondary.search(query).await
            }
        };

        match hit {
            Ok(hit) => self.accept_place(
                ticket,
                PlaceSelection {
                    lat: hit.lat,
                    lng: hit.lng,
                    formatted_address: hit.formatted_address,
                    typed_text: query.to_string(),
                },
            ),
            Err(e) => {
                log::warn!("Address search failed for '{}': {}", query, e);
                self.report_run(ticket, StatusMessage::error(STATUS_NO_MATCH));
                None
            }
        }
    }

    /// Direct edit of the address text. Counts as the newest update, so
    /// lookups still in flight will not overwrite it.
    pub fn set_location_text(&self, text: &str) -> bool {
        let ticket = self.begin_run();
        if !self.scope.is_active() {
            return false;
        }
        let mut form = self.form.lock();
        if ticket.0 < form.location_run {
            return false;
        }
        form.location_run = ticket.0;
        form.place(None, text.to_string());
        true
    }

    // ─── Provider chain ──────────────────────────────────────────────────

    async fn reverse_geocode(
        &self,
        ticket: RunTicket,
        coordinate: Coordinate,
    ) -> (Option<String>, StatusMessage) {
        self.report_run(ticket, StatusMessage::info(STATUS_RETRIEVING));

        match self.primary.reverse(coordinate).await {
            Ok(address) => return (Some(address), StatusMessage::info(STATUS_FOUND)),
            Err(e) => log::warn!("Primary geocoding was not successful for {}: {}", coordinate, e),
        }

        self.report_run(ticket, StatusMessage::info(STATUS_TRYING_ALTERNATIVE));

        match self.secondary.reverse(coordinate).await {
            Ok(address) => (Some(address), StatusMessage::info(STATUS_FOUND_ALTERNATIVE)),
            Err(e) => {
                log::error!("Error with Nominatim geocoding for {}: {}", coordinate, e);
                (None, StatusMessage::error(STATUS_COORDINATE_FALLBACK))
            }
        }
    }

    fn accept_place(&self, ticket: RunTicket, place: PlaceSelection) -> Option<LocationCandidate> {
        let coordinate = Coordinate::new(place.lat, place.lng);
        let text = place
            .formatted_address
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| place.typed_text.clone());

        let candidate = LocationCandidate {
            lat: place.lat,
            lng: place.lng,
            formatted_address: place.formatted_address,
        };

        if self.apply(ticket, Some(coordinate), text, StatusMessage::info(STATUS_SELECTED)) {
            Some(candidate)
        } else {
            None
        }
    }

    // ─── Sequencing ──────────────────────────────────────────────────────

    pub(crate) fn begin_run(&self) -> RunTicket {
        RunTicket(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, ticket: RunTicket) -> bool {
        self.scope.is_active() && ticket.0 >= self.form.lock().location_run
    }

    /// Writes a finished run into the form unless it went stale. The terminal
    /// status is only shown for runs that were applied.
    pub(crate) fn apply(
        &self,
        ticket: RunTicket,
        coordinate: Option<Coordinate>,
        location: String,
        status: StatusMessage,
    ) -> bool {
        if !self.scope.is_active() {
            log::debug!("Dropping location run {}: view was left", ticket.0);
            return false;
        }

        {
            let mut form = self.form.lock();
            if ticket.0 < form.location_run {
                log::debug!(
                    "Dropping location run {}: run {} already applied",
                    ticket.0,
                    form.location_run
                );
                return false;
            }
            form.location_run = ticket.0;
            form.place(coordinate, location);
        }

        self.report(status);
        true
    }

    /// Progress of a run still in flight. Silent once a newer run has landed.
    fn report_run(&self, ticket: RunTicket, status: StatusMessage) {
        if !self.is_current(ticket) {
            log::debug!("Suppressing status of stale location run {}: {}", ticket.0, status.text);
            return;
        }
        self.report(status);
    }

    fn report(&self, status: StatusMessage) {
        if !self.scope.is_active() {
            return;
        }
        if let Some(listener) = &self.listener {
            listener(&status);
        }
        self.form.lock().status = Some(status);
    }
}

// ─── Tauri Commands ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
pub mod commands {
    use super::*;
    use crate::api::ApiState;
    use crate::config::ConfigState;
    use crate::forms::FormError;
    use crate::records::Meeting;
    use parking_lot::RwLock;
    use tauri::{AppHandle, Emitter};

    /// Resolver of the currently mounted meeting form.
    pub type ResolverState = Arc<RwLock<Arc<LocationResolver>>>;

    fn current(state: &tauri::State<'_, ResolverState>) -> Arc<LocationResolver> {
        Arc::clone(&state.read())
    }

    /// A resolver over a blank form that pushes status lines to the webview.
    pub fn build(app: &AppHandle, config: &AppConfig) -> LocationResolver {
        let form = Arc::new(Mutex::new(MeetingForm::new(config.default_center)));
        let handle = app.clone();
        LocationResolver::from_config(config, form, ViewScope::new()).with_listener(Arc::new(
            move |status: &StatusMessage| {
                let _ = handle.emit("location-status", status);
            },
        ))
    }

    /// Fresh form for a newly opened "Create Meeting" view. Lookups still
    /// running for the previous form are dropped.
    #[tauri::command]
    pub fn mount_meeting_form(
        app: AppHandle,
        resolver: tauri::State<'_, ResolverState>,
        config: tauri::State<'_, ConfigState>,
    ) -> MeetingForm {
        let cfg = config.lock().clone();
        let fresh = Arc::new(build(&app, &cfg));
        let form = fresh.form.lock().clone();

        let previous = std::mem::replace(&mut *resolver.write(), fresh);
        previous.scope().end();
        form
    }

    #[tauri::command]
    pub fn leave_meeting_form(resolver: tauri::State<'_, ResolverState>) {
        current(&resolver).scope().end();
    }

    #[tauri::command]
    pub async fn submit_meeting(
        resolver: tauri::State<'_, ResolverState>,
        api: tauri::State<'_, ApiState>,
    ) -> Result<Meeting, String> {
        let form = current(&resolver).form.lock().clone();
        let api = api.read().clone();
        form.submit(&api).await.map_err(|e| e.to_string())
    }

    #[tauri::command]
    pub fn get_meeting_form(resolver: tauri::State<'_, ResolverState>) -> MeetingForm {
        current(&resolver).form.lock().clone()
    }

    #[tauri::command]
    pub fn set_meeting_field(
        resolver: tauri::State<'_, ResolverState>,
        name: String,
        value: String,
    ) -> Result<(), String> {
        current(&resolver)
            .form
            .lock()
            .set_field(&name, &value)
            .map_err(|e: FormError| e.to_string())
    }

    #[tauri::command]
    pub fn begin_locating(resolver: tauri::State<'_, ResolverState>) {
        current(&resolver).begin_locating();
    }

    #[tauri::command]
    pub async fn locate_current(
        resolver: tauri::State<'_, ResolverState>,
        fix: GeolocationFix,
    ) -> Result<Option<LocationCandidate>, String> {
        let resolver = current(&resolver);
        Ok(resolver.locate_current(fix).await)
    }

    #[tauri::command]
    pub async fn resolve_map_point(
        resolver: tauri::State<'_, ResolverState>,
        lat: f64,
        lng: f64,
    ) -> Result<Option<LocationCandidate>, String> {
        let resolver = current(&resolver);
        Ok(resolver.resolve_coordinate(Coordinate::new(lat, lng)).await)
    }

    #[tauri::command]
    pub fn select_place(
        resolver: tauri::State<'_, ResolverState>,
        place: PlaceSelection,
    ) -> Option<LocationCandidate> {
        current(&resolver).select_place(place)
    }

    #[tauri::command]
    pub async fn search_address(
        resolver: tauri::State<'_, ResolverState>,
        query: String,
    ) -> Result<Option<LocationCandidate>, String> {
        let resolver = current(&resolver);
        Ok(resolver.search_address(&query).await)
    }

    #[tauri::command]
    pub fn set_location_text(resolver: tauri::State<'_, ResolverState>, text: String) -> bool {
        current(&resolver).set_location_text(&text)
    }
}
