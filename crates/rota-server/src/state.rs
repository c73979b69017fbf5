use std::sync::Arc;

use rota_core::holidays::HolidayCalendar;
use rota_core::notify::Notifier;
use rota_core::team::Team;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub team: Arc<Team>,
    pub notifier: Arc<dyn Notifier>,
    pub calendar: Arc<HolidayCalendar>,
    /// Base URL for confirm links in announcements.
    pub ingress_url: String,
    /// Serializes confirm/override within this process. The already-assigned
    /// check is read-then-write, so without this two in-flight commits could
    /// both pass it. Two separate processes sharing a store can still race;
    /// that deployment shape is out of scope.
    pub commit_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(
        team: Team,
        notifier: Arc<dyn Notifier>,
        calendar: HolidayCalendar,
        ingress_url: impl Into<String>,
    ) -> Self {
        Self {
            team: Arc::new(team),
            notifier,
            calendar: Arc::new(calendar),
            ingress_url: ingress_url.into(),
            commit_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
