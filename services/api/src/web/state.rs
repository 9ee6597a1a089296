//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use college_path_core::registration::PendingRegistration;
use college_path_core::{Catalog, OtpService, SessionStore};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The backend serves a single student, so there is exactly one session.
/// Handlers hold the session lock only for synchronous store calls, never
/// across the simulated passcode delays.
pub struct AppState {
    pub session: Mutex<SessionStore>,
    /// Contact details awaiting passcode verification.
    pub pending_registration: Mutex<Option<PendingRegistration>>,
    pub catalog: Arc<Catalog>,
    pub otp: Arc<dyn OtpService>,
}

impl AppState {
    pub fn new(session: SessionStore, catalog: Arc<Catalog>, otp: Arc<dyn OtpService>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(session),
            pending_registration: Mutex::new(None),
            catalog,
            otp,
        })
    }
}
