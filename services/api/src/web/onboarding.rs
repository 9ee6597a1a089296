//! services/api/src/web/onboarding.rs
//!
//! Handlers for the three-stage onboarding workflow.

use axum::{extract::State, response::Json};
use college_path_core::navigation::entry_screen;
use college_path_core::onboarding::{self, Progress};
use college_path_core::{Profile, ProfilePatch, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct OnboardingResponse {
    pub current_step: u8,
    pub is_onboarded: bool,
    /// Where the UI should go next.
    pub location: String,
    #[schema(value_type = Option<Object>)]
    pub profile: Option<Profile>,
}

impl OnboardingResponse {
    fn from_store(store: &SessionStore) -> Self {
        let flags = store.flags();
        Self {
            current_step: flags.current_step,
            is_onboarded: flags.is_onboarded,
            location: entry_screen(flags).path().to_string(),
            profile: store.profile().cloned(),
        }
    }
}

fn respond(store: &SessionStore, progress: Progress) -> Json<OnboardingResponse> {
    tracing::debug!(?progress, "Onboarding progressed");
    Json(OnboardingResponse::from_store(store))
}

#[utoipa::path(
    get,
    path = "/onboarding",
    responses(
        (status = 200, description = "Onboarding progress", body = OnboardingResponse),
        (status = 403, description = "Session not registered")
    )
)]
pub async fn get_onboarding_handler(State(state): State<Arc<AppState>>) -> Json<OnboardingResponse> {
    Json(OnboardingResponse::from_store(&*state.session.lock().await))
}

/// Validate and save the current stage, then move forward.
#[utoipa::path(
    post,
    path = "/onboarding/next",
    request_body(content_type = "application/json", description = "Fields entered on the current stage."),
    responses(
        (status = 200, description = "Moved to the next stage or finished", body = OnboardingResponse),
        (status = 400, description = "Stage fields invalid"),
        (status = 409, description = "Onboarding already complete")
    )
)]
pub async fn next_step_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ProfilePatch>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let progress = onboarding::advance(&mut session, form)?;
    Ok(respond(&session, progress))
}

#[utoipa::path(
    post,
    path = "/onboarding/back",
    responses(
        (status = 200, description = "Moved to the previous stage", body = OnboardingResponse),
        (status = 409, description = "Onboarding already complete")
    )
)]
pub async fn previous_step_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let progress = onboarding::back(&mut session)?;
    Ok(respond(&session, progress))
}

/// Save what was entered and finish onboarding without validation.
#[utoipa::path(
    post,
    path = "/onboarding/skip",
    request_body(content_type = "application/json", description = "Fields entered so far."),
    responses(
        (status = 200, description = "Onboarding finished", body = OnboardingResponse),
        (status = 409, description = "Onboarding already complete")
    )
)]
pub async fn skip_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ProfilePatch>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let progress = onboarding::skip(&mut session, form)?;
    Ok(respond(&session, progress))
}
