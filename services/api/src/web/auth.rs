//! services/api/src/web/auth.rs
//!
//! Entry routing, registration by one-time passcode, and logout.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect},
};
use college_path_core::navigation::{entry_screen, ENTRY_POINT};
use college_path_core::registration::{self, complete_registration, ensure_unregistered};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::rest::ProfileResponse;
use crate::web::state::AppState;

//=========================================================================================
// Request and Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct EntryResponse {
    /// One of `register`, `onboarding`, `dashboard`.
    #[schema(value_type = String)]
    pub screen: college_path_core::navigation::Screen,
    pub location: String,
}

#[derive(Deserialize, ToSchema)]
pub struct OtpRequest {
    pub email: String,
    pub phone: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - Which screen the session belongs on
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Entry screen for the current session", body = EntryResponse))
)]
pub async fn entry_handler(State(state): State<Arc<AppState>>) -> Json<EntryResponse> {
    let screen = entry_screen(state.session.lock().await.flags());
    Json(EntryResponse {
        screen,
        location: screen.path().to_string(),
    })
}

/// POST /registration/otp - Validate contact details and send a passcode
#[utoipa::path(
    post,
    path = "/registration/otp",
    request_body = OtpRequest,
    responses(
        (status = 202, description = "Passcode sent", body = MessageResponse),
        (status = 400, description = "Invalid email or phone"),
        (status = 409, description = "Session already registered")
    )
)]
pub async fn request_otp_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_unregistered(state.session.lock().await.flags())?;

    let pending = registration::request_code(state.otp.as_ref(), &req.email, &req.phone).await?;
    *state.pending_registration.lock().await = Some(pending);

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "OTP sent to your phone!".to_string(),
        }),
    ))
}

/// POST /registration/verify - Verify the passcode and create the profile
#[utoipa::path(
    post,
    path = "/registration/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 201, description = "Registered", body = ProfileResponse),
        (status = 400, description = "Invalid passcode or no pending registration"),
        (status = 409, description = "Session already registered")
    )
)]
pub async fn verify_otp_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pending = state.pending_registration.lock().await.clone();
    let verified = registration::verify_code(state.otp.as_ref(), pending.as_ref(), &req.otp).await?;

    let profile = {
        let mut session = state.session.lock().await;
        complete_registration(&mut session, verified)?;
        session.profile().cloned()
    };
    *state.pending_registration.lock().await = None;

    Ok((StatusCode::CREATED, Json(ProfileResponse { profile })))
}

/// POST /auth/logout - Clear all session state and return to the entry point
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 303, description = "Session cleared, redirect to the entry point"))
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    state.session.lock().await.logout()?;
    *state.pending_registration.lock().await = None;
    info!("Logged out");
    Ok(Redirect::to(ENTRY_POINT))
}
