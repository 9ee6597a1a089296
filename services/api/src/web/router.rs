//! services/api/src/web/router.rs
//!
//! Assembles the application router from the individual handlers.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::{auth, middleware::require_registered, onboarding, rest, state::AppState};

/// Builds the API router. Profile, onboarding, and bookmark routes require a
/// registered session.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no registration required)
    let public_routes = Router::new()
        .route("/", get(auth::entry_handler))
        .route("/registration/otp", post(auth::request_otp_handler))
        .route("/registration/verify", post(auth::verify_otp_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/colleges", get(rest::list_colleges_handler))
        .route("/scholarships", get(rest::list_scholarships_handler))
        .route("/districts", get(rest::list_districts_handler));

    // Registered routes
    let registered_routes = Router::new()
        .route("/onboarding", get(onboarding::get_onboarding_handler))
        .route("/onboarding/next", post(onboarding::next_step_handler))
        .route("/onboarding/back", post(onboarding::previous_step_handler))
        .route("/onboarding/skip", post(onboarding::skip_handler))
        .route(
            "/profile",
            get(rest::get_profile_handler).patch(rest::update_profile_handler),
        )
        .route("/bookmarks", get(rest::list_bookmarks_handler))
        .route("/bookmarks/{college_id}", post(rest::toggle_bookmark_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_registered,
        ));

    Router::new()
        .merge(public_routes)
        .merge(registered_routes)
        .with_state(app_state)
}
