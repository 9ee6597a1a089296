//! services/api/src/web/middleware.rs
//!
//! Registration guard for routes that need a student profile.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::AppState;

/// Middleware that rejects requests while the session is not registered.
///
/// If registered, the request continues to the handler.
/// Otherwise returns 403 Forbidden.
pub async fn require_registered(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let registered = state.session.lock().await.flags().is_registered;
    if !registered {
        debug!(path = %req.uri().path(), "Rejected request from unregistered session");
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}
