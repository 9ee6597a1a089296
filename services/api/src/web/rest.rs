//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the dashboard endpoints and the master
//! definition for the OpenAPI document.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use college_path_core::dashboard::{bookmarked_colleges, scholarship_board};
use college_path_core::eligibility::{filter_colleges, ALL, ALL_DISTRICTS};
use college_path_core::{College, CollegeCriteria, PortError, Profile, ProfilePatch, Region};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::{auth, onboarding};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::entry_handler,
        auth::request_otp_handler,
        auth::verify_otp_handler,
        auth::logout_handler,
        onboarding::get_onboarding_handler,
        onboarding::next_step_handler,
        onboarding::previous_step_handler,
        onboarding::skip_handler,
        get_profile_handler,
        update_profile_handler,
        list_bookmarks_handler,
        toggle_bookmark_handler,
        list_colleges_handler,
        list_scholarships_handler,
        list_districts_handler,
    ),
    components(
        schemas(
            auth::EntryResponse,
            auth::OtpRequest,
            auth::VerifyOtpRequest,
            auth::MessageResponse,
            onboarding::OnboardingResponse,
            ProfileResponse,
            BookmarkView,
            BookmarksResponse,
            ToggleBookmarkResponse,
            CollegesResponse,
            ScholarshipsResponse,
            DistrictsResponse,
        )
    ),
    tags(
        (name = "College Path API", description = "Local backend for the student college and scholarship finder.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(value_type = Option<Object>)]
    pub profile: Option<Profile>,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarkView {
    pub college_id: String,
    pub marked_at: DateTime<Utc>,
    /// `None` when the catalog no longer lists the college.
    #[schema(value_type = Option<Object>)]
    pub college: Option<College>,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<BookmarkView>,
    /// Bookmarked catalog colleges, in catalog order.
    #[schema(value_type = Vec<Object>)]
    pub colleges: Vec<College>,
}

#[derive(Serialize, ToSchema)]
pub struct ToggleBookmarkResponse {
    pub college_id: String,
    pub bookmarked: bool,
}

#[derive(Serialize, ToSchema)]
pub struct CollegesResponse {
    /// The stream the results were narrowed to, if the profile has one.
    pub filtered_for_stream: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub colleges: Vec<College>,
}

#[derive(Serialize, ToSchema)]
pub struct ScholarshipsResponse {
    /// `false` when nothing matched and every scholarship is listed.
    pub eligible_only: bool,
    /// Scholarship records, each with an added `is_eligible` flag.
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<serde_json::Value>,
}

#[derive(Serialize, ToSchema)]
pub struct DistrictsResponse {
    pub districts: Vec<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct CollegeQuery {
    #[serde(default)]
    pub search: String,
    /// `AP`, `TG`, or `all`.
    #[serde(default = "all")]
    pub state: String,
    /// A district name, or `All Districts`.
    #[serde(default = "all_districts")]
    pub district: String,
    /// A college type such as `Engineering`, or `all`.
    #[serde(default = "all", rename = "type")]
    pub college_type: String,
}

#[derive(Deserialize, IntoParams)]
pub struct DistrictQuery {
    /// `AP`, `TG`, or `all`.
    #[serde(default = "all")]
    pub state: String,
}

fn all() -> String {
    ALL.to_string()
}

fn all_districts() -> String {
    ALL_DISTRICTS.to_string()
}

//=========================================================================================
// Profile Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 403, description = "Session not registered")
    )
)]
pub async fn get_profile_handler(State(state): State<Arc<AppState>>) -> Json<ProfileResponse> {
    let profile = state.session.lock().await.profile().cloned();
    Json(ProfileResponse { profile })
}

/// Merge-patch the profile. Email and phone cannot be changed.
#[utoipa::path(
    patch,
    path = "/profile",
    request_body(content_type = "application/json", description = "Any subset of the editable profile fields."),
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 403, description = "Session not registered")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.update_profile(patch)?;
    Ok(Json(ProfileResponse {
        profile: session.profile().cloned(),
    }))
}

//=========================================================================================
// Bookmark Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/bookmarks",
    responses(
        (status = 200, description = "Saved colleges", body = BookmarksResponse),
        (status = 403, description = "Session not registered")
    )
)]
pub async fn list_bookmarks_handler(State(state): State<Arc<AppState>>) -> Json<BookmarksResponse> {
    let session = state.session.lock().await;
    let catalog = &state.catalog;

    let bookmarks = session
        .bookmarks()
        .iter()
        .map(|b| BookmarkView {
            college_id: b.college_id.clone(),
            marked_at: b.marked_at,
            college: catalog.college(&b.college_id).cloned(),
        })
        .collect();
    let colleges = bookmarked_colleges(session.bookmarks(), catalog)
        .into_iter()
        .cloned()
        .collect();

    Json(BookmarksResponse { bookmarks, colleges })
}

#[utoipa::path(
    post,
    path = "/bookmarks/{college_id}",
    params(("college_id" = String, Path, description = "Catalog id of the college")),
    responses(
        (status = 200, description = "Bookmark toggled", body = ToggleBookmarkResponse),
        (status = 403, description = "Session not registered")
    )
)]
pub async fn toggle_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Path(college_id): Path<String>,
) -> Result<Json<ToggleBookmarkResponse>, ApiError> {
    let bookmarked = state.session.lock().await.toggle_bookmark(&college_id)?;
    Ok(Json(ToggleBookmarkResponse {
        college_id,
        bookmarked,
    }))
}

//=========================================================================================
// Catalog Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/colleges",
    params(CollegeQuery),
    responses(
        (status = 200, description = "Colleges matching the filters and the profile's stream", body = CollegesResponse),
        (status = 400, description = "Unknown state or college type")
    )
)]
pub async fn list_colleges_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CollegeQuery>,
) -> Result<Json<CollegesResponse>, ApiError> {
    let criteria =
        CollegeCriteria::from_selectors(&query.search, &query.state, &query.district, &query.college_type)
            .map_err(ApiError::InvalidFilter)?;

    let session = state.session.lock().await;
    let profile = session.profile();
    let colleges = filter_colleges(profile, &state.catalog.colleges, &criteria)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(CollegesResponse {
        filtered_for_stream: profile.and_then(|p| p.stream).map(|s| s.to_string()),
        colleges,
    }))
}

/// Eligible scholarships if any match, otherwise every scholarship, each
/// flagged with `is_eligible`.
#[utoipa::path(
    get,
    path = "/scholarships",
    responses((status = 200, description = "Scholarship board", body = ScholarshipsResponse))
)]
pub async fn list_scholarships_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScholarshipsResponse>, ApiError> {
    let session = state.session.lock().await;
    let board = scholarship_board(session.profile(), &state.catalog);
    let entries: Vec<serde_json::Value> = board
        .entries
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    Ok(Json(ScholarshipsResponse {
        eligible_only: board.eligible_only,
        entries,
    }))
}

#[utoipa::path(
    get,
    path = "/districts",
    params(DistrictQuery),
    responses(
        (status = 200, description = "Districts of the selected state", body = DistrictsResponse),
        (status = 400, description = "Unknown state")
    )
)]
pub async fn list_districts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DistrictQuery>,
) -> Result<Json<DistrictsResponse>, ApiError> {
    let region = match query.state.as_str() {
        "" | ALL => None,
        s => Some(s.parse::<Region>().map_err(ApiError::InvalidFilter)?),
    };
    Ok(Json(DistrictsResponse {
        districts: state.catalog.districts_for(region).to_vec(),
    }))
}
