//! Unauthenticated course catalog for published sites.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use crate::authoring::catalog;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt};

async fn list_site_courses(
    State(state): State<Arc<AppState>>,
    Path(site_url): Path<String>,
) -> impl IntoResponse {
    let courses = catalog::courses_for_site(state.store.as_ref(), &site_url)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(courses)))
}

async fn get_site_course(
    State(state): State<Arc<AppState>>,
    Path((site_url, slug)): Path<(String, String)>,
) -> impl IntoResponse {
    let course = catalog::course_by_slug(state.store.as_ref(), &site_url, &slug)?
        .or_not_found("Course not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(course)))
}

pub fn catalog_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog/{site_url}", get(list_site_courses))
        .route("/catalog/{site_url}/{slug}", get(get_site_course))
}
