pub mod access;
mod activities;
mod courses;
mod preview;
mod sections;
mod settings;
mod sites;

use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, patch, post},
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};

/// The authenticated user behind the token.
async fn me(auth: RequireUser) -> impl IntoResponse {
    Ok::<_, ApiError>(Json(ApiResponse::success(auth.user)))
}

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        // Courses
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/courses/title-check", get(courses::title_check))
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/courses/{id}/preview", post(preview::preview_course))
        // Settings panels
        .route("/courses/{id}/settings", get(settings::get_settings))
        .route(
            "/courses/{id}/settings/general",
            get(settings::get_general).put(settings::put_general),
        )
        .route(
            "/courses/{id}/settings/access",
            get(settings::get_access).put(settings::put_access),
        )
        .route(
            "/courses/{id}/settings/pricing",
            get(settings::get_pricing).put(settings::put_pricing),
        )
        // Sections
        .route("/courses/{id}/sections", post(sections::create_section))
        .route(
            "/sections/{id}",
            patch(sections::update_section).delete(sections::delete_section),
        )
        // Activities
        .route(
            "/sections/{id}/activities",
            post(activities::create_activity),
        )
        .route(
            "/activities/{id}",
            patch(activities::update_activity)
                .delete(activities::delete_activity),
        )
        // Sites
        .route("/sites", get(sites::list_sites).post(sites::create_site))
        .route(
            "/sites/{id}",
            get(sites::get_site)
                .patch(sites::update_site)
                .delete(sites::delete_site),
        )
}
