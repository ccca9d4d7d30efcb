use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::authoring::courses::{self, DUPLICATE_TITLE, NewCourse};
use crate::authoring::load_course_tree;
use crate::server::AppState;
use crate::server::dto::{TitleCheckParams, TitleCheckResponse, UpdateCourseRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

use super::access::owned_course;

pub async fn list_courses(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let courses = state
        .store
        .list_courses(&auth.user.id)
        .api_err("Failed to list courses")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(courses)))
}

pub async fn create_course(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewCourse>,
) -> impl IntoResponse {
    let course = courses::create_course(state.store.as_ref(), &auth.user.id, req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

pub async fn title_check(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleCheckParams>,
) -> impl IntoResponse {
    let debouncer = state.title_debouncer(&auth.user.id);
    let check = debouncer
        .submit(|| courses::title_available(state.store.as_ref(), &auth.user.id, &params.title))
        .await;

    let Some(available) = check.transpose()? else {
        return Ok::<_, ApiError>(Json(ApiResponse::success(TitleCheckResponse {
            title: params.title,
            available: None,
            superseded: true,
            message: None,
        })));
    };

    let message = if params.title.trim().is_empty() {
        Some("Course title is required")
    } else if !available {
        Some(DUPLICATE_TITLE)
    } else {
        None
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(TitleCheckResponse {
        title: params.title,
        available: Some(available),
        superseded: false,
        message,
    })))
}

/// Returns the full course tree.
pub async fn get_course(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &id)?;
    let tree = load_course_tree(store, &course.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(tree)))
}

pub async fn update_course(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let mut course = owned_course(store, &auth.user, &id)?;

    course.status = req.status;
    course.updated_at = Utc::now();
    store.update_course(&course).api_err("Failed to update course")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(course)))
}

pub async fn delete_course(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &id)?;

    courses::delete_course(store, &course.id)?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
