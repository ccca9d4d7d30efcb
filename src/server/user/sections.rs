use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::authoring::{CourseEditor, SectionPatch};
use crate::server::AppState;
use crate::server::dto::CreateSectionRequest;
use crate::server::response::{ApiError, ApiResponse};

use super::access::{owned_course, owned_section};

pub async fn create_section(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(req): Json<CreateSectionRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    let section = editor.add_section(&req.title, &req.description)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(section))))
}

pub async fn update_section(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SectionPatch>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (course, section) = owned_section(store, &auth.user, &id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    let section = editor.edit_section(&section.id, req)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(section)))
}

pub async fn delete_section(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (course, section) = owned_section(store, &auth.user, &id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    if !editor.delete_section(&section.id)? {
        return Err(ApiError::not_found("Section not found"));
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
