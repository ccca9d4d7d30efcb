use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::authoring::{ActivityDraft, ActivityPatch, CourseEditor};
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};

use super::access::{owned_activity, owned_section};

/// Uploads carry only a `file_name`; the binary itself is not accepted here.
pub async fn create_activity(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(section_id): Path<String>,
    Json(draft): Json<ActivityDraft>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (course, section) = owned_section(store, &auth.user, &section_id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    let activity = editor.add_activity(&section.id, draft)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(activity))))
}

pub async fn update_activity(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ActivityPatch>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (course, activity) = owned_activity(store, &auth.user, &id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    let activity = editor.edit_activity(&activity.id, patch)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(activity)))
}

pub async fn delete_activity(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let (course, activity) = owned_activity(store, &auth.user, &id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    if !editor.delete_activity(&activity.section_id, &activity.id)? {
        // The row exists but its section is gone; drop it directly.
        store.delete_activity(&activity.id)?;
    }

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
