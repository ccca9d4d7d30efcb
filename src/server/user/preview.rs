use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::authoring::{CourseEditor, render_preview};
use crate::server::AppState;
use crate::server::dto::PreviewRequest;
use crate::server::response::{ApiError, ApiResponse};

use super::access::owned_course;

/// Renders the learner view with the given lessons opened. Nothing is stored.
pub async fn preview_course(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(req): Json<PreviewRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;

    let mut editor = CourseEditor::open(store, &course.id)?;
    for activity_id in &req.opened {
        editor.open_lesson(activity_id);
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(render_preview(editor.tree()))))
}
