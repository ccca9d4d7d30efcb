use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::authoring::{AccessPanel, GeneralPanel, Panel, PanelKind, PricingPanel};
use crate::server::AppState;
use crate::server::dto::UpdatePricingRequest;
use crate::server::response::{ApiError, ApiResponse};

use super::access::owned_course;

/// All three panels in form order.
pub async fn get_settings(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;

    let panels = [PanelKind::General, PanelKind::Access, PanelKind::Pricing]
        .into_iter()
        .map(|kind| Panel::load(store, kind, &course.id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panels)))
}

pub async fn get_general(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;
    let panel = GeneralPanel::load(store, &course.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}

pub async fn put_general(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(mut panel): Json<GeneralPanel>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;

    panel.course_id = course.id;
    panel.save(store)?;
    let panel = GeneralPanel::load(store, &panel.course_id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}

pub async fn get_access(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;
    let panel = AccessPanel::load(store, &course.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}

pub async fn put_access(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(mut panel): Json<AccessPanel>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;

    panel.course_id = course.id;
    panel.save(store)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}

pub async fn get_pricing(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;
    let panel = PricingPanel::load(store, &course.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}

/// Applies only the fields that change, in form order: the compare-at
/// toggle, the price, then the compare-at price.
pub async fn put_pricing(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(req): Json<UpdatePricingRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let course = owned_course(store, &auth.user, &course_id)?;
    let mut panel = PricingPanel::load(store, &course.id)?;

    if let Some(show) = req.show_compare_at_price.filter(|s| *s != panel.show_compare_at_price) {
        panel.set_show_compare_at_price(show)?;
    }
    if let Some(price) = req.price.filter(|p| *p != panel.price) {
        panel.set_price(price)?;
    }
    if let Some(compare_at) = req
        .compare_at_price
        .filter(|c| *c != panel.compare_at_price)
    {
        panel.set_compare_at_price(compare_at)?;
    }

    panel.save(store)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(panel)))
}
