use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateSiteRequest, UpdateSiteRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_site_name, validate_site_url};
use crate::store::Store;
use crate::types::Site;

use super::access::owned_site;

fn ensure_url_free(store: &dyn Store, url: &str) -> Result<(), ApiError> {
    if store
        .get_site_by_url(url)
        .api_err("Failed to check site url")?
        .is_some()
    {
        return Err(ApiError::conflict("Site url is already taken"));
    }
    Ok(())
}

pub async fn list_sites(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let sites = state
        .store
        .list_sites(&auth.user.id)
        .api_err("Failed to list sites")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(sites)))
}

pub async fn create_site(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSiteRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let url = req.url.trim().to_lowercase();
    validate_site_name(&req.name)?;
    validate_site_url(&url)?;
    ensure_url_free(store, &url)?;

    let now = Utc::now();
    let site = Site {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user.id.clone(),
        name: req.name.trim().to_string(),
        url,
        status: req.status,
        created_at: now,
        updated_at: now,
    };

    store.create_site(&site)?;
    tracing::info!(site_id = %site.id, url = %site.url, "Created site");

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(site))))
}

pub async fn get_site(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let site = owned_site(state.store.as_ref(), &auth.user, &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(site)))
}

pub async fn update_site(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSiteRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let mut site = owned_site(store, &auth.user, &id)?;

    if let Some(name) = req.name {
        validate_site_name(&name)?;
        site.name = name.trim().to_string();
    }
    if let Some(url) = req.url {
        let url = url.trim().to_lowercase();
        validate_site_url(&url)?;
        if url != site.url {
            ensure_url_free(store, &url)?;
            site.url = url;
        }
    }
    if let Some(status) = req.status {
        site.status = status;
    }

    site.updated_at = Utc::now();
    store.update_site(&site).api_err("Failed to update site")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(site)))
}

/// Deletes a site and unlinks it from every course that displayed it.
pub async fn delete_site(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let site = owned_site(store, &auth.user, &id)?;

    let unlinked = store.unlink_site(&site.id).api_err("Failed to unlink site")?;
    store.delete_site(&site.id).api_err("Failed to delete site")?;
    tracing::info!(site_id = %site.id, unlinked, "Deleted site");

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
