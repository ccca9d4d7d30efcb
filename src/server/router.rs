use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::catalog::catalog_router;
use super::user::user_router;
use crate::authoring::TitleDebouncer;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub data_dir: PathBuf,
    title_checks: Mutex<HashMap<String, TitleDebouncer>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, data_dir: PathBuf) -> Self {
        Self {
            store,
            data_dir,
            title_checks: Mutex::new(HashMap::new()),
        }
    }

    /// Duplicate-title checks are debounced per user.
    pub fn title_debouncer(&self, user_id: &str) -> TitleDebouncer {
        let mut checks = self
            .title_checks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        checks.entry(user_id.to_string()).or_default().clone()
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/health", get(health))
        .nest("/api/v1/admin", admin_router())
        .nest("/api/v1", user_router().merge(catalog_router()))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
