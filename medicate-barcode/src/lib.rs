//! medicate-barcode library interface
//!
//! Resolves scanned product barcodes to product names by ranking web search
//! results. The ranking itself lives in [`engine`]; everything else is the
//! HTTP shell around it.

pub mod api;
pub mod engine;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::BarcodeResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Barcode → product name resolver
    pub resolver: Arc<BarcodeResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: BarcodeResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::resolve_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
