//! Barcode resolve endpoint
//!
//! GET /api/barcode/resolve?code=<raw code>

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::engine::CandidateSummary;
use crate::error::{ApiError, ApiResult};
use crate::services::BarcodeResolution;
use crate::AppState;

/// Query parameters
#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    /// Raw scanned code; separators and whitespace are ignored
    #[serde(default)]
    pub code: Option<String>,
}

/// Winning product name
#[derive(Debug, Serialize)]
pub struct BestMatch {
    pub name: String,
    /// Reserved for a secondary (generic) name; always empty for now
    pub alias: String,
    pub confidence: f64,
    pub url: Option<String>,
}

/// Resolve response
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub ok: bool,
    pub provider: String,
    pub code: String,
    pub best: BestMatch,
    pub candidates: Vec<CandidateSummary>,
}

impl From<BarcodeResolution> for ResolveResponse {
    fn from(resolved: BarcodeResolution) -> Self {
        let resolution = resolved.resolution;
        ResolveResponse {
            ok: true,
            provider: resolved.provider.to_string(),
            code: resolved.code,
            best: BestMatch {
                name: resolution.name,
                alias: String::new(),
                confidence: resolution.confidence,
                url: resolution.sample_url,
            },
            candidates: resolution.candidates,
        }
    }
}

/// GET /api/barcode/resolve
pub async fn resolve_barcode(
    State(state): State<AppState>,
    query: Result<Query<ResolveParams>, QueryRejection>,
) -> ApiResult<Json<ResolveResponse>> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let code = params.code.unwrap_or_default();
    let resolved = state.resolver.resolve(&code).await?;
    Ok(Json(resolved.into()))
}

/// Build resolve routes
pub fn resolve_routes() -> Router<AppState> {
    Router::new().route("/api/barcode/resolve", get(resolve_barcode))
}
