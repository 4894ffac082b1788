// Axum API Server Module
//
// Purpose: REST API over the seafood scorer (species lookup, scoring,
// label parsing and full assessments)
// All scoring is CPU-only over immutable reference data; assessments are
// memoised in a Moka cache keyed by the serialized request.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::time::Duration;

#[cfg(feature = "api")]
use crate::config::ServerConfig;

#[cfg(feature = "api")]
use crate::label::{parse_barcode_product, parse_eu_label, ParsedLabel};

#[cfg(feature = "api")]
use crate::metrics::iucn_status::deserialize_lenient;

#[cfg(feature = "api")]
use crate::metrics::IucnStatus;

#[cfg(feature = "api")]
use crate::scorer::{LiveSignals, ScoreBreakdown, ScoringInput, SeafoodScorer};

#[cfg(feature = "api")]
use crate::utils::{display_name, Locale};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<SeafoodScorer>,
    pub cache: Cache<String, serde_json::Value>,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(scorer: SeafoodScorer, cache_ttl: Duration) -> Self {
        tracing::info!("Initializing Moka cache (TTL {:?})...", cache_ttl);
        let cache = Cache::builder()
            .max_capacity(10_000) // 10K entries
            .time_to_live(cache_ttl)
            .build();

        Self {
            scorer: Arc::new(scorer),
            cache,
        }
    }

    /// Load reference data as configured and build the state
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading reference data...");
        let data = config.load_reference_data()?;
        Ok(Self::new(SeafoodScorer::new(data), config.cache_ttl))
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Species endpoints
        // IMPORTANT: search/resolve must come before :id
        .route("/api/species/search", get(search_species))
        .route("/api/species/resolve", get(resolve_species))
        .route("/api/species/:id", get(get_species))

        // Scoring endpoints
        .route("/api/score", post(score))
        .route("/api/assess", post(assess))

        // Label normalisation
        .route("/api/labels/parse", post(parse_label))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug, Deserialize)]
pub struct SpeciesQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub lang: Option<String>,
}

#[cfg(feature = "api")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AssessRequest {
    pub label: ParsedLabel,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub iucn_status: Option<IucnStatus>,
    /// Live footprint in kg CO₂e per kg
    #[serde(default)]
    pub co2_kg_per_kg: Option<f64>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[cfg(feature = "api")]
#[derive(Debug, Deserialize)]
pub struct LabelParseRequest {
    /// EU label text
    #[serde(default)]
    pub text: Option<String>,
    /// Open Food Facts product object
    #[serde(default)]
    pub product: Option<serde_json::Value>,
}

/// Unknown or missing locale codes fall back to Spanish
#[cfg(feature = "api")]
fn parse_locale(raw: Option<&str>) -> Locale {
    raw.and_then(|code| code.parse().ok()).unwrap_or_default()
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn search_species(
    State(state): State<AppState>,
    Query(params): Query<SpeciesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let locale = parse_locale(params.lang.as_deref());
    let start = std::time::Instant::now();
    let results = state.scorer.search_species(&params.q);
    let elapsed = start.elapsed();

    tracing::debug!(
        "Species search '{}' returned {} results in {:?}",
        params.q,
        results.len(),
        elapsed
    );

    let data: Vec<serde_json::Value> = results
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "display_name": display_name(s, locale),
                "scientific_name": s.names.scientific,
                "iucn_status": s.default_iucn_status,
                "default_score": s.default_score,
                "category": s.category,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
        "query_time_us": elapsed.as_micros(),
    })))
}

#[cfg(feature = "api")]
async fn resolve_species(
    State(state): State<AppState>,
    Query(params): Query<SpeciesQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.scorer.resolve_species_id(&params.q) {
        Some(id) => Ok(Json(serde_json::json!({ "id": id }))),
        None => Err(AppError::NotFound(format!(
            "No species matches '{}'",
            params.q.trim()
        ))),
    }
}

#[cfg(feature = "api")]
async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let species = state
        .scorer
        .species(&id)
        .ok_or_else(|| AppError::NotFound(format!("Species {} not found", id)))?;

    let value = serde_json::to_value(species).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(value))
}

#[cfg(feature = "api")]
async fn score(
    State(state): State<AppState>,
    Json(input): Json<ScoringInput>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    if input.species_id.trim().is_empty() {
        return Err(AppError::BadRequest("species_id is required".to_string()));
    }

    Ok(Json(state.scorer.compute_score(&input)))
}

#[cfg(feature = "api")]
async fn assess(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!(
        "assess:{}",
        serde_json::to_string(&request).map_err(|e| AppError::Internal(e.to_string()))?
    );

    // Check cache
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for assessment");
        return Ok(Json(cached));
    }

    // CPU-bound work: run in blocking thread pool
    let scorer = state.scorer.clone();
    let locale = parse_locale(request.locale.as_deref());
    let species_text = request.label.species_raw.clone().unwrap_or_default();

    let live = LiveSignals {
        iucn_status: request.iucn_status,
        co2_kg_per_kg: request.co2_kg_per_kg,
    };

    let result = tokio::task::spawn_blocking(move || {
        scorer.assess_with(&request.label, live, locale)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .ok_or_else(|| AppError::NotFound(format!("No species matches '{}'", species_text.trim())))?;

    tracing::info!(
        species = %result.species_id,
        score = result.score.final_score,
        "Assessed label"
    );

    let value = serde_json::to_value(&result).map_err(|e| AppError::Internal(e.to_string()))?;

    // Cache result
    state.cache.insert(cache_key, value.clone()).await;

    Ok(Json(value))
}

#[cfg(feature = "api")]
async fn parse_label(Json(request): Json<LabelParseRequest>) -> Result<Json<ParsedLabel>, AppError> {
    match (request.text, request.product) {
        (Some(text), _) => Ok(Json(parse_eu_label(&text))),
        (None, Some(product)) => Ok(Json(parse_barcode_product(&product))),
        (None, None) => Err(AppError::BadRequest(
            "expected 'text' or 'product'".to_string(),
        )),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
    NotFound(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
