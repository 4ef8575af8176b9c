use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use chrono::Utc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use quill_core::export::{export_filename, to_csv};
use quill_core::{AppError, QuoteQuery, QuoteStats, TracingCollectReporter};

use crate::dto::{
    HealthResponse, QuoteFilterQuery, QuoteListResponse, QuoteResponse, ScrapeRequest,
    ScrapeResponse, StatsResponse, TagListResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/scrape", post(scrape))
        .route("/api/quotes", get(list_quotes))
        .route("/api/stats", get(get_stats))
        .route("/api/tags", get(list_tags))
        .route("/api/export", get(export_quotes));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Scrape finished, record set replaced", body = ScrapeResponse),
        (status = 400, description = "Invalid page count or malformed body", body = crate::dto::ErrorResponse),
        (status = 409, description = "Another scrape is running", body = crate::dto::ErrorResponse),
    ),
    tag = "scrape"
)]
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    payload: Result<axum::Json<ScrapeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = payload.map_err(|rejection| {
        AppError::ConfigError(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let _guard = state
        .scrape_guard
        .try_lock()
        .map_err(|_| AppError::ScrapeInProgress)?;

    if body.max_pages < 1 || body.max_pages > state.max_pages {
        return Err(AppError::ConfigError(format!(
            "max_pages must be between 1 and {}, got {}",
            state.max_pages, body.max_pages
        ))
        .into());
    }

    let result = state
        .collector
        .collect(body.max_pages, &TracingCollectReporter)
        .await?;

    let stats = QuoteStats::from_quotes(&result.records);
    let quotes: Vec<QuoteResponse> = result
        .records
        .iter()
        .cloned()
        .map(QuoteResponse::from)
        .collect();
    let message = format!("Successfully scraped {} quotes", quotes.len());

    state.store.replace(result.records);

    let response = ScrapeResponse {
        quotes,
        stats: stats.into(),
        pages_visited: result.pages_visited,
        failed_pages: result.failed_pages,
        stop_reason: result.stop_reason.to_string(),
        message,
    };

    Ok(axum::Json(response))
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/quotes",
    params(QuoteFilterQuery),
    responses(
        (status = 200, description = "Matching quotes in collection order", body = QuoteListResponse),
    ),
    tag = "quotes"
)]
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteFilterQuery>,
) -> impl IntoResponse {
    let quotes = state.store.query(&QuoteQuery::from(query));
    let total = quotes.len();

    axum::Json(QuoteListResponse {
        quotes: quotes.into_iter().map(QuoteResponse::from).collect(),
        total,
    })
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Statistics over the current record set", body = StatsResponse),
    ),
    tag = "quotes"
)]
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(StatsResponse::from(state.store.stats()))
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "All tags in the current record set", body = TagListResponse),
    ),
    tag = "quotes"
)]
pub async fn list_tags(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(TagListResponse {
        tags: state.store.list_tags().into_iter().collect(),
    })
}

#[utoipa::path(
    get,
    path = "/api/export",
    params(QuoteFilterQuery),
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing matches", body = crate::dto::ErrorResponse),
    ),
    tag = "quotes"
)]
pub async fn export_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = state.store.query(&QuoteQuery::from(query));
    if quotes.is_empty() {
        return Err(AppError::NothingToExport.into());
    }

    let body = to_csv(&quotes)?;
    let filename = export_filename(Utc::now());
    tracing::info!(quotes = quotes.len(), %filename, "Exporting CSV");

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];

    Ok((headers, body))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        quotes: state.store.len(),
    })
}
