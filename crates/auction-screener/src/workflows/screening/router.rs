use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DealRecord, ListingRecord};
use super::filter::{FilterConfig, FilterOverrides};
use super::metrics::ProfitRequest;
use super::repository::{DealHistory, ListingQuery, ListingStore, RepositoryError, SizeClass};
use super::service::{ScreeningService, ScreeningServiceError};

/// Router builder exposing listing ingestion, screening and calculator endpoints.
pub fn screening_router<S, D>(service: Arc<ScreeningService<S, D>>) -> Router
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    Router::new()
        .route(
            "/api/v1/auctions",
            post(ingest_listings_handler::<S, D>).get(list_handler::<S, D>),
        )
        .route("/api/v1/auctions/screen", post(screen_handler::<S, D>))
        .route("/api/v1/deals", post(ingest_deals_handler::<S, D>))
        .route("/api/v1/turnover/refresh", post(refresh_handler::<S, D>))
        .route("/api/v1/calculator/profit", post(profit_handler::<S, D>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingBatch {
    #[serde(default)]
    pub(crate) items: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DealBatch {
    #[serde(default)]
    pub(crate) items: Vec<DealRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScreenRequest {
    #[serde(default)]
    pub(crate) listings: Option<Vec<ListingRecord>>,
    #[serde(default)]
    pub(crate) config: FilterConfig,
    #[serde(default)]
    pub(crate) query: ListingQuery,
}

/// Query-string parameters of `GET /api/v1/auctions`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuctionListParams {
    property_kind: Option<String>,
    min_area_m2: Option<f64>,
    exclude_metro_regions: Option<bool>,
    fail_count_min: Option<u32>,
    fail_count_max: Option<u32>,
    min_turnover_rate: Option<f64>,
    max_investment: Option<i64>,
    safe_only: Option<bool>,
    exclude_special_properties: Option<bool>,
    region: Option<String>,
    size_class: Option<SizeClass>,
}

impl AuctionListParams {
    fn into_parts(self) -> (FilterConfig, ListingQuery) {
        let overrides = FilterOverrides {
            property_kind: self.property_kind,
            min_area_m2: self.min_area_m2,
            exclude_metro_regions: self.exclude_metro_regions,
            fail_count_min: self.fail_count_min,
            fail_count_max: self.fail_count_max,
            min_turnover_rate: self.min_turnover_rate,
            max_investment: self.max_investment,
            safe_only: self.safe_only,
            exclude_special_properties: self.exclude_special_properties,
        };
        let query = ListingQuery {
            region: self.region.filter(|region| !region.trim().is_empty()),
            size_class: self.size_class,
        };
        (overrides.apply(FilterConfig::default()), query)
    }
}

pub(crate) async fn list_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
    Query(params): Query<AuctionListParams>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    let (config, query) = params.into_parts();
    match service.screen(&query, config) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ingest_listings_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
    axum::Json(batch): axum::Json<ListingBatch>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    match service.ingest_listings(batch.items) {
        Ok(summary) => {
            let payload = json!({
                "success": true,
                "count": summary.total(),
                "inserted": summary.inserted,
                "updated": summary.updated,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn screen_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
    axum::Json(request): axum::Json<ScreenRequest>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    let outcome = match request.listings {
        Some(listings) => Ok(service.screen_batch(listings, request.config)),
        None => service.screen(&request.query, request.config),
    };
    match outcome {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ingest_deals_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
    axum::Json(batch): axum::Json<DealBatch>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    match service.ingest_deals(batch.items) {
        Ok(count) => {
            let payload = json!({
                "success": true,
                "count": count,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn refresh_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    match service.refresh_liquidity() {
        Ok(refresh) => (StatusCode::OK, axum::Json(refresh)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profit_handler<S, D>(
    State(service): State<Arc<ScreeningService<S, D>>>,
    axum::Json(request): axum::Json<ProfitRequest>,
) -> Response
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    let projection = service.project_profit(&request);
    (StatusCode::OK, axum::Json(projection)).into_response()
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::MissingCaseId(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
