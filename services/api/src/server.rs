use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDealHistory, InMemoryListingStore};
use crate::routes::with_screening_routes;
use auction_screener::config::AppConfig;
use auction_screener::error::AppError;
use auction_screener::telemetry;
use auction_screener::workflows::screening::ScreeningService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryListingStore::default());
    let deals = Arc::new(InMemoryDealHistory::default());
    let service = Arc::new(
        ScreeningService::new(store, deals).with_keywords(config.screening.keywords.clone()),
    );

    let app = with_screening_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "auction screener ready");

    axum::serve(listener, app).await?;
    Ok(())
}
