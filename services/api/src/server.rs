use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPeriodRepository};
use crate::routes::with_period_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use opptak::config::AppConfig;
use opptak::error::AppError;
use opptak::recruitment::PeriodService;
use opptak::telemetry;
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
        scheduling: config.scheduling,
    };

    let repository = Arc::new(InMemoryPeriodRepository::default());
    let period_service = Arc::new(PeriodService::new(repository, config.access.policy()));

    let app = with_period_routes(period_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        grace_days = config.access.grace_days,
        "recruitment scheduler ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
