use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryInteractionFeed};
use crate::routes::with_engagement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use castbase::analytics::engagement::EngagementService;
use castbase::config::AppConfig;
use castbase::error::AppError;
use castbase::polling::{PollController, PollJob};
use castbase::telemetry;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

const REFRESH_JOB: &str = "recipient-refresh";

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let feed = Arc::new(InMemoryInteractionFeed::default());
    let engagement_service = Arc::new(EngagementService::new(
        feed,
        config.scoring.weights,
        config.scoring.refresh_mode(),
    )?);

    let mut poller = PollController::new();
    let refresh_service = engagement_service.clone();
    poller.register(PollJob::new(
        REFRESH_JOB,
        config.polling.refresh_interval,
        move || {
            let service = refresh_service.clone();
            async move {
                if let Err(err) = service.refresh(Utc::now()) {
                    warn!(error = %err, "recipient refresh failed");
                }
            }
        },
    ))?;

    let app = with_engagement_routes(engagement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    poller.start();
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "castbase analytics service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    poller.stop().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
