use crate::cli::ServeArgs;
use crate::infra::{load_listings, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use careers::careers::{careers_router, ApplicationRelay};
use careers::config::AppConfig;
use careers::error::AppError;
use careers::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let listings = Arc::new(load_listings(&config.careers)?);
    let relay = Arc::new(ApplicationRelay::from_config(&config.mail));
    if !relay.is_configured() {
        match config.mail.settings() {
            Err(err) => warn!(%err, "mail relay is not configured; applications will be rejected"),
            Ok(_) => warn!("mail transport could not be built; applications will be rejected"),
        }
    }

    let app = with_operational_routes(careers_router(
        relay,
        listings,
        config.careers.max_upload_bytes,
    ))
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "careers service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
