use careers::careers::{ListingError, StaticListings};
use careers::config::CareersConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Postings from `CAREERS_LISTINGS_PATH` when set, otherwise the built-in set.
pub(crate) fn load_listings(config: &CareersConfig) -> Result<StaticListings, ListingError> {
    match &config.listings_path {
        Some(path) => StaticListings::from_json_path(path),
        None => Ok(StaticListings::standard()),
    }
}
