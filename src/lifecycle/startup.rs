//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration (or fall back to defaults)
//! - Initialize logging and metrics
//! - Build the router
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is read before logging so its log level applies; the load
//!   is reported once the subscriber is installed
//! - Configuration errors abort before logging exists and surface through `main`

use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{load_config, ConfigError, DistributorConfig};
use crate::error::DistributorError;
use crate::observability::{logging, metrics};
use crate::routing::Router;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build router: {0}")]
    Router(#[from] DistributorError),
}

/// Everything the binary needs after startup.
pub struct Runtime {
    pub config: DistributorConfig,
    pub router: Arc<Router>,
    pub prometheus: Option<PrometheusHandle>,
}

/// Load configuration from `config_path` (defaults when `None`), then
/// initialize observability and build the router.
pub fn initialize(config_path: Option<&Path>) -> Result<Runtime, StartupError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => DistributorConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "request-distributor starting");
    match config_path {
        Some(path) => tracing::info!(
            path = %path.display(),
            backends = config.backend_ids().len(),
            "Configuration loaded"
        ),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let prometheus = if config.observability.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    let router = Router::from_config(&config)?;

    Ok(Runtime {
        config,
        router: Arc::new(router),
        prometheus,
    })
}
