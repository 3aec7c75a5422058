//! Application state for the PawShield server
//!
//! Everything here is built before the listener starts and is read-only
//! afterwards, so handlers share it through an `Arc` without locking.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pawshield::config::AssetPaths;
use pawshield::inference::{Predictor, ServiceContext};
use pawshield::utils::logging::LogLevel;

/// Default upload limit for `/predict`
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Startup resources
    pub assets: AssetPaths,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Minimum log level
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            assets: AssetPaths::in_dir(PathBuf::from(".")),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: LogLevel::Info,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Prediction pipeline over the loaded context
    pub predictor: Predictor,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, context: ServiceContext) -> Self {
        Self {
            config,
            predictor: Predictor::new(Arc::new(context)),
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
