//! PawShield Server
//!
//! HTTP API for dog and cat skin-condition diagnosis. Loads the model info,
//! treatment data and per-species models once at startup, then serves
//! `POST /predict` and the `GET /` status line.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pawshield::config::AssetPaths;
use pawshield::inference::ServiceContext;
use pawshield::utils::logging::{init_logging, LogConfig, LogLevel};
use tracing::info;

use crate::state::{AppState, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};

/// PawShield Diagnosis Server
#[derive(Parser, Debug)]
#[command(name = "pawshield-server")]
#[command(version = "0.1.0")]
#[command(about = "HTTP API server for PawShield diagnosis")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "PAWSHIELD_PORT", default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "PAWSHIELD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory holding all startup resources under their standard names
    #[arg(long, env = "PAWSHIELD_ASSET_DIR")]
    asset_dir: Option<PathBuf>,

    /// Model info descriptor (JSON)
    #[arg(long, env = "PAWSHIELD_MODEL_INFO")]
    model_info: Option<PathBuf>,

    /// Treatment catalog (JSON)
    #[arg(long, env = "PAWSHIELD_TREATMENTS")]
    treatments: Option<PathBuf>,

    /// Dog model (ONNX)
    #[arg(long, env = "PAWSHIELD_DOG_MODEL")]
    dog_model: Option<PathBuf>,

    /// Cat model (ONNX)
    #[arg(long, env = "PAWSHIELD_CAT_MODEL")]
    cat_model: Option<PathBuf>,

    /// Largest accepted upload in bytes
    #[arg(long, env = "PAWSHIELD_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PAWSHIELD_LOG", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig {
            host: self.host,
            port: self.port,
            max_upload_bytes: self.max_upload_bytes,
            log_level: self.log_level.parse().unwrap_or(LogLevel::Info),
            ..ServerConfig::default()
        };

        if let Some(asset_dir) = self.asset_dir {
            config.assets = AssetPaths::in_dir(asset_dir);
        }

        if let Some(model_info) = self.model_info {
            config.assets.model_info = model_info;
        }

        if let Some(treatments) = self.treatments {
            config.assets.treatments = treatments;
        }

        if let Some(dog_model) = self.dog_model {
            config.assets.dog_model = dog_model;
        }

        if let Some(cat_model) = self.cat_model {
            config.assets.cat_model = cat_model;
        }

        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config();

    init_logging(&LogConfig::production().with_level(config.log_level))
        .map_err(anyhow::Error::msg)?;

    info!("PawShield Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Model info:  {:?}", config.assets.model_info);
    info!("  Treatments:  {:?}", config.assets.treatments);
    info!("  Dog model:   {:?}", config.assets.dog_model);
    info!("  Cat model:   {:?}", config.assets.cat_model);

    let assets = config.assets.clone();
    let context = tokio::task::spawn_blocking(move || ServiceContext::load(&assets))
        .await?
        .context("failed to load startup resources")?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::new(config, context));
    let app = routes::router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_paths_override_asset_dir() {
        let cli = Cli::parse_from([
            "pawshield-server",
            "--asset-dir",
            "/srv/assets",
            "--cat-model",
            "/models/cat.onnx",
            "--log-level",
            "warning",
        ]);
        let config = cli.into_config();

        assert_eq!(config.assets.dog_model, PathBuf::from("/srv/assets/Dog_ResNet50V2_Transfer.onnx"));
        assert_eq!(config.assets.cat_model, PathBuf::from("/models/cat.onnx"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.port, 5000);
    }
}
