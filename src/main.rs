use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use courier_eta::config::{Cli, ServiceConfig};
use courier_eta::models::load_model;
use courier_eta::server::distance::GoogleDistanceMatrix;
use courier_eta::server::prediction::Predictor;
use courier_eta::server::server::{create_router, AppState};
use courier_eta::MalaysiaCalendar;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from(Cli::parse());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // A model that cannot be loaded is fatal
    let model = load_model(&config.model_path)
        .with_context(|| format!("Error loading model from {}", config.model_path.display()))?;
    info!(kind = model.kind(), path = %config.model_path.display(), "model loaded");

    let this_year = chrono::Local::now().year();
    if !MalaysiaCalendar::supported_years().contains(&this_year) {
        warn!(
            year = this_year,
            supported = ?MalaysiaCalendar::supported_years(),
            "no lunar holiday data for the current year, use --extra-holidays"
        );
    }

    let mut calendar = MalaysiaCalendar::new();
    if let Some(path) = &config.extra_holidays {
        calendar = calendar.with_extra_dates_file(path)?;
        info!(path = %path.display(), "extra holidays loaded");
    }

    if config.maps.api_key.is_none() {
        warn!("GOOGLE_MAP_API_KEY is not set, /distance/ requests will fail");
    }
    let distance = GoogleDistanceMatrix::new(config.maps.clone())?;

    let state = AppState::new(Predictor::new(model, Arc::new(calendar)), Arc::new(distance));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("cannot bind {}", config.bind))?;
    info!(addr = %config.bind, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
