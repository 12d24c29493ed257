//! Forecast ingestion
//!
//! Two upstream feeds are merged into one hourly series per location:
//! Open-Meteo supplies the full variable set (surface, pressure levels,
//! stability indices), MET Norway locationforecast supplies the
//! authoritative surface wind, precipitation, and symbol for Nordic
//! locations and overrides those fields where both cover an hour.

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cache;
use crate::config::WeatherConfig;
use crate::models::{ForecastPoint, Location};

pub mod combine;
pub mod met_no;
pub mod open_meteo;

pub use met_no::MetNoClient;
pub use open_meteo::OpenMeteoClient;

/// Shared HTTP client with transient-failure retries.
pub static API_CLIENT: LazyLock<ClientWithMiddleware> = LazyLock::new(|| {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
    ClientBuilder::new(reqwest::Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
});

/// Surface-level observations from an overlay source, keyed by hour and
/// merged over the Open-Meteo base series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceOverlay {
    pub timestamp: DateTime<Utc>,
    pub wind_speed: f32,
    pub wind_direction: f32,
    pub wind_gusts: Option<f32>,
    pub temperature: f32,
    pub precipitation: f32,
    pub precipitation_min: Option<f32>,
    pub precipitation_max: Option<f32>,
    pub cloud_cover: f32,
    pub pressure_msl: f32,
    pub symbol_code: String,
}

/// A source of surface observations that refine the base forecast.
/// MET Norway is the only implementation today; weather-station feeds would
/// slot in here.
#[async_trait]
pub trait SurfaceOverlayProvider: Send + Sync {
    async fn fetch_overlay(&self, latitude: f64, longitude: f64) -> Result<Vec<SurfaceOverlay>>;
}

/// Fetch the merged forecast series for a location, reading from and
/// populating the persistent cache.
#[instrument(skip(config), fields(location = %location.name))]
pub async fn get_combined_forecast(
    config: &WeatherConfig,
    location: &Location,
) -> Result<Vec<ForecastPoint>> {
    let key = location.forecast_cache_key();
    if let Some(cached) = cache::get::<Vec<ForecastPoint>>(&key).await? {
        tracing::debug!("Serving forecast from cache");
        return Ok(cached);
    }

    let merged = fetch_combined_forecast(config, location).await?;

    cache::put(&key, merged.clone(), jittered_ttl(config.cache_ttl_minutes)).await?;
    Ok(merged)
}

/// Fetch both upstream sources and overwrite the cached series, regardless
/// of freshness. Used by the cron ingestion path.
#[instrument(skip(config), fields(location = %location.name))]
pub async fn refresh_combined_forecast(
    config: &WeatherConfig,
    location: &Location,
) -> Result<Vec<ForecastPoint>> {
    let merged = fetch_combined_forecast(config, location).await?;
    cache::put(
        &location.forecast_cache_key(),
        merged.clone(),
        jittered_ttl(config.cache_ttl_minutes),
    )
    .await?;
    Ok(merged)
}

/// Fetch and merge both upstream sources, bypassing the cache.
pub async fn fetch_combined_forecast(
    config: &WeatherConfig,
    location: &Location,
) -> Result<Vec<ForecastPoint>> {
    let open_meteo = OpenMeteoClient::from_config(config);
    let met_no = MetNoClient::from_config(config);

    let (base, overlay) = tokio::try_join!(
        open_meteo.fetch_hourly(location.latitude, location.longitude),
        met_no.fetch_overlay(location.latitude, location.longitude),
    )
    .with_context(|| format!("Failed to fetch forecast for {}", location.name))?;

    tracing::debug!(
        base_hours = base.len(),
        overlay_hours = overlay.len(),
        "Merging forecast sources"
    );

    Ok(combine::merge_sources(base, overlay, location))
}

/// Cache TTL with ±10% jitter so all locations do not refresh in the same
/// cron tick.
fn jittered_ttl(ttl_minutes: u32) -> Duration {
    let jitter: f64 = rand::rng().random_range(0.9..1.1);
    Duration::from_secs((f64::from(ttl_minutes) * 60.0 * jitter) as u64)
}
