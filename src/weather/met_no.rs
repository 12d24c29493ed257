//! MET Norway locationforecast client
//!
//! Fetches the `complete` locationforecast product and maps the hourly
//! timeseries entries into [`SurfaceOverlay`]s. MET's terms require an
//! identifying User-Agent on every request. Entries without a
//! `next_1_hours` block (the 6-hourly tail of the series) are skipped;
//! only hourly entries participate in the merge.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::weather::{API_CLIENT, SurfaceOverlay, SurfaceOverlayProvider};

pub struct MetNoClient {
    base_url: String,
    user_agent: String,
}

impl MetNoClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(config.met_base_url.clone(), config.user_agent.clone())
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<LocationForecast> {
        let url = format!("{}?lat={latitude:.4}&lon={longitude:.4}", self.base_url);

        tracing::debug!(%latitude, %longitude, "Fetching MET Norway forecast");
        let response = API_CLIENT
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| "MET Norway request failed")?
            .error_for_status()
            .with_context(|| "MET Norway returned an error status")?;

        response
            .json()
            .await
            .with_context(|| "Failed to parse MET Norway locationforecast response")
    }
}

#[async_trait]
impl SurfaceOverlayProvider for MetNoClient {
    async fn fetch_overlay(&self, latitude: f64, longitude: f64) -> Result<Vec<SurfaceOverlay>> {
        let forecast = self.fetch(latitude, longitude).await?;
        Ok(map_timeseries(forecast))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationForecast {
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Properties {
    pub timeseries: Vec<TimeseriesEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesEntry {
    pub time: DateTime<Utc>,
    pub data: TimeseriesData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeseriesData {
    pub instant: InstantBlock,
    pub next_1_hours: Option<NextHours>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstantBlock {
    pub details: InstantDetails,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InstantDetails {
    pub air_temperature: Option<f32>,
    pub wind_speed: Option<f32>,
    pub wind_from_direction: Option<f32>,
    pub wind_speed_of_gust: Option<f32>,
    pub cloud_area_fraction: Option<f32>,
    pub air_pressure_at_sea_level: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NextHours {
    pub summary: NextHoursSummary,
    #[serde(default)]
    pub details: NextHoursDetails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NextHoursSummary {
    pub symbol_code: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NextHoursDetails {
    pub precipitation_amount: Option<f32>,
    pub precipitation_amount_min: Option<f32>,
    pub precipitation_amount_max: Option<f32>,
}

/// Map hourly timeseries entries into overlays; 6-hourly tail entries are
/// dropped.
pub(crate) fn map_timeseries(forecast: LocationForecast) -> Vec<SurfaceOverlay> {
    forecast
        .properties
        .timeseries
        .into_iter()
        .filter_map(|entry| {
            let next_hour = entry.data.next_1_hours?;
            let details = entry.data.instant.details;
            Some(SurfaceOverlay {
                timestamp: entry.time,
                wind_speed: details.wind_speed.unwrap_or(0.0),
                wind_direction: details.wind_from_direction.unwrap_or(0.0),
                wind_gusts: details.wind_speed_of_gust,
                temperature: details.air_temperature.unwrap_or(0.0),
                precipitation: next_hour.details.precipitation_amount.unwrap_or(0.0),
                precipitation_min: next_hour.details.precipitation_amount_min,
                precipitation_max: next_hour.details.precipitation_amount_max,
                cloud_cover: details.cloud_area_fraction.unwrap_or(0.0),
                pressure_msl: details.air_pressure_at_sea_level.unwrap_or(0.0),
                symbol_code: next_hour.summary.symbol_code,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_timeseries_skips_entries_without_hourly_block() {
        let json = serde_json::json!({
            "properties": {
                "timeseries": [
                    {
                        "time": "2026-06-15T10:00:00Z",
                        "data": {
                            "instant": {
                                "details": {
                                    "air_temperature": 14.2,
                                    "wind_speed": 3.4,
                                    "wind_from_direction": 310.0,
                                    "wind_speed_of_gust": 6.1,
                                    "cloud_area_fraction": 12.5,
                                    "air_pressure_at_sea_level": 1014.2
                                }
                            },
                            "next_1_hours": {
                                "summary": { "symbol_code": "fair_day" },
                                "details": {
                                    "precipitation_amount": 0.0,
                                    "precipitation_amount_min": 0.0,
                                    "precipitation_amount_max": 0.3
                                }
                            }
                        }
                    },
                    {
                        "time": "2026-06-20T12:00:00Z",
                        "data": {
                            "instant": { "details": { "air_temperature": 10.0 } }
                        }
                    }
                ]
            }
        });
        let forecast: LocationForecast = serde_json::from_value(json).unwrap();
        let overlays = map_timeseries(forecast);

        assert_eq!(overlays.len(), 1);
        let overlay = &overlays[0];
        assert_eq!(overlay.wind_speed, 3.4);
        assert_eq!(overlay.wind_direction, 310.0);
        assert_eq!(overlay.wind_gusts, Some(6.1));
        assert_eq!(overlay.symbol_code, "fair_day");
        assert_eq!(overlay.precipitation_max, Some(0.3));
    }
}
