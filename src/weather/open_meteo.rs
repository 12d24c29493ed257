//! Open-Meteo forecast client
//!
//! Fetches the full hourly variable set (surface wind, pressure-level winds,
//! stability indices, cloud-cover split) and maps the columnar response into
//! [`ForecastPoint`]s. Wind speeds are requested in m/s and times in GMT so
//! no unit or zone conversion happens here.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::models::ForecastPoint;
use crate::weather::API_CLIENT;

/// Hourly variables requested from the forecast endpoint.
const HOURLY_VARIABLES: [&str; 29] = [
    "temperature_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "wind_speed_925hPa",
    "wind_direction_925hPa",
    "wind_speed_850hPa",
    "wind_direction_850hPa",
    "wind_speed_700hPa",
    "wind_direction_700hPa",
    "temperature_925hPa",
    "temperature_850hPa",
    "temperature_700hPa",
    "precipitation",
    "precipitation_probability",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "weather_code",
    "pressure_msl",
    "convective_inhibition",
    "is_day",
    "freezing_level_height",
    "cape",
    "lifted_index",
    "geopotential_height_925hPa",
    "geopotential_height_850hPa",
    "geopotential_height_700hPa",
];

pub struct OpenMeteoClient {
    base_url: String,
    forecast_days: u32,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, forecast_days: u32) -> Self {
        Self {
            base_url: base_url.into(),
            forecast_days,
        }
    }

    #[must_use]
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(config.open_meteo_base_url.clone(), config.forecast_days)
    }

    /// Fetch the hourly forecast for a coordinate pair.
    pub async fn fetch_hourly(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastPoint>> {
        let url = format!(
            "{}/forecast?latitude={:.4}&longitude={:.4}&hourly={}&wind_speed_unit=ms&timezone=GMT&models=best_match&forecast_days={}",
            self.base_url,
            latitude,
            longitude,
            HOURLY_VARIABLES.join(","),
            self.forecast_days,
        );

        tracing::debug!(%latitude, %longitude, "Fetching Open-Meteo forecast");
        let response = API_CLIENT
            .get(url)
            .send()
            .await
            .with_context(|| "Open-Meteo request failed")?
            .error_for_status()
            .with_context(|| "Open-Meteo returned an error status")?;

        let forecast: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo forecast response")?;

        Ok(map_response(&forecast))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub hourly: HourlyBlock,
}

/// Columnar hourly data; every column is positional against `time`.
#[derive(Debug, Deserialize)]
pub(crate) struct HourlyBlock {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f32>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f32>>,
    #[serde(default)]
    pub wind_direction_10m: Vec<Option<f32>>,
    #[serde(default)]
    pub wind_gusts_10m: Vec<Option<f32>>,
    #[serde(default, rename = "wind_speed_925hPa")]
    pub wind_speed_925hpa: Vec<Option<f32>>,
    #[serde(default, rename = "wind_direction_925hPa")]
    pub wind_direction_925hpa: Vec<Option<f32>>,
    #[serde(default, rename = "wind_speed_850hPa")]
    pub wind_speed_850hpa: Vec<Option<f32>>,
    #[serde(default, rename = "wind_direction_850hPa")]
    pub wind_direction_850hpa: Vec<Option<f32>>,
    #[serde(default, rename = "wind_speed_700hPa")]
    pub wind_speed_700hpa: Vec<Option<f32>>,
    #[serde(default, rename = "wind_direction_700hPa")]
    pub wind_direction_700hpa: Vec<Option<f32>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f32>>,
    #[serde(default)]
    pub cloud_cover: Vec<Option<f32>>,
    #[serde(default)]
    pub cloud_cover_low: Vec<Option<f32>>,
    #[serde(default)]
    pub cloud_cover_mid: Vec<Option<f32>>,
    #[serde(default)]
    pub cloud_cover_high: Vec<Option<f32>>,
    #[serde(default)]
    pub weather_code: Vec<Option<u8>>,
    #[serde(default)]
    pub pressure_msl: Vec<Option<f32>>,
    #[serde(default)]
    pub convective_inhibition: Vec<Option<f32>>,
    #[serde(default)]
    pub is_day: Vec<Option<u8>>,
    #[serde(default)]
    pub freezing_level_height: Vec<Option<f32>>,
    #[serde(default)]
    pub cape: Vec<Option<f32>>,
    #[serde(default)]
    pub lifted_index: Vec<Option<f32>>,
    #[serde(default, rename = "geopotential_height_925hPa")]
    pub geopotential_height_925hpa: Vec<Option<f32>>,
    #[serde(default, rename = "geopotential_height_850hPa")]
    pub geopotential_height_850hpa: Vec<Option<f32>>,
    #[serde(default, rename = "geopotential_height_700hPa")]
    pub geopotential_height_700hpa: Vec<Option<f32>>,
}

fn value(column: &[Option<f32>], index: usize) -> f32 {
    column.get(index).copied().flatten().unwrap_or(0.0)
}

/// Map the columnar response into forecast points. Rows with an unparseable
/// timestamp are skipped rather than defaulted.
pub(crate) fn map_response(response: &ForecastResponse) -> Vec<ForecastPoint> {
    let hourly = &response.hourly;
    let mut points = Vec::with_capacity(hourly.time.len());

    for (i, time) in hourly.time.iter().enumerate() {
        // Open-Meteo emits "2026-06-15T12:00" in the requested GMT zone
        let Ok(naive) = chrono::NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M") else {
            tracing::warn!(%time, "Skipping forecast row with unparseable timestamp");
            continue;
        };
        let timestamp = naive.and_utc();

        let is_day = hourly
            .is_day
            .get(i)
            .copied()
            .flatten()
            .is_some_and(|flag| flag == 1);
        let weather_code = hourly.weather_code.get(i).copied().flatten().unwrap_or(0);

        points.push(ForecastPoint {
            timestamp,
            wind_speed: value(&hourly.wind_speed_10m, i),
            wind_gusts: value(&hourly.wind_gusts_10m, i),
            wind_direction: value(&hourly.wind_direction_10m, i),
            temperature: value(&hourly.temperature_2m, i),
            precipitation: value(&hourly.precipitation, i),
            precipitation_min: None,
            precipitation_max: None,
            cloud_cover: value(&hourly.cloud_cover, i),
            cloud_cover_low: value(&hourly.cloud_cover_low, i),
            cloud_cover_mid: value(&hourly.cloud_cover_mid, i),
            cloud_cover_high: value(&hourly.cloud_cover_high, i),
            cape: value(&hourly.cape, i),
            lifted_index: value(&hourly.lifted_index, i),
            convective_inhibition: value(&hourly.convective_inhibition, i),
            symbol_code: wmo_to_symbol(weather_code, is_day).to_string(),
            pressure_msl: value(&hourly.pressure_msl, i),
            freezing_level_height: value(&hourly.freezing_level_height, i),
            is_day,
            wind_speed_925hpa: value(&hourly.wind_speed_925hpa, i),
            wind_direction_925hpa: value(&hourly.wind_direction_925hpa, i),
            wind_speed_850hpa: value(&hourly.wind_speed_850hpa, i),
            wind_direction_850hpa: value(&hourly.wind_direction_850hpa, i),
            wind_speed_700hpa: value(&hourly.wind_speed_700hpa, i),
            wind_direction_700hpa: value(&hourly.wind_direction_700hpa, i),
            geopotential_height_925hpa: value(&hourly.geopotential_height_925hpa, i),
            geopotential_height_850hpa: value(&hourly.geopotential_height_850hpa, i),
            geopotential_height_700hpa: value(&hourly.geopotential_height_700hpa, i),
        });
    }

    points
}

/// Map a WMO weather code onto the MET-style symbol codes the validator
/// understands. Day/night variants follow the is-day flag.
#[must_use]
pub fn wmo_to_symbol(code: u8, is_day: bool) -> &'static str {
    match code {
        0 => {
            if is_day {
                "clearsky_day"
            } else {
                "clearsky_night"
            }
        }
        1 => {
            if is_day {
                "fair_day"
            } else {
                "fair_night"
            }
        }
        2 => {
            if is_day {
                "partlycloudy_day"
            } else {
                "partlycloudy_night"
            }
        }
        3 => "cloudy",
        45 | 48 => "fog",
        51 | 61 => "lightrain",
        53 | 63 => "rain",
        55 | 65 => "heavyrain",
        56 | 66 => "lightsleet",
        57 | 67 => "sleet",
        71 => "lightsnow",
        73 | 77 => "snow",
        75 => "heavysnow",
        80 => {
            if is_day {
                "lightrainshowers_day"
            } else {
                "lightrainshowers_night"
            }
        }
        81 => {
            if is_day {
                "rainshowers_day"
            } else {
                "rainshowers_night"
            }
        }
        82 => {
            if is_day {
                "heavyrainshowers_day"
            } else {
                "heavyrainshowers_night"
            }
        }
        85 => {
            if is_day {
                "lightsnowshowers_day"
            } else {
                "lightsnowshowers_night"
            }
        }
        86 => {
            if is_day {
                "heavysnowshowers_day"
            } else {
                "heavysnowshowers_night"
            }
        }
        95 | 96 | 99 => "rainandthunder",
        _ => "cloudy",
    }
}
