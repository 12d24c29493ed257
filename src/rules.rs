//! Alert rules: the named threshold bundles each forecast hour is checked
//! against.
//!
//! Rules are immutable configuration. They are created from static seed data
//! at startup and never mutated at runtime; per-location overrides would be a
//! new seed entry, not an in-place edit.

use serde::{Deserialize, Serialize};

use crate::models::Location;

/// Named bundle of numeric thresholds for one alert.
///
/// A `max_gust`, `max_gust_difference`, or `max_cape` value of zero or below
/// disables that check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    pub name: String,

    /// Minimum usable surface wind in m/s
    pub min_wind_speed: f32,
    /// Maximum safe surface wind in m/s
    pub max_wind_speed: f32,
    /// Maximum safe gust speed in m/s
    pub max_gust: f32,
    /// Maximum allowed gust-minus-speed delta in m/s
    pub max_gust_difference: f32,

    /// Combined caution pair: speed and gusts both at an uncomfortable level
    /// even though neither hard cap is exceeded
    pub much_wind: f32,
    pub much_gust: f32,

    /// Upper-air wind caps in m/s. 925 hPa is roughly 800 m, 850 hPa roughly
    /// 1500 m, 700 hPa roughly 3000 m.
    pub max_wind_speed_925hpa: f32,
    pub max_wind_speed_850hpa: f32,
    pub max_wind_speed_700hpa: f32,

    /// Maximum precipitation in mm per hour
    pub max_precipitation: f32,

    /// CAPE ceiling in J/kg; zero or below disables the check
    pub max_cape: f32,
    pub min_lifted_index: f32,
    pub max_lifted_index: f32,
    /// Convective inhibition floor in J/kg
    pub min_convective_inhibition: f32,

    /// Maximum total cloud cover percentage
    pub max_cloud_cover: f32,

    /// Shortest run of good hours worth reporting as a flyable interval
    pub min_consecutive_hours: usize,
}

impl Default for AlertRule {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            min_wind_speed: 0.0,
            max_wind_speed: 8.0,
            max_gust: 10.0,
            max_gust_difference: 4.0,
            much_wind: 5.5,
            much_gust: 9.5,
            max_wind_speed_925hpa: 15.0,
            max_wind_speed_850hpa: 20.0,
            max_wind_speed_700hpa: 25.0,
            max_precipitation: 0.0,
            max_cape: 10_000.0,
            min_lifted_index: -6.0,
            max_lifted_index: 8.0,
            min_convective_inhibition: -5000.0,
            max_cloud_cover: 100.0,
            min_consecutive_hours: 3,
        }
    }
}

impl AlertRule {
    /// Default thresholds named after a launch location.
    #[must_use]
    pub fn for_location(location: &Location) -> Self {
        Self {
            name: format!("Alert for {}", location.name),
            ..Self::default()
        }
    }
}
