//! `flycast` - paragliding flyability forecasts
//!
//! This library fetches and merges hourly forecasts from Open-Meteo and
//! MET Norway, validates them against per-location wind profiles and alert
//! rules, and aggregates the verdicts into flyable/not-flyable days.

pub mod alerts;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod locations;
pub mod models;
pub mod rules;
pub mod validator;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::FlycastConfig;
pub use error::FlycastError;
pub use models::{CompassSector, ForecastPoint, Location, WindProfile};
pub use rules::AlertRule;
pub use validator::{
    DayVerdict, FailureReason, PointVerdict, Verdict, WarningReason, WeatherValidation,
    evaluate_point, is_wind_direction_good, validate_weather,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FlycastError>;
