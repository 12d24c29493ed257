//! Condition validator
//!
//! Pure, synchronous evaluation of merged forecast data against an alert
//! rule and a location's wind profile:
//! - wind-direction matching against the allowed compass sectors
//! - per-hour threshold evaluation with itemized failure and warning reasons
//! - aggregation into per-day and overall verdicts
//!
//! Nothing in here performs I/O; callers fetch and merge first, then hand
//! the series over.

pub mod aggregate;
pub mod point;
pub mod wind;

pub use aggregate::{DayVerdict, HourVerdict, TimeInterval, Verdict, WeatherValidation, validate_weather};
pub use point::{FailureReason, PointVerdict, PressureLevel, WarningReason, evaluate_point};
pub use wind::{is_wind_direction_good, is_wind_shear_acceptable};
