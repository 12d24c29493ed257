//! Per-hour threshold evaluation
//!
//! Every check runs independently so the verdict carries the complete list
//! of reasons; nothing short-circuits. `is_good` is the AND of all checks.

use serde::Serialize;

use crate::models::{CompassSector, ForecastPoint};
use crate::rules::AlertRule;
use crate::validator::wind::{is_wind_direction_good, is_wind_shear_acceptable};

/// Symbol codes that count as acceptable flying weather. Anything else
/// (rain, snow, fog, thunder, ...) fails the sky check.
const ACCEPTABLE_SYMBOL_CODES: [&str; 4] = ["clearsky_day", "fair_day", "partlycloudy_day", "cloudy"];

/// The three upper-air pressure levels carried by the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PressureLevel {
    /// ~800 m above sea level
    Hpa925,
    /// ~1500 m
    Hpa850,
    /// ~3000 m
    Hpa700,
}

impl PressureLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PressureLevel::Hpa925 => "925hPa",
            PressureLevel::Hpa850 => "850hPa",
            PressureLevel::Hpa700 => "700hPa",
        }
    }
}

/// A threshold violation for one forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    Night,
    BadWeather,
    WindSpeedLow,
    WindSpeedHigh,
    WindGustHigh,
    MuchWind,
    WindGustDifference,
    WindDirectionBad,
    WindSpeedAloftHigh(PressureLevel),
    CapeHigh,
    LiftedIndexLow,
    LiftedIndexHigh,
    ConvectiveInhibitionLow,
    PrecipitationHigh,
    CloudCoverHigh,
}

impl FailureReason {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            FailureReason::Night => "NIGHT",
            FailureReason::BadWeather => "WEATHER_CODE_BAD",
            FailureReason::WindSpeedLow => "WIND_SPEED_LOW",
            FailureReason::WindSpeedHigh => "WIND_SPEED_HIGH",
            FailureReason::WindGustHigh => "WIND_GUST_HIGH",
            FailureReason::MuchWind => "MUCH_WIND",
            FailureReason::WindGustDifference => "WIND_GUST_DIFFERENCE",
            FailureReason::WindDirectionBad => "WIND_DIRECTION_BAD",
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa925) => "WIND_SPEED_925_HIGH",
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa850) => "WIND_SPEED_850_HIGH",
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa700) => "WIND_SPEED_700_HIGH",
            FailureReason::CapeHigh => "CAPE_HIGH",
            FailureReason::LiftedIndexLow => "LIFTED_INDEX_LOW",
            FailureReason::LiftedIndexHigh => "LIFTED_INDEX_HIGH",
            FailureReason::ConvectiveInhibitionLow => "CONVECTIVE_INHIBITION_LOW",
            FailureReason::PrecipitationHigh => "PRECIPITATION_HIGH",
            FailureReason::CloudCoverHigh => "CLOUD_COVER_HIGH",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            FailureReason::Night => "It is dark",
            FailureReason::BadWeather => "Current weather conditions are not suitable",
            FailureReason::WindSpeedLow => "Surface wind speed is below the minimum required",
            FailureReason::WindSpeedHigh => "Surface wind speed exceeds the maximum allowed",
            FailureReason::WindGustHigh => "Wind gusts exceed the maximum allowed",
            FailureReason::MuchWind => "Wind and gusts are both uncomfortably strong",
            FailureReason::WindGustDifference => {
                "Difference between wind speed and gusts is too high"
            }
            FailureReason::WindDirectionBad => {
                "Surface wind direction is outside the allowed range"
            }
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa925) => {
                "Wind speed at 925hPa exceeds the maximum allowed"
            }
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa850) => {
                "Wind speed at 850hPa exceeds the maximum allowed"
            }
            FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa700) => {
                "Wind speed at 700hPa exceeds the maximum allowed"
            }
            FailureReason::CapeHigh => "CAPE value exceeds the maximum allowed",
            FailureReason::LiftedIndexLow => "Lifted Index is below the minimum allowed",
            FailureReason::LiftedIndexHigh => "Lifted Index exceeds the maximum allowed",
            FailureReason::ConvectiveInhibitionLow => "Not enough convective inhibition",
            FailureReason::PrecipitationHigh => "Precipitation exceeds the maximum allowed",
            FailureReason::CloudCoverHigh => "Cloud cover exceeds the maximum allowed",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A condition worth noting that does not fail the hour on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningReason {
    PossibleRain,
    WindShear(PressureLevel),
}

impl WarningReason {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            WarningReason::PossibleRain => "POSSIBLE_RAIN",
            WarningReason::WindShear(PressureLevel::Hpa925) => "WIND_SHEAR_925",
            WarningReason::WindShear(PressureLevel::Hpa850) => "WIND_SHEAR_850",
            WarningReason::WindShear(PressureLevel::Hpa700) => "WIND_SHEAR_700",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            WarningReason::PossibleRain => "Precipitation is possible this hour",
            WarningReason::WindShear(level) => match level {
                PressureLevel::Hpa925 => {
                    "Wind direction at 925hPa differs significantly from ground level"
                }
                PressureLevel::Hpa850 => {
                    "Wind direction at 850hPa differs significantly from ground level"
                }
                PressureLevel::Hpa700 => {
                    "Wind direction at 700hPa differs significantly from ground level"
                }
            },
        }
    }
}

impl std::fmt::Display for WarningReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Verdict for a single forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointVerdict {
    pub is_good: bool,
    pub failures: Vec<FailureReason>,
    pub warnings: Vec<WarningReason>,
}

/// Evaluate one forecast hour against an alert rule and a location's
/// allowed wind sectors.
///
/// An empty `allowed` slice disables the direction check (no restriction
/// configured).
#[must_use]
pub fn evaluate_point(
    point: &ForecastPoint,
    rule: &AlertRule,
    allowed: &[CompassSector],
) -> PointVerdict {
    let mut failures = Vec::new();
    let mut warnings = Vec::new();

    // Daylight and sky
    if !point.is_day {
        failures.push(FailureReason::Night);
    }
    if point.is_day && !ACCEPTABLE_SYMBOL_CODES.contains(&point.symbol_code.as_str()) {
        failures.push(FailureReason::BadWeather);
    }

    // Surface wind. Negated comparisons so a NaN feed value fails the check
    // instead of passing silently.
    let wind_low = !(point.wind_speed >= rule.min_wind_speed);
    let wind_high = point.wind_speed > rule.max_wind_speed;
    if wind_low {
        failures.push(FailureReason::WindSpeedLow);
    }
    if wind_high {
        failures.push(FailureReason::WindSpeedHigh);
    }

    // Gusts are only reported when the speed cap has not already failed the
    // hour, so one gusty hour does not double-report.
    let gust_high = rule.max_gust > 0.0 && point.wind_gusts > rule.max_gust;
    if gust_high && !wind_high {
        failures.push(FailureReason::WindGustHigh);
    }
    let much_wind = point.wind_speed >= rule.much_wind && point.wind_gusts >= rule.much_gust;
    if much_wind && !gust_high && !wind_high {
        failures.push(FailureReason::MuchWind);
    }
    if rule.max_gust_difference > 0.0
        && (point.wind_gusts - point.wind_speed).abs() > rule.max_gust_difference
    {
        failures.push(FailureReason::WindGustDifference);
    }

    if !is_wind_direction_good(point.wind_direction, allowed) {
        failures.push(FailureReason::WindDirectionBad);
    }

    // Upper-air wind caps
    let aloft = [
        (
            PressureLevel::Hpa925,
            point.wind_speed_925hpa,
            rule.max_wind_speed_925hpa,
        ),
        (
            PressureLevel::Hpa850,
            point.wind_speed_850hpa,
            rule.max_wind_speed_850hpa,
        ),
        (
            PressureLevel::Hpa700,
            point.wind_speed_700hpa,
            rule.max_wind_speed_700hpa,
        ),
    ];
    for (level, speed, cap) in aloft {
        if speed > cap {
            failures.push(FailureReason::WindSpeedAloftHigh(level));
        }
    }

    // Wind shear: warn on the lowest affected level only
    let shear_925 = !is_wind_shear_acceptable(
        point.wind_direction,
        point.wind_direction_925hpa,
        point.wind_speed_925hpa,
    );
    let shear_850 = !is_wind_shear_acceptable(
        point.wind_direction,
        point.wind_direction_850hpa,
        point.wind_speed_850hpa,
    );
    let shear_700 = !is_wind_shear_acceptable(
        point.wind_direction,
        point.wind_direction_700hpa,
        point.wind_speed_700hpa,
    );
    if shear_925 {
        warnings.push(WarningReason::WindShear(PressureLevel::Hpa925));
    } else if shear_850 {
        warnings.push(WarningReason::WindShear(PressureLevel::Hpa850));
    } else if shear_700 {
        warnings.push(WarningReason::WindShear(PressureLevel::Hpa700));
    }

    // Thermal and stability conditions
    if rule.max_cape > 0.0 && point.cape >= rule.max_cape {
        failures.push(FailureReason::CapeHigh);
    }
    if point.lifted_index < rule.min_lifted_index {
        failures.push(FailureReason::LiftedIndexLow);
    }
    if point.lifted_index > rule.max_lifted_index {
        failures.push(FailureReason::LiftedIndexHigh);
    }
    if point.convective_inhibition <= rule.min_convective_inhibition {
        failures.push(FailureReason::ConvectiveInhibitionLow);
    }

    // Precipitation: a hard failure when the amount exceeds the limit, a
    // warning when only the upper bound of the probabilistic band does.
    let is_rain = point.precipitation > rule.max_precipitation;
    if is_rain {
        failures.push(FailureReason::PrecipitationHigh);
    }
    let maybe_rain = matches!(
        (point.precipitation_min, point.precipitation_max),
        (Some(min), Some(max)) if max > rule.max_precipitation && min <= rule.max_precipitation
    );
    if !is_rain && maybe_rain {
        warnings.push(WarningReason::PossibleRain);
    }

    if point.cloud_cover >= rule.max_cloud_cover {
        failures.push(FailureReason::CloudCoverHigh);
    }

    PointVerdict {
        is_good: failures.is_empty(),
        failures,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompassSector;
    use chrono::{TimeZone, Utc};

    fn test_point() -> ForecastPoint {
        ForecastPoint {
            timestamp: Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap(),
            wind_speed: 4.0,
            wind_gusts: 6.0,
            wind_direction: 0.0,
            temperature: 18.0,
            precipitation: 0.0,
            precipitation_min: None,
            precipitation_max: None,
            cloud_cover: 30.0,
            cloud_cover_low: 10.0,
            cloud_cover_mid: 10.0,
            cloud_cover_high: 10.0,
            cape: 150.0,
            lifted_index: 2.0,
            convective_inhibition: -20.0,
            symbol_code: "clearsky_day".to_string(),
            pressure_msl: 1013.0,
            freezing_level_height: 2800.0,
            is_day: true,
            wind_speed_925hpa: 6.0,
            wind_direction_925hpa: 10.0,
            wind_speed_850hpa: 8.0,
            wind_direction_850hpa: 20.0,
            wind_speed_700hpa: 10.0,
            wind_direction_700hpa: 30.0,
            geopotential_height_925hpa: 780.0,
            geopotential_height_850hpa: 1480.0,
            geopotential_height_700hpa: 3010.0,
        }
    }

    fn north() -> Vec<CompassSector> {
        vec![CompassSector::N]
    }

    #[test]
    fn test_good_hour_passes_with_no_reasons() {
        let verdict = evaluate_point(&test_point(), &AlertRule::default(), &north());
        assert!(verdict.is_good, "failures: {:?}", verdict.failures);
        assert!(verdict.failures.is_empty());
        assert!(verdict.warnings.is_empty());
    }

    #[test]
    fn test_all_checks_run_without_short_circuit() {
        let mut point = test_point();
        point.is_day = false;
        point.wind_speed = 20.0;
        point.wind_gusts = 30.0;
        point.precipitation = 2.0;
        point.cloud_cover = 100.0;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(!verdict.is_good);
        assert!(verdict.failures.contains(&FailureReason::Night));
        assert!(verdict.failures.contains(&FailureReason::WindSpeedHigh));
        assert!(verdict.failures.contains(&FailureReason::WindGustDifference));
        assert!(verdict.failures.contains(&FailureReason::PrecipitationHigh));
        assert!(verdict.failures.contains(&FailureReason::CloudCoverHigh));
    }

    #[test]
    fn test_gust_failure_suppressed_when_speed_already_failed() {
        let mut point = test_point();
        point.wind_speed = 12.0; // above max
        point.wind_gusts = 15.0; // also above max gust
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict.failures.contains(&FailureReason::WindSpeedHigh));
        assert!(!verdict.failures.contains(&FailureReason::WindGustHigh));
    }

    #[test]
    fn test_gust_failure_reported_when_speed_ok() {
        let mut point = test_point();
        point.wind_speed = 6.0;
        point.wind_gusts = 10.5;
        let mut rule = AlertRule::default();
        rule.max_gust_difference = 0.0; // isolate the gust check
        let verdict = evaluate_point(&point, &rule, &north());
        assert!(verdict.failures.contains(&FailureReason::WindGustHigh));
        assert!(!verdict.failures.contains(&FailureReason::WindSpeedHigh));
    }

    #[test]
    fn test_much_wind_only_when_no_hard_cap_failed() {
        let mut point = test_point();
        point.wind_speed = 6.0;
        point.wind_gusts = 9.6;
        let mut rule = AlertRule::default();
        rule.max_gust_difference = 0.0;
        let verdict = evaluate_point(&point, &rule, &north());
        assert!(verdict.failures.contains(&FailureReason::MuchWind));

        point.wind_gusts = 11.0; // now the gust cap itself fails
        let verdict = evaluate_point(&point, &rule, &north());
        assert!(verdict.failures.contains(&FailureReason::WindGustHigh));
        assert!(!verdict.failures.contains(&FailureReason::MuchWind));
    }

    #[test]
    fn test_wrong_direction_fails_but_empty_profile_passes() {
        let mut point = test_point();
        point.wind_direction = 180.0;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict.failures.contains(&FailureReason::WindDirectionBad));

        let verdict = evaluate_point(&point, &AlertRule::default(), &[]);
        assert!(!verdict.failures.contains(&FailureReason::WindDirectionBad));
    }

    #[test]
    fn test_upper_air_caps_fail_per_level() {
        let mut point = test_point();
        point.wind_speed_850hpa = 25.0;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict
            .failures
            .contains(&FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa850)));
        assert!(!verdict
            .failures
            .contains(&FailureReason::WindSpeedAloftHigh(PressureLevel::Hpa925)));
    }

    #[test]
    fn test_shear_warns_lowest_level_only() {
        let mut point = test_point();
        point.wind_direction_925hpa = 180.0;
        point.wind_direction_850hpa = 180.0;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert_eq!(
            verdict.warnings,
            vec![WarningReason::WindShear(PressureLevel::Hpa925)]
        );
        assert!(verdict.is_good, "shear is a warning, not a failure");
    }

    #[test]
    fn test_shear_ignored_for_weak_altitude_wind() {
        let mut point = test_point();
        point.wind_direction_925hpa = 180.0;
        point.wind_speed_925hpa = 3.0;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict.warnings.is_empty());
    }

    #[test]
    fn test_possible_rain_is_a_warning_not_a_failure() {
        let mut point = test_point();
        point.precipitation = 0.0;
        point.precipitation_min = Some(0.0);
        point.precipitation_max = Some(1.2);
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict.is_good);
        assert!(verdict.warnings.contains(&WarningReason::PossibleRain));
    }

    #[test]
    fn test_stability_thresholds() {
        let mut rule = AlertRule::default();
        rule.max_cape = 1000.0;
        rule.min_lifted_index = -4.0;
        rule.max_lifted_index = 2.0;
        rule.min_convective_inhibition = -50.0;

        let mut point = test_point();
        point.cape = 1500.0;
        point.lifted_index = -5.0;
        point.convective_inhibition = -80.0;
        let verdict = evaluate_point(&point, &rule, &north());
        assert!(verdict.failures.contains(&FailureReason::CapeHigh));
        assert!(verdict.failures.contains(&FailureReason::LiftedIndexLow));
        assert!(verdict
            .failures
            .contains(&FailureReason::ConvectiveInhibitionLow));
    }

    #[test]
    fn test_disabled_cape_check() {
        let mut rule = AlertRule::default();
        rule.max_cape = 0.0;
        let mut point = test_point();
        point.cape = 99_999.0;
        let verdict = evaluate_point(&point, &rule, &north());
        assert!(!verdict.failures.contains(&FailureReason::CapeHigh));
    }

    #[test]
    fn test_nan_wind_speed_fails_instead_of_panicking() {
        let mut point = test_point();
        point.wind_speed = f32::NAN;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(!verdict.is_good);
        assert!(verdict.failures.contains(&FailureReason::WindSpeedLow));
    }

    #[test]
    fn test_bad_symbol_fails_daytime_only() {
        let mut point = test_point();
        point.symbol_code = "heavyrain".to_string();
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(verdict.failures.contains(&FailureReason::BadWeather));

        point.is_day = false;
        let verdict = evaluate_point(&point, &AlertRule::default(), &north());
        assert!(!verdict.failures.contains(&FailureReason::BadWeather));
        assert!(verdict.failures.contains(&FailureReason::Night));
    }
}
