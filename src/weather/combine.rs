//! Merging of the two forecast sources
//!
//! The Open-Meteo series is the base; MET Norway overlays replace the
//! surface fields for every hour both sources cover. Overlay hours beyond
//! the base series are appended so the merged horizon is as long as the
//! better source, with upper-air fields zeroed and daylight computed from
//! solar elevation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::models::{ForecastPoint, Location};
use crate::weather::SurfaceOverlay;

/// Merge the overlay into the base series, sorted by timestamp.
#[must_use]
pub fn merge_sources(
    base: Vec<ForecastPoint>,
    overlay: Vec<SurfaceOverlay>,
    location: &Location,
) -> Vec<ForecastPoint> {
    let mut by_hour: HashMap<DateTime<Utc>, SurfaceOverlay> = overlay
        .into_iter()
        .map(|o| (o.timestamp, o))
        .collect();

    let mut merged: Vec<ForecastPoint> = base
        .into_iter()
        .map(|point| match by_hour.remove(&point.timestamp) {
            Some(overlay) => apply_overlay(point, overlay),
            None => point,
        })
        .collect();

    // Hours only the overlay source covers extend the series tail
    let mut extra: Vec<SurfaceOverlay> = by_hour.into_values().collect();
    extra.sort_by_key(|o| o.timestamp);
    merged.extend(
        extra
            .into_iter()
            .map(|overlay| point_from_overlay(overlay, location)),
    );

    merged.sort_by_key(|p| p.timestamp);
    merged
}

/// Replace the surface fields of a base point with the overlay's values.
/// Pressure-level and stability fields stay untouched.
fn apply_overlay(mut point: ForecastPoint, overlay: SurfaceOverlay) -> ForecastPoint {
    point.wind_speed = overlay.wind_speed;
    point.wind_direction = overlay.wind_direction;
    if let Some(gusts) = overlay.wind_gusts {
        point.wind_gusts = gusts;
    }
    point.precipitation = overlay.precipitation;
    point.precipitation_min = overlay.precipitation_min;
    point.precipitation_max = overlay.precipitation_max;
    point.cloud_cover = overlay.cloud_cover;
    point.symbol_code = overlay.symbol_code;
    point
}

/// Build a standalone point from an overlay-only hour. Upper-air fields are
/// zero, which passes every aloft threshold; the daylight flag comes from
/// solar elevation since this source does not carry one.
fn point_from_overlay(overlay: SurfaceOverlay, location: &Location) -> ForecastPoint {
    let is_day = is_daylight(location, overlay.timestamp);
    ForecastPoint {
        timestamp: overlay.timestamp,
        wind_speed: overlay.wind_speed,
        wind_gusts: overlay.wind_gusts.unwrap_or(overlay.wind_speed),
        wind_direction: overlay.wind_direction,
        temperature: overlay.temperature,
        precipitation: overlay.precipitation,
        precipitation_min: overlay.precipitation_min,
        precipitation_max: overlay.precipitation_max,
        cloud_cover: overlay.cloud_cover,
        cloud_cover_low: 0.0,
        cloud_cover_mid: 0.0,
        cloud_cover_high: 0.0,
        cape: 0.0,
        lifted_index: 0.0,
        convective_inhibition: 0.0,
        symbol_code: overlay.symbol_code,
        pressure_msl: overlay.pressure_msl,
        freezing_level_height: 0.0,
        is_day,
        wind_speed_925hpa: 0.0,
        wind_direction_925hpa: 0.0,
        wind_speed_850hpa: 0.0,
        wind_direction_850hpa: 0.0,
        wind_speed_700hpa: 0.0,
        wind_direction_700hpa: 0.0,
        geopotential_height_925hpa: 0.0,
        geopotential_height_850hpa: 0.0,
        geopotential_height_700hpa: 0.0,
    }
}

/// Whether a timestamp falls between sunrise and sunset at the location.
fn is_daylight(location: &Location, timestamp: DateTime<Utc>) -> bool {
    let Some(coordinates) = Coordinates::new(location.latitude, location.longitude) else {
        return false;
    };
    let solar_day = SolarDay::new(coordinates, timestamp.date_naive());
    let (Some(sunrise), Some(sunset)) = (
        solar_day.event_time(SolarEvent::Sunrise),
        solar_day.event_time(SolarEvent::Sunset),
    ) else {
        return false;
    };
    timestamp >= sunrise && timestamp <= sunset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WindProfile;
    use chrono::TimeZone;

    fn test_location() -> Location {
        Location {
            id: 1,
            name: "Testfjell".to_string(),
            latitude: 60.7,
            longitude: 6.5,
            elevation: 800.0,
            timezone: "Europe/Oslo".to_string(),
            description: String::new(),
            wind_profile: WindProfile::from_labels(&["n"]),
        }
    }

    fn base_point(hour: u32) -> ForecastPoint {
        ForecastPoint {
            timestamp: Utc.with_ymd_and_hms(2026, 6, 15, hour, 0, 0).unwrap(),
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

    fn overlay(hour: u32) -> SurfaceOverlay {
        SurfaceOverlay {
            timestamp: Utc.with_ymd_and_hms(2026, 6, 15, hour, 0, 0).unwrap(),
            wind_speed: 2.5,
            wind_direction: 300.0,
            wind_gusts: Some(5.0),
            temperature: 16.0,
            precipitation: 0.1,
            precipitation_min: Some(0.0),
            precipitation_max: Some(0.4),
            cloud_cover: 75.0,
            pressure_msl: 1010.0,
            symbol_code: "partlycloudy_day".to_string(),
        }
    }

    #[test]
    fn test_overlay_overrides_surface_fields_only() {
        let merged = merge_sources(vec![base_point(10)], vec![overlay(10)], &test_location());
        assert_eq!(merged.len(), 1);
        let point = &merged[0];
        assert_eq!(point.wind_speed, 2.5);
        assert_eq!(point.wind_direction, 300.0);
        assert_eq!(point.wind_gusts, 5.0);
        assert_eq!(point.precipitation, 0.1);
        assert_eq!(point.precipitation_max, Some(0.4));
        assert_eq!(point.cloud_cover, 75.0);
        assert_eq!(point.symbol_code, "partlycloudy_day");
        // Base-only fields survive
        assert_eq!(point.cape, 150.0);
        assert_eq!(point.wind_speed_850hpa, 8.0);
        assert_eq!(point.temperature, 18.0);
    }

    #[test]
    fn test_hours_without_overlay_pass_through() {
        let merged = merge_sources(
            vec![base_point(10), base_point(11)],
            vec![overlay(10)],
            &test_location(),
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].wind_speed, 2.5);
        assert_eq!(merged[1].wind_speed, 4.0);
    }

    #[test]
    fn test_overlay_only_hours_extend_the_tail() {
        let merged = merge_sources(vec![base_point(10)], vec![overlay(12)], &test_location());
        assert_eq!(merged.len(), 2);
        let tail = &merged[1];
        assert_eq!(
            tail.timestamp,
            Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(tail.wind_speed, 2.5);
        assert_eq!(tail.wind_speed_925hpa, 0.0);
        // Midday in mid-June at 60°N is daylight
        assert!(tail.is_day);
    }

    #[test]
    fn test_merge_result_is_sorted() {
        let merged = merge_sources(
            vec![base_point(11), base_point(9)],
            vec![overlay(10)],
            &test_location(),
        );
        let times: Vec<_> = merged.iter().map(|p| p.timestamp).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }
}
