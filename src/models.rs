//! Data models for merged forecast data and launch locations
//!
//! This module contains the structures shared across ingestion, validation,
//! and the HTTP API: the merged hourly forecast point, compass sectors with
//! their degree ranges, per-location wind profiles, and the launch location
//! itself.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One merged hourly forecast observation.
///
/// Surface fields prefer MET Norway where both upstream sources cover the
/// hour; pressure-level winds, stability indices, and cloud-cover split come
/// from Open-Meteo. Read-only once constructed by the merge step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Timestamp for this observation (always whole hours, UTC)
    pub timestamp: DateTime<Utc>,
    /// Wind speed at 10 m in m/s
    pub wind_speed: f32,
    /// Wind gust speed at 10 m in m/s
    pub wind_gusts: f32,
    /// Wind direction in degrees from north (0-360)
    pub wind_direction: f32,
    /// Temperature at 2 m in Celsius
    pub temperature: f32,
    /// Precipitation amount in mm
    pub precipitation: f32,
    /// Lower bound of the probabilistic precipitation band, when the source
    /// provides one
    pub precipitation_min: Option<f32>,
    /// Upper bound of the probabilistic precipitation band
    pub precipitation_max: Option<f32>,
    /// Total cloud cover percentage (0-100)
    pub cloud_cover: f32,
    pub cloud_cover_low: f32,
    pub cloud_cover_mid: f32,
    pub cloud_cover_high: f32,
    /// Convective available potential energy in J/kg
    pub cape: f32,
    pub lifted_index: f32,
    /// Convective inhibition in J/kg (negative values inhibit convection)
    pub convective_inhibition: f32,
    /// Weather symbol code, e.g. `clearsky_day`
    pub symbol_code: String,
    /// Mean sea-level pressure in hPa
    pub pressure_msl: f32,
    pub freezing_level_height: f32,
    /// Daylight flag for this hour
    pub is_day: bool,
    pub wind_speed_925hpa: f32,
    pub wind_direction_925hpa: f32,
    pub wind_speed_850hpa: f32,
    pub wind_direction_850hpa: f32,
    pub wind_speed_700hpa: f32,
    pub wind_direction_700hpa: f32,
    /// Geopotential heights in meters for the three pressure levels
    pub geopotential_height_925hpa: f32,
    pub geopotential_height_850hpa: f32,
    pub geopotential_height_700hpa: f32,
}

impl ForecastPoint {
    /// Compass sector the surface wind blows from.
    #[must_use]
    pub fn wind_sector(&self) -> CompassSector {
        CompassSector::from_bearing(self.wind_direction)
    }

    /// Format wind information for logs and summaries
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!(
            "{:.1} m/s {} (gusts {:.1} m/s)",
            self.wind_speed,
            self.wind_sector().label(),
            self.wind_gusts
        )
    }
}

/// The eight compass sectors a launch can accept wind from.
///
/// Each sector covers a fixed 45° range centered on its compass point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompassSector {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl CompassSector {
    pub const ALL: [CompassSector; 8] = [
        CompassSector::N,
        CompassSector::Ne,
        CompassSector::E,
        CompassSector::Se,
        CompassSector::S,
        CompassSector::Sw,
        CompassSector::W,
        CompassSector::Nw,
    ];

    /// Inclusive `[min, max]` degree range for this sector. North's range
    /// wraps past 360, so `min > max` there.
    #[must_use]
    pub fn degree_range(self) -> (f32, f32) {
        match self {
            CompassSector::N => (337.5, 22.5),
            CompassSector::Ne => (22.5, 67.5),
            CompassSector::E => (67.5, 112.5),
            CompassSector::Se => (112.5, 157.5),
            CompassSector::S => (157.5, 202.5),
            CompassSector::Sw => (202.5, 247.5),
            CompassSector::W => (247.5, 292.5),
            CompassSector::Nw => (292.5, 337.5),
        }
    }

    /// Whether a bearing falls inside this sector. Bounds are inclusive on
    /// both ends; the North sector matches `bearing >= 337.5 OR <= 22.5`.
    #[must_use]
    pub fn contains(self, bearing: f32) -> bool {
        let (min, max) = self.degree_range();
        if min > max {
            bearing >= min || bearing <= max
        } else {
            bearing >= min && bearing <= max
        }
    }

    /// Sector a bearing falls into. Bearings are normalized into [0, 360).
    #[must_use]
    pub fn from_bearing(bearing: f32) -> CompassSector {
        let bearing = bearing.rem_euclid(360.0);
        Self::ALL
            .into_iter()
            .find(|sector| sector.contains(bearing))
            .unwrap_or(CompassSector::N)
    }

    /// Parse a stored direction label (`"n"`, `"NE"`, ...). Unrecognized
    /// labels yield `None` and are ignored by callers rather than treated as
    /// errors.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<CompassSector> {
        match label.to_ascii_lowercase().as_str() {
            "n" => Some(CompassSector::N),
            "ne" => Some(CompassSector::Ne),
            "e" => Some(CompassSector::E),
            "se" => Some(CompassSector::Se),
            "s" => Some(CompassSector::S),
            "sw" => Some(CompassSector::Sw),
            "w" => Some(CompassSector::W),
            "nw" => Some(CompassSector::Nw),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CompassSector::N => "N",
            CompassSector::Ne => "NE",
            CompassSector::E => "E",
            CompassSector::Se => "SE",
            CompassSector::S => "S",
            CompassSector::Sw => "SW",
            CompassSector::W => "W",
            CompassSector::Nw => "NW",
        }
    }
}

impl std::fmt::Display for CompassSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A location's set of allowed wind sectors, derived from the eight boolean
/// flags stored per launch site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindProfile {
    sectors: Vec<CompassSector>,
}

impl WindProfile {
    #[must_use]
    pub fn new(mut sectors: Vec<CompassSector>) -> Self {
        sectors.dedup();
        Self { sectors }
    }

    /// Build a profile from the per-site boolean flags.
    #[must_use]
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    pub fn from_flags(
        n: bool,
        ne: bool,
        e: bool,
        se: bool,
        s: bool,
        sw: bool,
        w: bool,
        nw: bool,
    ) -> Self {
        let flags = [n, ne, e, se, s, sw, w, nw];
        let sectors = CompassSector::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(sector, enabled)| enabled.then_some(sector))
            .collect();
        Self { sectors }
    }

    /// Build a profile from stored direction labels, silently skipping
    /// unrecognized ones.
    #[must_use]
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let sectors = labels
            .iter()
            .filter_map(|label| CompassSector::parse_label(label.as_ref()))
            .collect();
        Self::new(sectors)
    }

    /// An empty profile means "no directional restriction configured".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    #[must_use]
    pub fn sectors(&self) -> &[CompassSector] {
        &self.sectors
    }
}

/// A paragliding launch location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Launch elevation in meters
    pub elevation: f32,
    /// IANA timezone name, e.g. `Europe/Oslo`
    pub timezone: String,
    pub description: String,
    /// Allowed wind sectors for this launch
    pub wind_profile: WindProfile,
}

impl Location {
    /// Timezone used to group forecast hours into local calendar days.
    /// Falls back to UTC for an unparseable name rather than failing the
    /// whole validation.
    #[must_use]
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Cache key for this location's merged forecast series
    #[must_use]
    pub fn forecast_cache_key(&self) -> String {
        format!(
            "forecast:{}:{:.4}:{:.4}",
            self.id, self.latitude, self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, CompassSector::N)]
    #[case(45.0, CompassSector::Ne)]
    #[case(90.0, CompassSector::E)]
    #[case(135.0, CompassSector::Se)]
    #[case(180.0, CompassSector::S)]
    #[case(225.0, CompassSector::Sw)]
    #[case(270.0, CompassSector::W)]
    #[case(315.0, CompassSector::Nw)]
    fn test_sector_from_canonical_bearing(#[case] bearing: f32, #[case] expected: CompassSector) {
        assert_eq!(CompassSector::from_bearing(bearing), expected);
    }

    #[test]
    fn test_north_sector_wraps_around_zero() {
        assert!(CompassSector::N.contains(350.0));
        assert!(CompassSector::N.contains(10.0));
        assert!(CompassSector::N.contains(0.0));
        assert!(!CompassSector::N.contains(45.0));
    }

    #[test]
    fn test_sector_bounds_are_inclusive() {
        assert!(CompassSector::Ne.contains(22.5));
        assert!(CompassSector::Ne.contains(67.5));
        assert!(!CompassSector::Ne.contains(22.4));
        assert!(!CompassSector::Ne.contains(67.6));
    }

    #[test]
    fn test_parse_label_ignores_unknown() {
        assert_eq!(CompassSector::parse_label("ne"), Some(CompassSector::Ne));
        assert_eq!(CompassSector::parse_label("NW"), Some(CompassSector::Nw));
        assert_eq!(CompassSector::parse_label("north"), None);
        assert_eq!(CompassSector::parse_label(""), None);
    }

    #[test]
    fn test_profile_from_flags() {
        let profile = WindProfile::from_flags(true, false, false, false, false, false, true, true);
        assert_eq!(
            profile.sectors(),
            &[CompassSector::N, CompassSector::W, CompassSector::Nw]
        );
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_profile_from_labels_skips_unknown() {
        let profile = WindProfile::from_labels(&["n", "bogus", "se"]);
        assert_eq!(profile.sectors(), &[CompassSector::N, CompassSector::Se]);
    }

    #[test]
    fn test_location_tz_fallback() {
        let location = Location {
            id: 1,
            name: "Test".to_string(),
            latitude: 60.0,
            longitude: 6.0,
            elevation: 500.0,
            timezone: "Not/AZone".to_string(),
            description: String::new(),
            wind_profile: WindProfile::default(),
        };
        assert_eq!(location.tz(), chrono_tz::UTC);
    }
}
