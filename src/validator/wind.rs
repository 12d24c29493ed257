//! Wind-direction matching
//!
//! A bearing is acceptable when it falls inside any of the location's
//! allowed sectors. Sector bounds are inclusive on both ends and the North
//! sector wraps past 360 (see [`CompassSector::contains`]).

use crate::models::CompassSector;

/// Ignore shear entirely when the level barely moves air.
const SHEAR_MIN_WIND_SPEED: f32 = 4.0;

/// Whether a surface wind bearing suits a launch.
///
/// An empty `allowed` slice means no directional restriction is configured
/// and every bearing passes.
#[must_use]
pub fn is_wind_direction_good(bearing: f32, allowed: &[CompassSector]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    allowed.iter().any(|sector| sector.contains(bearing))
}

/// Whether the direction change between ground wind and wind at altitude is
/// tolerable.
///
/// A difference above 90° counts as shear, except when the altitude wind is
/// below 4 m/s, where any direction change is acceptable.
#[must_use]
pub fn is_wind_shear_acceptable(
    ground_direction: f32,
    altitude_direction: f32,
    altitude_wind_speed: f32,
) -> bool {
    if altitude_wind_speed < SHEAR_MIN_WIND_SPEED {
        return true;
    }
    let mut difference = (ground_direction - altitude_direction).abs();
    // Normalize for the circular nature of bearings
    if difference > 180.0 {
        difference = 360.0 - difference;
    }
    difference <= 90.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompassSector::{E, N, Ne, Nw, S, Se, Sw, W};
    use rstest::rstest;

    #[rstest]
    #[case(0.0, N)]
    #[case(45.0, Ne)]
    #[case(90.0, E)]
    #[case(135.0, Se)]
    #[case(180.0, S)]
    #[case(225.0, Sw)]
    #[case(270.0, W)]
    #[case(315.0, Nw)]
    fn test_canonical_bearing_matches_its_sector(
        #[case] bearing: f32,
        #[case] sector: CompassSector,
    ) {
        assert!(is_wind_direction_good(bearing, &[sector]));
    }

    #[test]
    fn test_empty_allowed_set_matches_everything() {
        assert!(is_wind_direction_good(0.0, &[]));
        assert!(is_wind_direction_good(123.4, &[]));
        assert!(is_wind_direction_good(359.9, &[]));
    }

    #[test]
    fn test_north_wraparound() {
        assert!(is_wind_direction_good(350.0, &[N]));
        assert!(is_wind_direction_good(10.0, &[N]));
        assert!(!is_wind_direction_good(45.0, &[N]));
    }

    #[rstest]
    #[case(22.5, true)]
    #[case(67.5, true)]
    #[case(22.4, false)]
    #[case(67.6, false)]
    fn test_northeast_bounds_inclusive(#[case] bearing: f32, #[case] expected: bool) {
        assert_eq!(is_wind_direction_good(bearing, &[Ne]), expected);
    }

    #[test]
    fn test_disjoint_sectors_match_only_their_union() {
        let allowed = [N, Se];
        assert!(is_wind_direction_good(0.0, &allowed));
        assert!(is_wind_direction_good(135.0, &allowed));
        assert!(!is_wind_direction_good(90.0, &allowed));
        assert!(!is_wind_direction_good(180.0, &allowed));
    }

    #[test]
    fn test_nan_bearing_fails_when_restricted() {
        assert!(!is_wind_direction_good(f32::NAN, &[N, E, S, W]));
        assert!(is_wind_direction_good(f32::NAN, &[]));
    }

    #[rstest]
    #[case(0.0, 80.0, 10.0, true)]
    #[case(0.0, 91.0, 10.0, false)]
    #[case(10.0, 350.0, 10.0, true)] // 20° across north
    #[case(0.0, 180.0, 10.0, false)]
    #[case(0.0, 180.0, 3.9, true)] // weak altitude wind, shear ignored
    fn test_wind_shear(
        #[case] ground: f32,
        #[case] aloft: f32,
        #[case] speed: f32,
        #[case] acceptable: bool,
    ) {
        assert_eq!(is_wind_shear_acceptable(ground, aloft, speed), acceptable);
    }
}
