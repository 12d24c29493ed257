//! Seed launch locations and geographic lookup
//!
//! Launch sites are static seed data: name, coordinates, elevation, timezone,
//! and the wind sectors the launch accepts. The list covers the Norwegian
//! sites the alerting was originally tuned for.

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::{Location, WindProfile};

/// All seeded launch locations.
#[must_use]
pub fn seed_locations() -> Vec<Location> {
    vec![
        location(
            1,
            "Keiservarden, Bodø",
            67.315_278,
            14.478_333,
            366.0,
            "Popular coastal launch above Bodø, best in stable onshore flow.",
            &["n", "nw", "w"],
        ),
        location(
            2,
            "Hoven, Gimsøya",
            68.332_778,
            14.110_278,
            368.0,
            "Lofoten site with a wide arc of usable directions.",
            &["nw", "n", "ne", "e", "se", "s", "sw"],
        ),
        location(
            3,
            "Liaset, Voss",
            60.703_333,
            6.521_389,
            780.0,
            "Voss valley launch, works in northwesterly and westerly flow.",
            &["nw", "n", "sw", "w"],
        ),
        location(
            4,
            "Hangur, sør-start, Voss",
            60.638_889,
            6.403_056,
            700.0,
            "South-facing start at the Hangur top station.",
            &["sw", "s", "se"],
        ),
        location(
            5,
            "Salknappen (Riksanlegget), Vågå",
            61.900_278,
            9.245_278,
            1050.0,
            "National site at Vågå, thermally active inland valley.",
            &["sw", "s", "se"],
        ),
        location(
            6,
            "Grøtterud, Hvittingfoss",
            59.504_722,
            9.998_056,
            230.0,
            "Small southeast Norway ridge for southerly winds.",
            &["sw", "s", "se"],
        ),
        location(
            7,
            "Sundvollen, Viken",
            60.053_889,
            10.3225,
            480.0,
            "Ridge above Steinsfjorden, flown in northwesterly flow.",
            &["nw", "w", "n"],
        ),
    ]
}

/// Look up a seeded location by id.
#[must_use]
pub fn find_location(id: u32) -> Option<Location> {
    seed_locations().into_iter().find(|l| l.id == id)
}

/// Distance between a coordinate pair and a location in kilometers.
#[must_use]
pub fn distance_km(latitude: f64, longitude: f64, location: &Location) -> f64 {
    let from = HaversineLocation {
        latitude,
        longitude,
    };
    let to = HaversineLocation {
        latitude: location.latitude,
        longitude: location.longitude,
    };
    distance(from, to, Units::Kilometers)
}

/// All seeded locations sorted by distance from a coordinate pair,
/// closest first.
#[must_use]
pub fn locations_by_distance(latitude: f64, longitude: f64) -> Vec<(Location, f64)> {
    let mut results: Vec<(Location, f64)> = seed_locations()
        .into_iter()
        .map(|l| {
            let d = distance_km(latitude, longitude, &l);
            (l, d)
        })
        .collect();
    results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    results
}

fn location(
    id: u32,
    name: &str,
    latitude: f64,
    longitude: f64,
    elevation: f32,
    description: &str,
    directions: &[&str],
) -> Location {
    Location {
        id,
        name: name.to_string(),
        latitude,
        longitude,
        elevation,
        timezone: "Europe/Oslo".to_string(),
        description: description.to_string(),
        wind_profile: WindProfile::from_labels(directions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_locations_have_profiles_and_unique_ids() {
        let locations = seed_locations();
        assert!(!locations.is_empty());
        let mut ids: Vec<u32> = locations.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), locations.len());
        for location in &locations {
            assert!(
                !location.wind_profile.is_empty(),
                "{} has no allowed sectors",
                location.name
            );
            assert_ne!(location.tz(), chrono_tz::UTC);
        }
    }

    #[test]
    fn test_find_location() {
        assert!(find_location(1).is_some());
        assert!(find_location(9999).is_none());
    }

    #[test]
    fn test_locations_by_distance_sorts_closest_first() {
        // Search from Voss: both Voss sites should come before the Lofoten ones.
        let ranked = locations_by_distance(60.63, 6.42);
        assert!(ranked[0].0.name.contains("Voss"));
        assert!(ranked[0].1 <= ranked[1].1);
        assert!(ranked.last().unwrap().1 >= ranked[0].1);
    }
}
