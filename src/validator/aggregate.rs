//! Day-level and overall aggregation
//!
//! Hours are grouped into calendar days in the location's timezone, each
//! day's daytime hours are evaluated individually, and the verdicts roll up
//! with no partial credit: one failing daytime hour makes the day negative,
//! one negative day makes the whole window negative.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::models::{ForecastPoint, Location};
use crate::rules::AlertRule;
use crate::validator::point::{PointVerdict, evaluate_point};

/// Positive means flyable for the whole evaluated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Positive,
    Negative,
}

impl Verdict {
    #[must_use]
    pub fn is_positive(self) -> bool {
        self == Verdict::Positive
    }
}

/// One evaluated daytime hour.
#[derive(Debug, Clone, Serialize)]
pub struct HourVerdict {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub verdict: PointVerdict,
    pub point: ForecastPoint,
}

/// A formatted local-time interval, e.g. 10:00-14:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    pub start: String,
    pub end: String,
}

impl TimeInterval {
    fn from_hours(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start: format!("{start_hour:02}:00"),
            end: format!("{end_hour:02}:00"),
        }
    }
}

/// Verdict for one local calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DayVerdict {
    pub date: NaiveDate,
    pub result: Verdict,
    pub hours: Vec<HourVerdict>,
    /// Runs of consecutive good hours at least `min_consecutive_hours` long;
    /// informational, the day result does not depend on them.
    pub flyable_intervals: Vec<TimeInterval>,
}

/// Aggregated verdict over the whole forecast window.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherValidation {
    pub overall: Verdict,
    pub days: Vec<DayVerdict>,
}

/// Validate a merged forecast series for a location under an alert rule.
///
/// Pure and synchronous; repeated calls on the same inputs yield the same
/// result.
#[must_use]
pub fn validate_weather(
    points: &[ForecastPoint],
    rule: &AlertRule,
    location: &Location,
) -> WeatherValidation {
    let tz = location.tz();

    // Group by local calendar day; BTreeMap keeps the days ordered.
    let mut by_day: BTreeMap<NaiveDate, Vec<&ForecastPoint>> = BTreeMap::new();
    for point in points {
        let local_date = point.timestamp.with_timezone(&tz).date_naive();
        by_day.entry(local_date).or_default().push(point);
    }

    let allowed = location.wind_profile.sectors();
    let days: Vec<DayVerdict> = by_day
        .into_iter()
        .map(|(date, day_points)| {
            // Only daylight hours count towards the verdict
            let hours: Vec<HourVerdict> = day_points
                .iter()
                .filter(|p| p.is_day)
                .map(|p| HourVerdict {
                    timestamp: p.timestamp,
                    verdict: evaluate_point(p, rule, allowed),
                    point: (*p).clone(),
                })
                .collect();

            let flyable_intervals =
                find_consecutive_good_intervals(&hours, rule.min_consecutive_hours, location);

            // A day with no daytime hours is negative: nothing to fly in.
            let result = if !hours.is_empty() && hours.iter().all(|h| h.verdict.is_good) {
                Verdict::Positive
            } else {
                Verdict::Negative
            };

            DayVerdict {
                date,
                result,
                hours,
                flyable_intervals,
            }
        })
        .collect();

    let overall = if !days.is_empty() && days.iter().all(|d| d.result.is_positive()) {
        Verdict::Positive
    } else {
        Verdict::Negative
    };

    WeatherValidation { overall, days }
}

/// Find runs of consecutive good hours of at least `min_hours` length,
/// formatted in the location's local time.
fn find_consecutive_good_intervals(
    hours: &[HourVerdict],
    min_hours: usize,
    location: &Location,
) -> Vec<TimeInterval> {
    let tz = location.tz();
    let mut intervals = Vec::new();
    let mut run_start: Option<u32> = None;
    let mut run_length = 0usize;

    for hour in hours {
        let local_hour = hour.timestamp.with_timezone(&tz).hour();
        if hour.verdict.is_good {
            run_length += 1;
            run_start.get_or_insert(local_hour);
        } else {
            if let Some(start) = run_start.take() {
                if run_length >= min_hours {
                    intervals.push(TimeInterval::from_hours(start, local_hour));
                }
            }
            run_length = 0;
        }
    }
    if let Some(start) = run_start {
        if run_length >= min_hours {
            // Run reaches the end of the day's hours; close it after the
            // last good hour.
            let last_hour = hours
                .iter()
                .rev()
                .find(|h| h.verdict.is_good)
                .map_or(start, |h| h.timestamp.with_timezone(&tz).hour());
            intervals.push(TimeInterval::from_hours(start, last_hour + 1));
        }
    }

    intervals
}
