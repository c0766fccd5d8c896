//! Close-approach records
//!
//! A `CloseApproach` is one recorded pass of an NEO near Earth: time of
//! closest approach (UTC, minute precision), nominal distance in au and
//! relative velocity in km/s. It refers to its NEO by designation until
//! the linker resolves that designation to a [`NeoId`].

use crate::datetime::{format_cd, truncate_to_minute};
use crate::neo::{NearEarthObject, NeoId, NeoRow, UNKNOWN_DESIGNATION};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Index of a close approach inside a [`crate::NeoDatabase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ApproachId(pub(crate) usize);

impl ApproachId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Typed construction input for a [`CloseApproach`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApproachRecord {
    pub designation: Option<String>,
    pub time: Option<NaiveDateTime>,
    pub distance: Option<f64>,
    pub velocity: Option<f64>,
}

impl ApproachRecord {
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: Some(designation.into()),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

/// A close approach to Earth by an NEO.
#[derive(Debug, Clone)]
pub struct CloseApproach {
    designation: String,
    /// Time of closest approach, UTC
    pub time: Option<NaiveDateTime>,
    /// Nominal approach distance in au, `NaN` when unknown
    pub distance: f64,
    /// Relative approach velocity in km/s, `NaN` when unknown
    pub velocity: f64,
    neo: Option<NeoId>,
}

impl CloseApproach {
    pub fn new(record: ApproachRecord) -> Self {
        Self {
            designation: record
                .designation
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| UNKNOWN_DESIGNATION.to_string()),
            time: record.time.map(truncate_to_minute),
            distance: record.distance.unwrap_or(f64::NAN),
            velocity: record.velocity.unwrap_or(f64::NAN),
            neo: None,
        }
    }

    /// Designation of the NEO making this approach
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// The linked NEO, `None` before linking or when the designation is unknown
    pub fn neo_id(&self) -> Option<NeoId> {
        self.neo
    }

    pub fn is_linked(&self) -> bool {
        self.neo.is_some()
    }

    pub(crate) fn link(&mut self, neo: NeoId) {
        self.neo = Some(neo);
    }

    /// Approach time as `YYYY-MM-DD HH:MM`, empty when unknown
    pub fn time_str(&self) -> String {
        self.time.as_ref().map(format_cd).unwrap_or_default()
    }
}

/// A close approach together with its linked NEO.
///
/// This is what filters see and what queries yield.
#[derive(Debug, Clone, Copy)]
pub struct ApproachView<'a> {
    pub approach: &'a CloseApproach,
    pub neo: Option<&'a NearEarthObject>,
}

impl<'a> ApproachView<'a> {
    pub fn new(approach: &'a CloseApproach, neo: Option<&'a NearEarthObject>) -> Self {
        Self { approach, neo }
    }

    pub fn designation(&self) -> &'a str {
        self.approach.designation()
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.approach.time
    }

    pub fn distance(&self) -> f64 {
        self.approach.distance
    }

    pub fn velocity(&self) -> f64 {
        self.approach.velocity
    }

    /// Output form; unlinked approaches carry their own designation and empty NEO attributes
    pub fn serialize(&self) -> ApproachRow {
        let neo = match self.neo {
            Some(neo) => neo.serialize(),
            None => NeoRow {
                designation: self.designation().to_string(),
                name: String::new(),
                diameter_km: f64::NAN,
                potentially_hazardous: false,
            },
        };

        ApproachRow {
            datetime_utc: self.approach.time_str(),
            distance_au: self.approach.distance,
            velocity_km_s: self.approach.velocity,
            neo,
        }
    }
}

impl fmt::Display for ApproachView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = match self.approach.time {
            Some(ref time) => format!("At {}", format_cd(time)),
            None => "At an unknown time".to_string(),
        };
        let who = match self.neo {
            Some(neo) => neo.fullname(),
            None => self.designation().to_string(),
        };
        let distance = if self.distance().is_nan() {
            "an unknown distance".to_string()
        } else {
            format!("a distance of {:.2} au", self.distance())
        };
        let velocity = if self.velocity().is_nan() {
            "an unknown velocity".to_string()
        } else {
            format!("a velocity of {:.2} km/s", self.velocity())
        };

        write!(f, "{}, '{}' approaches Earth at {} and {}.", when, who, distance, velocity)
    }
}

/// Serialized approach with its nested NEO, as written to JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachRow {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub neo: NeoRow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neo::NeoRecord;
    use chrono::{NaiveDate, Timelike};

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let approach = CloseApproach::new(ApproachRecord::new("433"));

        assert_eq!(approach.designation(), "433");
        assert!(approach.time.is_none());
        assert!(approach.distance.is_nan());
        assert!(approach.velocity.is_nan());
        assert!(!approach.is_linked());
        assert_eq!(approach.time_str(), "");
    }

    #[test]
    fn test_missing_designation_uses_sentinel() {
        let absent = CloseApproach::new(ApproachRecord::default());
        let blank = CloseApproach::new(ApproachRecord::new("   "));

        assert_eq!(absent.designation(), UNKNOWN_DESIGNATION);
        assert_eq!(blank.designation(), UNKNOWN_DESIGNATION);
    }

    #[test]
    fn test_time_is_truncated_to_minutes() {
        let time = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(10, 20, 45)
            .unwrap();
        let approach = CloseApproach::new(ApproachRecord::new("433").with_time(time));

        assert_eq!(approach.time.unwrap().second(), 0);
        assert_eq!(approach.time_str(), "2020-01-01 10:20");
    }

    #[test]
    fn test_display_linked() {
        let neo = NearEarthObject::new(NeoRecord::new("433").with_name("Eros"));
        let approach = CloseApproach::new(
            ApproachRecord::new("433")
                .with_time(sample_time())
                .with_distance(0.42)
                .with_velocity(5.3),
        );
        let view = ApproachView::new(&approach, Some(&neo));

        assert_eq!(
            view.to_string(),
            "At 2020-01-01 00:00, '433 (Eros)' approaches Earth at a distance of 0.42 au and a velocity of 5.30 km/s."
        );
    }

    #[test]
    fn test_display_unknowns() {
        let approach = CloseApproach::new(ApproachRecord::new("999999"));
        let view = ApproachView::new(&approach, None);

        assert_eq!(
            view.to_string(),
            "At an unknown time, '999999' approaches Earth at an unknown distance and an unknown velocity."
        );
    }

    #[test]
    fn test_serialize_unlinked() {
        let approach = CloseApproach::new(
            ApproachRecord::new("999999")
                .with_time(sample_time())
                .with_distance(0.1),
        );
        let row = ApproachView::new(&approach, None).serialize();

        assert_eq!(row.datetime_utc, "2020-01-01 00:00");
        assert_eq!(row.neo.designation, "999999");
        assert_eq!(row.neo.name, "");
        assert!(row.velocity_km_s.is_nan());
        assert!(!row.neo.potentially_hazardous);
    }
}
