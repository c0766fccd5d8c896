//! Filters - composable predicates over close approaches
//!
//! A [`Filter`] is a pure test on an [`ApproachView`]. The typed
//! constructors cover the supported criteria:
//! - calendar day of the approach (on / from / until)
//! - min/max bounds on distance, velocity and NEO diameter
//! - NEO hazardous flag
//! - designation and NEO name equality
//!
//! Unknown values never match. A `NaN` distance, velocity or diameter is
//! neither above nor below any threshold, so every min/max bound rejects it.
//! An approach without a time fails every date filter, and an unlinked
//! approach fails every filter on NEO attributes.

use crate::approach::ApproachView;
use crate::neo::title_case;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

/// Direction of a numeric bound (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// value >= threshold
    Min,
    /// value <= threshold
    Max,
}

impl Bound {
    /// Whether `value` satisfies this bound. Always false for `NaN`.
    pub fn admits(&self, value: f64, threshold: f64) -> bool {
        match self {
            Bound::Min => value >= threshold,
            Bound::Max => value <= threshold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bound::Min => ">=",
            Bound::Max => "<=",
        }
    }
}

/// Comparison of an approach's calendar day against a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    On,
    Start,
    End,
}

impl DateBound {
    pub fn admits(&self, day: NaiveDate, date: NaiveDate) -> bool {
        match self {
            DateBound::On => day == date,
            DateBound::Start => day >= date,
            DateBound::End => day <= date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateBound::On => "==",
            DateBound::Start => ">=",
            DateBound::End => "<=",
        }
    }
}

type Predicate = Box<dyn Fn(&ApproachView<'_>) -> bool>;

/// A described predicate over a close approach and its NEO.
pub struct Filter {
    description: String,
    test: Predicate,
}

impl Filter {
    /// Wrap an arbitrary predicate. It must not have side effects.
    pub fn new(
        description: impl Into<String>,
        test: impl Fn(&ApproachView<'_>) -> bool + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            test: Box::new(test),
        }
    }

    pub fn matches(&self, view: &ApproachView<'_>) -> bool {
        (self.test)(view)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Approaches on the given calendar day
    pub fn on_date(date: NaiveDate) -> Self {
        Self::date(DateBound::On, date)
    }

    /// Approaches on or after the given calendar day
    pub fn start_date(date: NaiveDate) -> Self {
        Self::date(DateBound::Start, date)
    }

    /// Approaches on or before the given calendar day
    pub fn end_date(date: NaiveDate) -> Self {
        Self::date(DateBound::End, date)
    }

    pub fn date(bound: DateBound, date: NaiveDate) -> Self {
        Self::new(format!("date {} {}", bound.as_str(), date), move |view| {
            view.time()
                .map(|time| bound.admits(time.date(), date))
                .unwrap_or(false)
        })
    }

    pub fn min_distance(au: f64) -> Result<Self> {
        Self::distance(Bound::Min, au)
    }

    pub fn max_distance(au: f64) -> Result<Self> {
        Self::distance(Bound::Max, au)
    }

    /// Bound on the nominal approach distance in au
    pub fn distance(bound: Bound, au: f64) -> Result<Self> {
        let au = check_threshold("distance", au)?;
        Ok(Self::new(format!("distance {} {}", bound.as_str(), au), move |view| {
            bound.admits(view.distance(), au)
        }))
    }

    pub fn min_velocity(km_s: f64) -> Result<Self> {
        Self::velocity(Bound::Min, km_s)
    }

    pub fn max_velocity(km_s: f64) -> Result<Self> {
        Self::velocity(Bound::Max, km_s)
    }

    /// Bound on the relative approach velocity in km/s
    pub fn velocity(bound: Bound, km_s: f64) -> Result<Self> {
        let km_s = check_threshold("velocity", km_s)?;
        Ok(Self::new(format!("velocity {} {}", bound.as_str(), km_s), move |view| {
            bound.admits(view.velocity(), km_s)
        }))
    }

    pub fn min_diameter(km: f64) -> Result<Self> {
        Self::diameter(Bound::Min, km)
    }

    pub fn max_diameter(km: f64) -> Result<Self> {
        Self::diameter(Bound::Max, km)
    }

    /// Bound on the linked NEO's diameter in km
    pub fn diameter(bound: Bound, km: f64) -> Result<Self> {
        let km = check_threshold("diameter", km)?;
        Ok(Self::new(format!("diameter {} {}", bound.as_str(), km), move |view| {
            view.neo
                .map(|neo| bound.admits(neo.diameter, km))
                .unwrap_or(false)
        }))
    }

    /// Linked NEO's hazardous flag equals `hazardous`
    pub fn hazardous(hazardous: bool) -> Self {
        Self::new(format!("hazardous == {}", hazardous), move |view| {
            view.neo.map(|neo| neo.hazardous == hazardous).unwrap_or(false)
        })
    }

    /// Approach designation equals `designation` (upper-cased)
    pub fn designation(designation: &str) -> Result<Self> {
        let wanted = designation.trim().to_uppercase();
        if wanted.is_empty() {
            return Err(Error::InvalidFilter("designation must not be empty".to_string()));
        }
        Ok(Self::new(format!("designation == {}", wanted), move |view| {
            view.designation() == wanted
        }))
    }

    /// Linked NEO's name equals `name` (title-cased, or verbatim)
    pub fn name(name: &str) -> Result<Self> {
        let verbatim = name.trim().to_string();
        if verbatim.is_empty() {
            return Err(Error::InvalidFilter("name must not be empty".to_string()));
        }
        let titled = title_case(&verbatim);
        Ok(Self::new(format!("name == {}", titled), move |view| {
            view.neo
                .and_then(|neo| neo.name.as_deref())
                .map(|n| n == titled || n == verbatim)
                .unwrap_or(false)
        }))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

fn check_threshold(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidFilter(format!("{} threshold must be a finite number, got {}", field, value)));
    }
    if value < 0.0 {
        return Err(Error::InvalidFilter(format!("{} threshold must not be negative, got {}", field, value)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approach::{ApproachRecord, CloseApproach};
    use crate::neo::{NearEarthObject, NeoRecord};

    fn eros() -> NearEarthObject {
        NearEarthObject::new(NeoRecord::new("433").with_name("Eros").with_diameter(16.84))
    }

    fn pass(distance: f64, velocity: f64) -> CloseApproach {
        let time = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        CloseApproach::new(
            ApproachRecord::new("433")
                .with_time(time)
                .with_distance(distance)
                .with_velocity(velocity),
        )
    }

    #[test]
    fn test_date_filters() {
        let neo = eros();
        let approach = pass(0.1, 5.0);
        let view = ApproachView::new(&approach, Some(&neo));
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();

        assert!(Filter::on_date(day).matches(&view));
        assert!(!Filter::on_date(next).matches(&view));
        assert!(Filter::start_date(day).matches(&view));
        assert!(!Filter::start_date(next).matches(&view));
        assert!(Filter::end_date(day).matches(&view));
        assert!(Filter::end_date(next).matches(&view));
    }

    #[test]
    fn test_unknown_time_fails_date_filters() {
        let approach = CloseApproach::new(ApproachRecord::new("433"));
        let view = ApproachView::new(&approach, None);
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        assert!(!Filter::on_date(day).matches(&view));
        assert!(!Filter::start_date(day).matches(&view));
        assert!(!Filter::end_date(day).matches(&view));
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let neo = eros();
        let approach = pass(0.25, 10.0);
        let view = ApproachView::new(&approach, Some(&neo));

        assert!(Filter::min_distance(0.25).unwrap().matches(&view));
        assert!(Filter::max_distance(0.25).unwrap().matches(&view));
        assert!(!Filter::max_distance(0.2).unwrap().matches(&view));
        assert!(Filter::min_velocity(10.0).unwrap().matches(&view));
        assert!(!Filter::min_velocity(10.5).unwrap().matches(&view));
        assert!(Filter::min_diameter(16.0).unwrap().matches(&view));
        assert!(!Filter::max_diameter(16.0).unwrap().matches(&view));
    }

    #[test]
    fn test_nan_never_satisfies_a_bound() {
        let unknown = NearEarthObject::new(NeoRecord::new("2020 AB"));
        let approach = CloseApproach::new(ApproachRecord::new("2020 AB"));
        let view = ApproachView::new(&approach, Some(&unknown));

        for threshold in [0.0, 0.5, 1.0, 1e6, f64::MAX] {
            for bound in [Bound::Min, Bound::Max] {
                assert!(!Filter::distance(bound, threshold).unwrap().matches(&view));
                assert!(!Filter::velocity(bound, threshold).unwrap().matches(&view));
                assert!(!Filter::diameter(bound, threshold).unwrap().matches(&view));
            }
        }
    }

    #[test]
    fn test_unlinked_fails_neo_filters() {
        let approach = pass(0.1, 5.0);
        let view = ApproachView::new(&approach, None);

        assert!(!Filter::hazardous(false).matches(&view));
        assert!(!Filter::hazardous(true).matches(&view));
        assert!(!Filter::min_diameter(0.0).unwrap().matches(&view));
        assert!(!Filter::name("Eros").unwrap().matches(&view));
        assert!(Filter::designation("433").unwrap().matches(&view));
    }

    #[test]
    fn test_hazardous_equality() {
        let neo = NearEarthObject::new(NeoRecord::new("99942").with_hazardous(true));
        let approach = pass(0.01, 7.0);
        let view = ApproachView::new(&approach, Some(&neo));

        assert!(Filter::hazardous(true).matches(&view));
        assert!(!Filter::hazardous(false).matches(&view));
    }

    #[test]
    fn test_name_and_designation() {
        let neo = eros();
        let approach = pass(0.1, 5.0);
        let view = ApproachView::new(&approach, Some(&neo));

        assert!(Filter::name("eros").unwrap().matches(&view));
        assert!(!Filter::name("Apophis").unwrap().matches(&view));
        assert!(Filter::designation(" 433 ").unwrap().matches(&view));

        let unnamed = NearEarthObject::new(NeoRecord::new("433"));
        let view = ApproachView::new(&approach, Some(&unnamed));
        assert!(!Filter::name("Eros").unwrap().matches(&view));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        assert!(matches!(Filter::min_distance(f64::NAN), Err(Error::InvalidFilter(_))));
        assert!(Filter::max_velocity(f64::INFINITY).is_err());
        assert!(Filter::min_diameter(-1.0).is_err());
        assert!(Filter::name("  ").is_err());
        assert!(Filter::designation("").is_err());
    }

    #[test]
    fn test_custom_filter_and_display() {
        let close = Filter::new("distance < 0.05", |view| view.distance() < 0.05);
        let neo = eros();
        let approach = pass(0.01, 5.0);

        assert!(close.matches(&ApproachView::new(&approach, Some(&neo))));
        assert_eq!(close.to_string(), "distance < 0.05");
        assert_eq!(Filter::max_distance(0.1).unwrap().to_string(), "distance <= 0.1");
    }
}
