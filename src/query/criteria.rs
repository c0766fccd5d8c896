//! Filter criteria - the typed form of user query options
//!
//! [`create_filters`] turns a [`FilterCriteria`] into the flat list of
//! filters passed to [`crate::NeoDatabase::query`]. Invalid criteria are
//! rejected here, before any query runs.

use crate::query::filter::Filter;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;

/// User-specified query constraints. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
    pub designation: Option<String>,
    pub name: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Build the conjunction of filters described by `criteria`.
///
/// Filters come out in a fixed order: dates, distance, velocity, diameter,
/// hazardous, designation, name. Fails with [`Error::InvalidFilter`] when a
/// threshold is invalid, a min exceeds its max, or the date range is inverted.
pub fn create_filters(criteria: &FilterCriteria) -> Result<Vec<Filter>> {
    check_range("date", criteria.start_date, criteria.end_date)?;
    check_range("distance", criteria.distance_min, criteria.distance_max)?;
    check_range("velocity", criteria.velocity_min, criteria.velocity_max)?;
    check_range("diameter", criteria.diameter_min, criteria.diameter_max)?;

    let mut filters = Vec::new();

    if let Some(date) = criteria.date {
        filters.push(Filter::on_date(date));
    }
    if let Some(date) = criteria.start_date {
        filters.push(Filter::start_date(date));
    }
    if let Some(date) = criteria.end_date {
        filters.push(Filter::end_date(date));
    }
    if let Some(au) = criteria.distance_min {
        filters.push(Filter::min_distance(au)?);
    }
    if let Some(au) = criteria.distance_max {
        filters.push(Filter::max_distance(au)?);
    }
    if let Some(km_s) = criteria.velocity_min {
        filters.push(Filter::min_velocity(km_s)?);
    }
    if let Some(km_s) = criteria.velocity_max {
        filters.push(Filter::max_velocity(km_s)?);
    }
    if let Some(km) = criteria.diameter_min {
        filters.push(Filter::min_diameter(km)?);
    }
    if let Some(km) = criteria.diameter_max {
        filters.push(Filter::max_diameter(km)?);
    }
    if let Some(hazardous) = criteria.hazardous {
        filters.push(Filter::hazardous(hazardous));
    }
    if let Some(ref designation) = criteria.designation {
        filters.push(Filter::designation(designation)?);
    }
    if let Some(ref name) = criteria.name {
        filters.push(Filter::name(name)?);
    }

    tracing::debug!("Built {} filters", filters.len());
    Ok(filters)
}

fn check_range<T: PartialOrd + std::fmt::Display>(field: &str, min: Option<T>, max: Option<T>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(Error::InvalidFilter(format!(
                "{} lower bound {} is greater than upper bound {}",
                field, min, max
            )));
        }
    }
    Ok(())
}
