//! Near-Earth object records
//!
//! A `NearEarthObject` has a unique primary designation, an optional IAU
//! name, a diameter in kilometers (`NaN` when unknown) and a potentially
//! hazardous flag. Its close approaches are attached by the linker.

use crate::approach::ApproachId;
use serde::Serialize;
use std::fmt;

/// Placeholder designation for records that arrive without one
pub const UNKNOWN_DESIGNATION: &str = "designation unknown";

/// Index of an NEO inside a [`crate::NeoDatabase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NeoId(pub(crate) usize);

/// Typed construction input for a [`NearEarthObject`].
///
/// Every field is optional; `NearEarthObject::new` applies the defaults:
/// - `designation`: [`UNKNOWN_DESIGNATION`]
/// - `name`: `None` (also for empty or whitespace-only names)
/// - `diameter`: `NaN`
/// - `hazardous`: `false`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeoRecord {
    pub designation: Option<String>,
    pub name: Option<String>,
    pub diameter: Option<f64>,
    pub hazardous: Option<bool>,
}

impl NeoRecord {
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: Some(designation.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_hazardous(mut self, hazardous: bool) -> Self {
        self.hazardous = Some(hazardous);
        self
    }
}

/// A near-Earth object (NEO).
#[derive(Debug, Clone)]
pub struct NearEarthObject {
    designation: String,
    /// IAU name, never empty
    pub name: Option<String>,
    /// Diameter in kilometers, `NaN` when unknown
    pub diameter: f64,
    /// Whether the NEO is marked potentially hazardous
    pub hazardous: bool,
    approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Build an NEO from a typed record, normalizing absent values
    pub fn new(record: NeoRecord) -> Self {
        let designation = record
            .designation
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNKNOWN_DESIGNATION.to_string());

        Self {
            designation,
            name: normalize_optional(record.name),
            diameter: record.diameter.unwrap_or(f64::NAN),
            hazardous: record.hazardous.unwrap_or(false),
            approaches: Vec::new(),
        }
    }

    /// Primary designation, the unique key of this NEO
    pub fn designation(&self) -> &str {
        &self.designation
    }

    /// Ids of the linked close approaches, in link order
    pub fn approach_ids(&self) -> &[ApproachId] {
        &self.approaches
    }

    pub(crate) fn attach_approach(&mut self, id: ApproachId) {
        self.approaches.push(id);
    }

    /// Designation plus name, e.g. `433 (Eros)` or `2020 AB (no IAU name)`
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => format!("{} (no IAU name)", self.designation),
        }
    }

    pub fn has_known_diameter(&self) -> bool {
        !self.diameter.is_nan()
    }

    /// Output form with the absent name rendered as an empty string
    pub fn serialize(&self) -> NeoRow {
        NeoRow {
            designation: self.designation.clone(),
            name: self.name.clone().unwrap_or_default(),
            diameter_km: self.diameter,
            potentially_hazardous: self.hazardous,
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.hazardous { "is" } else { "is not" };
        if self.has_known_diameter() {
            write!(
                f,
                "NEO {} has a diameter of {:.3} km and {} potentially hazardous.",
                self.fullname(),
                self.diameter,
                verdict
            )
        } else {
            write!(f, "NEO {} {} potentially hazardous.", self.fullname(), verdict)
        }
    }
}

/// Serialized NEO attributes, shared by the CSV and JSON writers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoRow {
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

/// Title-case a name the way IAU names are stored (`eros` -> `Eros`).
///
/// A letter is upper-cased when it does not follow another letter.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_alpha = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
