//! Linker - joins NEOs and close approaches into a [`NeoDatabase`]
//!
//! One pass over each collection:
//! 1. Index NEOs by designation and by name (last write wins on duplicates)
//! 2. Resolve every approach's designation and link both directions
//!
//! Approaches whose designation matches no NEO stay unlinked and are
//! reported, never rejected.

use std::collections::HashMap;
use std::fmt;
use crate::approach::{ApproachId, CloseApproach};
use crate::database::NeoDatabase;
use crate::neo::{NearEarthObject, NeoId, UNKNOWN_DESIGNATION};

/// A close approach whose designation matched no NEO
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DanglingApproach {
    pub approach: ApproachId,
    pub designation: String,
}

/// Diagnostics returned alongside the database
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LinkReport {
    pub neos: usize,
    pub approaches: usize,
    pub linked: usize,
    pub dangling: Vec<DanglingApproach>,
    /// Designations that appeared on more than one NEO
    pub duplicate_designations: Vec<String>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.duplicate_designations.is_empty()
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Link Stats:")?;
        writeln!(f, "  NEOs: {}", self.neos)?;
        writeln!(f, "  Close approaches: {}", self.approaches)?;
        writeln!(f, "  ✅ Linked: {}", self.linked)?;
        writeln!(f, "  ❌ Dangling: {}", self.dangling.len())?;
        writeln!(f, "  ⚠️ Duplicate designations: {}", self.duplicate_designations.len())
    }
}

/// Build a linked database from unlinked NEOs and close approaches.
///
/// Runs in O(N + M). Never fails: dangling references and duplicate
/// designations are recorded in the returned [`LinkReport`] and logged.
pub fn build_database(
    mut neos: Vec<NearEarthObject>,
    mut approaches: Vec<CloseApproach>,
) -> (NeoDatabase, LinkReport) {
    tracing::debug!("Linking {} NEOs with {} close approaches", neos.len(), approaches.len());

    let mut by_designation: HashMap<String, NeoId> = HashMap::with_capacity(neos.len());
    let mut by_name: HashMap<String, NeoId> = HashMap::new();
    let mut report = LinkReport {
        neos: neos.len(),
        approaches: approaches.len(),
        ..LinkReport::default()
    };

    for (index, neo) in neos.iter().enumerate() {
        let id = NeoId(index);
        if by_designation.insert(neo.designation().to_string(), id).is_some() {
            tracing::warn!("Duplicate designation {}; keeping the later record", neo.designation());
            report.duplicate_designations.push(neo.designation().to_string());
        }
        if let Some(ref name) = neo.name {
            by_name.insert(name.clone(), id);
        }
    }

    for (index, approach) in approaches.iter_mut().enumerate() {
        let id = ApproachId(index);
        // A missing designation on both sides is not a match
        let target = match approach.designation() {
            UNKNOWN_DESIGNATION => None,
            designation => by_designation.get(designation),
        };
        match target {
            Some(&neo_id) => {
                neos[neo_id.0].attach_approach(id);
                approach.link(neo_id);
                report.linked += 1;
            }
            None => {
                tracing::error!(
                    "Close approach #{} refers to unknown designation {:?}",
                    index,
                    approach.designation()
                );
                report.dangling.push(DanglingApproach {
                    approach: id,
                    designation: approach.designation().to_string(),
                });
            }
        }
    }

    tracing::debug!("Linked {} of {} close approaches", report.linked, report.approaches);

    (NeoDatabase::from_parts(neos, approaches, by_designation, by_name), report)
}
