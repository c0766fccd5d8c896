//! NEO Database - In-memory linked graph of NEOs and close approaches
//!
//! The database owns both record collections. NEOs and approaches refer to
//! each other by index ([`NeoId`], [`ApproachId`]), so the whole graph is
//! released by dropping the database. Build one with
//! [`crate::linker::build_database`].

use std::collections::HashMap;
use crate::approach::{ApproachId, ApproachView, CloseApproach};
use crate::neo::{title_case, NearEarthObject, NeoId};
use crate::query::{Filter, Query};

/// Linked, read-only collection of NEOs and their close approaches.
#[derive(Debug, Default)]
pub struct NeoDatabase {
    /// All NEOs in input order
    neos: Vec<NearEarthObject>,
    /// All close approaches in input order
    approaches: Vec<CloseApproach>,
    /// NEOs indexed by designation (exact, as stored)
    by_designation: HashMap<String, NeoId>,
    /// NEOs indexed by name (exact, as stored)
    by_name: HashMap<String, NeoId>,
}

impl NeoDatabase {
    pub(crate) fn from_parts(
        neos: Vec<NearEarthObject>,
        approaches: Vec<CloseApproach>,
        by_designation: HashMap<String, NeoId>,
        by_name: HashMap<String, NeoId>,
    ) -> Self {
        Self {
            neos,
            approaches,
            by_designation,
            by_name,
        }
    }

    /// Find an NEO by primary designation.
    ///
    /// The input is trimmed and upper-cased before the lookup, while the
    /// index holds designations exactly as loaded. A designation stored with
    /// lower-case letters (e.g. `p/2010 a2`) is therefore never found here.
    pub fn get_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        let key = designation.trim().to_uppercase();
        self.by_designation.get(&key).map(|id| &self.neos[id.0])
    }

    /// Find an NEO by IAU name.
    ///
    /// The input is title-cased before the lookup; if that misses, the
    /// trimmed input is tried verbatim. Empty input never matches.
    pub fn get_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        self.by_name
            .get(&title_case(name))
            .or_else(|| self.by_name.get(name))
            .map(|id| &self.neos[id.0])
    }

    /// Like [`Self::get_by_name`], treating `None` as a miss
    pub fn get_by_name_opt(&self, name: Option<&str>) -> Option<&NearEarthObject> {
        name.and_then(|n| self.get_by_name(n))
    }

    /// Stream the close approaches that pass every filter.
    ///
    /// Approaches are yielded in storage order. An empty filter slice yields
    /// everything. Each call re-runs the full pass; nothing is cached.
    pub fn query<'a, 'f>(&'a self, filters: &'f [Filter]) -> Query<'a, 'f> {
        Query::new(self, filters)
    }

    /// Get an NEO by id
    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    /// Get a close approach by id
    pub fn approach(&self, id: ApproachId) -> Option<&CloseApproach> {
        self.approaches.get(id.0)
    }

    /// Get a close approach paired with its NEO
    pub fn view(&self, id: ApproachId) -> Option<ApproachView<'_>> {
        self.approach(id).map(|approach| self.view_of(approach))
    }

    /// Pair an approach with its linked NEO
    pub fn view_of<'a>(&'a self, approach: &'a CloseApproach) -> ApproachView<'a> {
        ApproachView::new(approach, self.neo_of(approach))
    }

    /// The NEO an approach is linked to
    pub fn neo_of(&self, approach: &CloseApproach) -> Option<&NearEarthObject> {
        approach.neo_id().and_then(|id| self.neo(id))
    }

    /// All close approaches linked to an NEO, in link order
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = ApproachView<'a>> + 'a {
        neo.approach_ids()
            .iter()
            .filter_map(move |id| self.view(*id))
    }

    /// All NEOs in input order
    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    /// All close approaches in input order
    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    pub fn neo_count(&self) -> usize {
        self.neos.len()
    }

    pub fn approach_count(&self) -> usize {
        self.approaches.len()
    }

    /// Number of distinct names in the name index
    pub fn named_count(&self) -> usize {
        self.by_name.len()
    }
}
