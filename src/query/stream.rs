//! Lazy query stream over a [`NeoDatabase`]

use std::iter::FusedIterator;
use std::slice;
use crate::approach::{ApproachView, CloseApproach};
use crate::database::NeoDatabase;
use crate::query::filter::Filter;

/// Iterator over the close approaches that pass every filter.
///
/// Created by [`NeoDatabase::query`]. Filters run in order and stop at the
/// first failure. The stream holds only borrows, so it can be dropped at
/// any point without cleanup.
pub struct Query<'a, 'f> {
    db: &'a NeoDatabase,
    approaches: slice::Iter<'a, CloseApproach>,
    filters: &'f [Filter],
}

impl<'a, 'f> Query<'a, 'f> {
    pub(crate) fn new(db: &'a NeoDatabase, filters: &'f [Filter]) -> Self {
        Self {
            db,
            approaches: db.approaches().iter(),
            filters,
        }
    }
}

impl<'a> Iterator for Query<'a, '_> {
    type Item = ApproachView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for approach in self.approaches.by_ref() {
            let view = self.db.view_of(approach);
            if self.filters.iter().all(|filter| filter.matches(&view)) {
                return Some(view);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.approaches.size_hint().1)
    }
}

impl FusedIterator for Query<'_, '_> {}

/// Keep at most `n` results. `None` or `Some(0)` keeps everything.
pub fn limit<I: IntoIterator>(results: I, n: Option<usize>) -> std::iter::Take<I::IntoIter> {
    let n = match n {
        Some(0) | None => usize::MAX,
        Some(n) => n,
    };
    results.into_iter().take(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approach::ApproachRecord;
    use crate::linker::build_database;
    use crate::neo::{NearEarthObject, NeoRecord};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample_db() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new(NeoRecord::new("433").with_name("Eros")),
            NearEarthObject::new(NeoRecord::new("99942").with_name("Apophis").with_hazardous(true)),
        ];
        let approaches = vec![
            CloseApproach::new(ApproachRecord::new("433").with_distance(0.3)),
            CloseApproach::new(ApproachRecord::new("99942").with_distance(0.01)),
            CloseApproach::new(ApproachRecord::new("999999").with_distance(0.2)),
            CloseApproach::new(ApproachRecord::new("433").with_distance(0.05)),
        ];
        build_database(neos, approaches).0
    }

    fn distances<'a>(views: impl Iterator<Item = ApproachView<'a>>) -> Vec<f64> {
        views.map(|v| v.distance()).collect()
    }

    #[test]
    fn test_empty_filters_yield_everything_in_order() {
        let db = sample_db();
        let all: Vec<_> = db.query(&[]).collect();

        assert_eq!(all.len(), db.approach_count());
        for (view, approach) in all.iter().zip(db.approaches()) {
            assert!(std::ptr::eq(view.approach, approach));
        }
    }

    #[test]
    fn test_always_false_and_always_true() {
        let db = sample_db();

        let never = [Filter::new("never", |_| false)];
        assert_eq!(db.query(&never).count(), 0);

        let always = [Filter::new("always", |_| true)];
        assert_eq!(distances(db.query(&always)), distances(db.query(&[])));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let db = sample_db();
        let filters = [
            Filter::max_distance(0.25).unwrap(),
            Filter::hazardous(false),
        ];

        assert_eq!(distances(db.query(&filters)), vec![0.05]);
    }

    #[test]
    fn test_query_is_repeatable() {
        let db = sample_db();
        let filters = [Filter::max_distance(0.25).unwrap()];

        let first = distances(db.query(&filters));
        let second = distances(db.query(&filters));
        assert_eq!(first, second);
        assert_eq!(first, vec![0.01, 0.2, 0.05]);
    }

    #[test]
    fn test_dangling_approach_is_yielded_unlinked() {
        let db = sample_db();
        let orphan = db
            .query(&[])
            .find(|v| v.designation() == "999999")
            .unwrap();

        assert!(orphan.neo.is_none());
        assert!(orphan.to_string().contains("'999999'"));
    }

    #[test]
    fn test_short_circuit_and_lazy_consumption() {
        let db = sample_db();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let filters = [
            Filter::new("never", |_| false),
            Filter::new("counted", move |_| {
                counter.set(counter.get() + 1);
                true
            }),
        ];
        assert_eq!(db.query(&filters).count(), 0);
        assert_eq!(calls.get(), 0);

        let seen = Rc::new(Cell::new(0));
        let probe = Rc::clone(&seen);
        let counting = [Filter::new("counting", move |_| {
            probe.set(probe.get() + 1);
            true
        })];
        let first_two: Vec<_> = limit(db.query(&counting), Some(2)).collect();
        assert_eq!(first_two.len(), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_limit() {
        let db = sample_db();

        assert_eq!(limit(db.query(&[]), Some(3)).count(), 3);
        assert_eq!(limit(db.query(&[]), Some(0)).count(), 4);
        assert_eq!(limit(db.query(&[]), None).count(), 4);
        assert_eq!(limit(db.query(&[]), Some(100)).count(), 4);
    }
}
